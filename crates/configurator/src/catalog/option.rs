//! Selectable options within a category.

use crate::ids::{CategoryId, OptionId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A concrete choice within a category (e.g. "Matte finish").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigOption {
    /// Unique option identifier.
    pub id: OptionId,
    /// Owning category.
    pub category_id: CategoryId,
    /// Display name.
    pub name: String,
    /// Nominal price contribution.
    pub price: Money,
    /// Units in stock.
    pub stock_quantity: u32,
    /// Merchandising flag; false hides the option regardless of stock.
    pub is_available: bool,
}

impl ConfigOption {
    /// Create an available option. The category is assigned when the option
    /// is attached with [`Category::with_option`](crate::catalog::Category::with_option).
    pub fn new(id: impl Into<OptionId>, name: impl Into<String>, price: Money, stock_quantity: u32) -> Self {
        Self {
            id: id.into(),
            category_id: CategoryId::new(""),
            name: name.into(),
            price,
            stock_quantity,
            is_available: true,
        }
    }

    /// Mark the option as withdrawn from sale.
    pub fn unavailable(mut self) -> Self {
        self.is_available = false;
        self
    }

    /// Stock-based availability: flagged available and at least one unit left.
    pub fn is_in_stock(&self) -> bool {
        self.is_available && self.stock_quantity > 0
    }
}
