//! Configuration categories (wizard steps).

use crate::catalog::ConfigOption;
use crate::ids::{CategoryId, OptionId};
use serde::{Deserialize, Serialize};

/// A configuration axis such as "Frame Type"; exactly one option may be chosen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Unique category identifier.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Category description.
    pub description: Option<String>,
    /// Whether a configuration must include an option from this category.
    pub is_required: bool,
    /// Position of the wizard step; lower comes first.
    pub sort_order: i32,
    /// Options in display order.
    pub options: Vec<ConfigOption>,
}

impl Category {
    /// Create an empty category.
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>, is_required: bool) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            is_required,
            sort_order: 0,
            options: Vec::new(),
        }
    }

    pub fn with_sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach an option, taking ownership of its category link.
    pub fn with_option(mut self, mut option: ConfigOption) -> Self {
        option.category_id = self.id.clone();
        self.options.push(option);
        self
    }

    /// Find an option of this category.
    pub fn option(&self, option_id: &OptionId) -> Option<&ConfigOption> {
        self.options.iter().find(|o| &o.id == option_id)
    }
}
