//! Conditional price overrides.

use crate::ids::OptionId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Replaces the base option's price while the trigger option is co-selected.
///
/// The trigger option's own price is never affected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceOverride {
    /// Option whose contribution is replaced.
    pub base_option_id: OptionId,
    /// Option whose selection activates the override.
    pub trigger_option_id: OptionId,
    /// Contribution of the base option while active.
    pub override_price: Money,
}

impl PriceOverride {
    pub fn new(base_option_id: OptionId, trigger_option_id: OptionId, override_price: Money) -> Self {
        Self {
            base_option_id,
            trigger_option_id,
            override_price,
        }
    }

    /// Check whether this override targets `option_id`.
    pub fn targets(&self, option_id: &OptionId) -> bool {
        &self.base_option_id == option_id
    }
}
