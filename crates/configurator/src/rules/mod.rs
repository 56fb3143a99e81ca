//! Product rule set.
//!
//! Incompatibility groups and pairwise price overrides supplied alongside a
//! catalog snapshot. Declaration order is preserved; the price resolver uses
//! it as the override tie-break.

mod incompatibility;
mod price_override;

pub use incompatibility::IncompatibilityRule;
pub use price_override::PriceOverride;

use crate::ids::OptionId;
use serde::{Deserialize, Serialize};

/// All rules attached to one product.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RuleSet {
    /// Incompatibility rules in declaration order.
    pub incompatibilities: Vec<IncompatibilityRule>,
    /// Price overrides in declaration order.
    pub price_overrides: Vec<PriceOverride>,
}

impl RuleSet {
    pub fn new(
        incompatibilities: Vec<IncompatibilityRule>,
        price_overrides: Vec<PriceOverride>,
    ) -> Self {
        Self {
            incompatibilities,
            price_overrides,
        }
    }

    /// Rules naming `option_id` as a member.
    pub fn rules_for<'a>(
        &'a self,
        option_id: &'a OptionId,
    ) -> impl Iterator<Item = &'a IncompatibilityRule> + 'a {
        self.incompatibilities
            .iter()
            .filter(move |rule| rule.contains(option_id))
    }

    /// Overrides whose base is `option_id`, with their declaration index.
    pub fn overrides_for_base<'a>(
        &'a self,
        option_id: &'a OptionId,
    ) -> impl Iterator<Item = (usize, &'a PriceOverride)> + 'a {
        self.price_overrides
            .iter()
            .enumerate()
            .filter(move |(_, o)| o.targets(option_id))
    }

    pub fn is_empty(&self) -> bool {
        self.incompatibilities.is_empty() && self.price_overrides.is_empty()
    }
}
