//! Price resolver: itemized price of a (partial) configuration.
//!
//! Every selected option contributes its nominal catalog price unless a price
//! override whose trigger is also selected replaces it. When several such
//! overrides target the same base option, [`OverridePrecedence`] decides.
//! All arithmetic is on integer minor units and saturates rather than
//! failing, so the resolver is total and deterministic.

use crate::catalog::ProductCatalog;
use crate::config::{EngineConfig, OverridePrecedence};
use crate::engine::Selection;
use crate::ids::{CategoryId, OptionId};
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Override that set an option's effective price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedOverride {
    pub trigger_option_id: OptionId,
    pub override_price: Money,
}

/// Contribution of one selected option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceLine {
    pub category_id: CategoryId,
    pub category_name: String,
    pub option_id: OptionId,
    pub option_name: String,
    /// Catalog price.
    pub nominal: Money,
    /// Price after overrides.
    pub effective: Money,
    pub applied_override: Option<AppliedOverride>,
}

impl PriceLine {
    /// Whether an override changed the contribution.
    pub fn is_modified(&self) -> bool {
        self.effective != self.nominal
    }
}

/// Itemized price of a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    /// Product base price.
    pub base: Money,
    /// One line per selected category, in step order.
    pub lines: Vec<PriceLine>,
    /// Base plus all effective contributions, never negative.
    pub total: Money,
}

impl PriceBreakdown {
    /// Line for a category, if it has a selection.
    pub fn line(&self, category_id: &CategoryId) -> Option<&PriceLine> {
        self.lines.iter().find(|l| &l.category_id == category_id)
    }

    /// Amount saved by active overrides (negative if overrides raised prices).
    pub fn override_savings(&self) -> i64 {
        self.lines
            .iter()
            .map(|l| l.nominal.amount_cents.saturating_sub(l.effective.amount_cents))
            .fold(0_i64, i64::saturating_add)
    }
}

/// Price an option would contribute if chosen now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionQuote {
    pub option_id: OptionId,
    pub nominal: Money,
    pub effective: Money,
    pub applied_override: Option<AppliedOverride>,
}

impl OptionQuote {
    pub fn is_modified(&self) -> bool {
        self.effective != self.nominal
    }
}

/// Compute the itemized price of `selection`.
///
/// Selections naming options outside their category are ignored.
pub fn price(catalog: &ProductCatalog, selection: &Selection, config: &EngineConfig) -> PriceBreakdown {
    let selected = valid_selected_ids(catalog, selection);
    let base = catalog.base_price();

    let mut total_cents = base.amount_cents;
    let mut lines = Vec::with_capacity(selection.len());

    for category in catalog.categories() {
        let Some(option) = selection
            .get(&category.id)
            .and_then(|id| catalog.option_in(&category.id, id))
        else {
            continue;
        };

        let (effective, applied_override) =
            effective_price(catalog, &selected, &option.id, option.price, config.override_precedence);
        total_cents = total_cents.saturating_add(effective.amount_cents);

        lines.push(PriceLine {
            category_id: category.id.clone(),
            category_name: category.name.clone(),
            option_id: option.id.clone(),
            option_name: option.name.clone(),
            nominal: option.price,
            effective,
            applied_override,
        });
    }

    PriceBreakdown {
        base,
        lines,
        total: Money::new(total_cents, base.currency).clamp_non_negative(),
    }
}

/// Quote `option_id` as if it replaced its category's current choice.
///
/// Returns `None` for options outside the product.
pub fn quote_option(
    catalog: &ProductCatalog,
    selection: &Selection,
    option_id: &OptionId,
    config: &EngineConfig,
) -> Option<OptionQuote> {
    let option = catalog.option(option_id)?;

    let mut selected = valid_selected_ids(catalog, selection);
    if let Some(current) = selection.get(&option.category_id) {
        selected.remove(current);
    }
    selected.insert(option.id.clone());

    let (effective, applied_override) =
        effective_price(catalog, &selected, &option.id, option.price, config.override_precedence);

    Some(OptionQuote {
        option_id: option.id.clone(),
        nominal: option.price,
        effective,
        applied_override,
    })
}

fn valid_selected_ids(catalog: &ProductCatalog, selection: &Selection) -> BTreeSet<OptionId> {
    selection
        .iter()
        .filter(|(category_id, option_id)| catalog.option_in(category_id, option_id).is_some())
        .map(|(_, option_id)| option_id.clone())
        .collect()
}

fn effective_price(
    catalog: &ProductCatalog,
    selected: &BTreeSet<OptionId>,
    option_id: &OptionId,
    nominal: Money,
    precedence: OverridePrecedence,
) -> (Money, Option<AppliedOverride>) {
    let winner = catalog
        .rules()
        .overrides_for_base(option_id)
        .filter(|(_, o)| selected.contains(&o.trigger_option_id))
        .fold(None, |best, (index, candidate)| match (best, precedence) {
            (None, _) | (Some(_), OverridePrecedence::LastDeclared) => Some((index, candidate)),
            (Some((_, current)), OverridePrecedence::LowestPrice)
                if candidate.override_price.amount_cents <= current.override_price.amount_cents =>
            {
                Some((index, candidate))
            }
            (keep, OverridePrecedence::LowestPrice) => keep,
        });

    match winner {
        Some((_, o)) => (
            o.override_price,
            Some(AppliedOverride {
                trigger_option_id: o.trigger_option_id.clone(),
                override_price: o.override_price,
            }),
        ),
        None => (nominal, None),
    }
}
