//! Compatibility resolver: can this option be picked right now?

use crate::catalog::ProductCatalog;
use crate::config::EngineConfig;
use crate::engine::Selection;
use crate::ids::{CategoryId, OptionId, RuleId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why an option cannot be selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnavailabilityReason {
    /// Withdrawn from sale or no units left.
    OutOfStock,
    /// Selecting it would violate an incompatibility rule.
    #[serde(rename_all = "camelCase")]
    Incompatible {
        rule_id: RuleId,
        rule_name: String,
        /// Selected options the rule pairs it against.
        conflicting_with: Vec<OptionId>,
    },
    /// Not an option of the given category in this product.
    UnknownOption,
}

impl UnavailabilityReason {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            UnavailabilityReason::OutOfStock => "OUT_OF_STOCK",
            UnavailabilityReason::Incompatible { .. } => "INCOMPATIBLE",
            UnavailabilityReason::UnknownOption => "UNKNOWN_OPTION",
        }
    }
}

impl fmt::Display for UnavailabilityReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnavailabilityReason::OutOfStock => f.write_str("Out of stock"),
            UnavailabilityReason::Incompatible { rule_name, .. } => {
                write!(f, "Incompatible with current selection ({rule_name})")
            }
            UnavailabilityReason::UnknownOption => f.write_str("Not offered for this product"),
        }
    }
}

/// Result of resolving one candidate option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Available,
    Unavailable(UnavailabilityReason),
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }

    pub fn reason(&self) -> Option<&UnavailabilityReason> {
        match self {
            Availability::Available => None,
            Availability::Unavailable(reason) => Some(reason),
        }
    }
}

/// Availability of one option within a category listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionAvailability {
    pub option_id: OptionId,
    pub availability: Availability,
}

/// Decide whether `option_id` can be chosen for `category_id` given `selection`.
///
/// Checks run in a fixed order: the category's current choice is always
/// available; unknown options and options outside the category are never
/// available; stock is checked before rules. Rules are checked against every
/// selected option, including the category's current choice. The first rule
/// in declaration order that blocks the candidate is reported.
pub fn resolve(
    catalog: &ProductCatalog,
    selection: &Selection,
    category_id: &CategoryId,
    option_id: &OptionId,
    config: &EngineConfig,
) -> Availability {
    let current = selection.get(category_id);
    if current == Some(option_id) {
        return Availability::Available;
    }

    let Some(option) = catalog.option_in(category_id, option_id) else {
        return Availability::Unavailable(UnavailabilityReason::UnknownOption);
    };

    if !option.is_in_stock() {
        return Availability::Unavailable(UnavailabilityReason::OutOfStock);
    }

    let selected = selection.selected_option_ids();
    if selected.is_empty() {
        return Availability::Available;
    }

    for rule in catalog.rules().rules_for(option_id) {
        let blockers = rule.blockers(option_id, &selected, config.incompatibility);
        if !blockers.is_empty() {
            return Availability::Unavailable(UnavailabilityReason::Incompatible {
                rule_id: rule.id.clone(),
                rule_name: rule.name.clone(),
                conflicting_with: blockers,
            });
        }
    }

    Availability::Available
}

/// Resolve every option of a category, in display order.
///
/// Returns an empty list for an unknown category.
pub fn availability_for_category(
    catalog: &ProductCatalog,
    selection: &Selection,
    category_id: &CategoryId,
    config: &EngineConfig,
) -> Vec<OptionAvailability> {
    let Some(category) = catalog.category(category_id) else {
        return Vec::new();
    };
    category
        .options
        .iter()
        .map(|option| OptionAvailability {
            option_id: option.id.clone(),
            availability: resolve(catalog, selection, category_id, &option.id, config),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, ConfigOption};
    use crate::config::IncompatibilityPolicy;
    use crate::ids::ProductId;
    use crate::money::{Currency, Money};
    use crate::rules::{IncompatibilityRule, RuleSet};

    fn usd(cents: i64) -> Money {
        Money::new(cents, Currency::USD)
    }

    fn catalog() -> ProductCatalog {
        let categories = vec![
            Category::new("wheels", "Wheels", true)
                .with_option(ConfigOption::new("fat", "Fat bike wheels", usd(5000), 3))
                .with_option(ConfigOption::new("road", "Road wheels", usd(4000), 3)),
            Category::new("rim", "Rim Color", true)
                .with_sort_order(1)
                .with_option(ConfigOption::new("red", "Red", usd(1500), 3))
                .with_option(ConfigOption::new("black", "Black", usd(1000), 3))
                .with_option(ConfigOption::new("gold", "Gold", usd(9000), 0)),
            Category::new("chain", "Chain", false)
                .with_sort_order(2)
                .with_option(ConfigOption::new("single", "Single-speed", usd(4300), 3))
                .with_option(ConfigOption::new("eight", "8-speed", usd(5500), 3).unavailable()),
        ];
        let rules = RuleSet::new(
            vec![
                IncompatibilityRule::new(
                    RuleId::new("r1"),
                    "Fat wheels need dark rims",
                    [OptionId::new("fat"), OptionId::new("red")],
                )
                .unwrap(),
                IncompatibilityRule::new(
                    RuleId::new("r2"),
                    "Road single",
                    [OptionId::new("road"), OptionId::new("black"), OptionId::new("single")],
                )
                .unwrap(),
                IncompatibilityRule::new(
                    RuleId::new("r3"),
                    "Wheel swap",
                    [OptionId::new("fat"), OptionId::new("road")],
                )
                .unwrap(),
            ],
            vec![],
        );
        ProductCatalog::new(ProductId::new("bike"), "Bike", usd(0), categories, rules).unwrap()
    }

    fn select(pairs: &[(&str, &str)]) -> Selection {
        pairs
            .iter()
            .map(|(c, o)| (CategoryId::new(*c), OptionId::new(*o)))
            .collect()
    }

    fn check(catalog: &ProductCatalog, selection: &Selection, category: &str, option: &str) -> Availability {
        resolve(
            catalog,
            selection,
            &CategoryId::new(category),
            &OptionId::new(option),
            &EngineConfig::default(),
        )
    }

    #[test]
    fn test_empty_selection_available() {
        let catalog = catalog();
        assert!(check(&catalog, &Selection::new(), "rim", "red").is_available());
    }

    #[test]
    fn test_out_of_stock() {
        let catalog = catalog();
        let selection = Selection::new();
        assert_eq!(
            check(&catalog, &selection, "rim", "gold"),
            Availability::Unavailable(UnavailabilityReason::OutOfStock)
        );
        assert_eq!(
            check(&catalog, &selection, "chain", "eight").reason().map(|r| r.code()),
            Some("OUT_OF_STOCK")
        );
    }

    #[test]
    fn test_current_choice_always_available() {
        let catalog = catalog();
        let selection = select(&[("rim", "gold")]);
        assert!(check(&catalog, &selection, "rim", "gold").is_available());
    }

    #[test]
    fn test_stock_precedes_incompatibility() {
        let catalog = catalog();
        let selection = select(&[("wheels", "road"), ("rim", "black")]);
        assert_eq!(
            check(&catalog, &selection, "chain", "eight"),
            Availability::Unavailable(UnavailabilityReason::OutOfStock)
        );
    }

    #[test]
    fn test_incompatible_pair() {
        let catalog = catalog();
        let selection = select(&[("wheels", "fat")]);
        match check(&catalog, &selection, "rim", "red") {
            Availability::Unavailable(UnavailabilityReason::Incompatible {
                rule_id,
                conflicting_with,
                ..
            }) => {
                assert_eq!(rule_id, RuleId::new("r1"));
                assert_eq!(conflicting_with, vec![OptionId::new("fat")]);
            }
            other => panic!("expected incompatibility, got {other:?}"),
        }
        assert!(check(&catalog, &selection, "rim", "black").is_available());
    }

    #[test]
    fn test_rule_is_symmetric() {
        let catalog = catalog();
        let selection = select(&[("rim", "red")]);
        assert_eq!(
            check(&catalog, &selection, "wheels", "fat").reason().map(|r| r.code()),
            Some("INCOMPATIBLE")
        );
    }

    #[test]
    fn test_same_category_choice_still_blocks() {
        let catalog = catalog();
        // "fat" and "road" share a rule and a category; the current choice counts.
        let selection = select(&[("wheels", "fat")]);
        match check(&catalog, &selection, "wheels", "road") {
            Availability::Unavailable(UnavailabilityReason::Incompatible {
                rule_id,
                conflicting_with,
                ..
            }) => {
                assert_eq!(rule_id, RuleId::new("r3"));
                assert_eq!(conflicting_with, vec![OptionId::new("fat")]);
            }
            other => panic!("expected incompatibility, got {other:?}"),
        }

        // Clearing the category frees the other member.
        assert!(check(&catalog, &Selection::new(), "wheels", "road").is_available());

        // Another category's choice keeps blocking whatever rim is current.
        let selection = select(&[("wheels", "fat"), ("rim", "black")]);
        assert!(!check(&catalog, &selection, "rim", "red").is_available());
    }

    #[test]
    fn test_full_set_policy_waits_for_last_member() {
        let catalog = catalog();
        let config = EngineConfig::default().with_incompatibility(IncompatibilityPolicy::FullSet);
        let chain = CategoryId::new("chain");
        let single = OptionId::new("single");

        let partial = select(&[("wheels", "road")]);
        assert!(resolve(&catalog, &partial, &chain, &single, &config).is_available());

        let complete = select(&[("wheels", "road"), ("rim", "black")]);
        assert!(!resolve(&catalog, &complete, &chain, &single, &config).is_available());

        // Under the default policy one other member is enough.
        assert!(!check(&catalog, &partial, "chain", "single").is_available());
    }

    #[test]
    fn test_unknown_option_never_available() {
        let catalog = catalog();
        let selection = Selection::new();
        assert_eq!(
            check(&catalog, &selection, "rim", "ghost"),
            Availability::Unavailable(UnavailabilityReason::UnknownOption)
        );
        // Real option, wrong category.
        assert_eq!(
            check(&catalog, &selection, "wheels", "red"),
            Availability::Unavailable(UnavailabilityReason::UnknownOption)
        );
    }

    #[test]
    fn test_availability_for_category() {
        let catalog = catalog();
        let selection = select(&[("wheels", "fat")]);
        let listing = availability_for_category(
            &catalog,
            &selection,
            &CategoryId::new("rim"),
            &EngineConfig::default(),
        );
        let codes: Vec<Option<&str>> = listing
            .iter()
            .map(|o| o.availability.reason().map(|r| r.code()))
            .collect();
        assert_eq!(codes, vec![Some("INCOMPATIBLE"), None, Some("OUT_OF_STOCK")]);
    }

    #[test]
    fn test_reason_serialization() {
        let json = serde_json::to_value(UnavailabilityReason::Incompatible {
            rule_id: RuleId::new("r1"),
            rule_name: "n".to_string(),
            conflicting_with: vec![OptionId::new("fat")],
        })
        .unwrap();
        assert_eq!(json["code"], "INCOMPATIBLE");
        assert_eq!(json["ruleId"], "r1");
    }
}
