//! Batch validation of a candidate configuration.
//!
//! Unlike [`resolve`](crate::engine::resolve), which answers "can I pick this
//! now", the validator re-checks a whole configuration from scratch and
//! collects every violation. It does not trust that the rules were enforced
//! while the selection was built.

use crate::catalog::ProductCatalog;
use crate::config::EngineConfig;
use crate::engine::Selection;
use crate::ids::{OptionId, RuleId};
use serde::{Deserialize, Serialize};

/// A triggered incompatibility rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncompatibilityViolation {
    pub rule_id: RuleId,
    pub rule_name: String,
    pub rule_description: Option<String>,
    /// Selected members of the rule.
    pub conflicting_options: Vec<OptionId>,
}

/// Outcome of validating a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationResult {
    pub is_valid: bool,
    /// Names of required categories without a selection, in step order.
    pub missing_required_categories: Vec<String>,
    /// Triggered rules in declaration order.
    pub incompatibilities: Vec<IncompatibilityViolation>,
    /// Selected options that are out of stock, withdrawn or unknown.
    pub unavailable_options: Vec<OptionId>,
    /// Names of categories that were given more than one option.
    #[serde(default)]
    pub duplicate_categories: Vec<String>,
}

impl ConfigurationResult {
    fn new() -> Self {
        Self {
            is_valid: true,
            missing_required_categories: Vec::new(),
            incompatibilities: Vec::new(),
            unavailable_options: Vec::new(),
            duplicate_categories: Vec::new(),
        }
    }

    fn finish(mut self) -> Self {
        self.is_valid = self.missing_required_categories.is_empty()
            && self.incompatibilities.is_empty()
            && self.unavailable_options.is_empty()
            && self.duplicate_categories.is_empty();
        self
    }

    /// Total number of recorded violations.
    pub fn violation_count(&self) -> usize {
        self.missing_required_categories.len()
            + self.incompatibilities.len()
            + self.unavailable_options.len()
            + self.duplicate_categories.len()
    }
}

/// Validate a per-category selection.
pub fn validate(catalog: &ProductCatalog, selection: &Selection, config: &EngineConfig) -> ConfigurationResult {
    let chosen = ordered_choices(catalog, selection);
    check(catalog, selection, &chosen, config).finish()
}

/// Validate the flat option list a client submits with an order.
///
/// Ids outside the product are reported as unavailable. A category given
/// several options is reported by name; every submitted option still takes
/// part in the stock and incompatibility checks.
pub fn validate_option_ids(
    catalog: &ProductCatalog,
    option_ids: &[OptionId],
    config: &EngineConfig,
) -> ConfigurationResult {
    let (selection, issues) = Selection::from_option_ids(catalog, option_ids);

    let mut chosen = ordered_choices(catalog, &selection);
    chosen.extend(issues.displaced_options.iter().cloned());

    let mut result = check(catalog, &selection, &chosen, config);
    for unknown in issues.unknown_options {
        if !result.unavailable_options.contains(&unknown) {
            result.unavailable_options.push(unknown);
        }
    }
    result.duplicate_categories = issues
        .duplicate_categories
        .iter()
        .filter_map(|id| catalog.category(id))
        .map(|c| c.name.clone())
        .collect();

    result.finish()
}

/// Selected option ids in step order, then any selections keyed by
/// categories the product does not have.
fn ordered_choices(catalog: &ProductCatalog, selection: &Selection) -> Vec<OptionId> {
    let mut chosen: Vec<OptionId> = catalog
        .categories()
        .iter()
        .filter_map(|c| selection.get(&c.id).cloned())
        .collect();
    chosen.extend(
        selection
            .iter()
            .filter(|(category_id, _)| catalog.category(category_id).is_none())
            .map(|(_, option_id)| option_id.clone()),
    );
    chosen
}

fn check(
    catalog: &ProductCatalog,
    selection: &Selection,
    chosen: &[OptionId],
    config: &EngineConfig,
) -> ConfigurationResult {
    let mut result = ConfigurationResult::new();

    for category in catalog.categories().iter().filter(|c| c.is_required) {
        let satisfied = selection
            .get(&category.id)
            .and_then(|option_id| catalog.option_in(&category.id, option_id))
            .is_some();
        if !satisfied {
            result.missing_required_categories.push(category.name.clone());
        }
    }

    for option_id in chosen {
        let usable = catalog.option(option_id).is_some_and(|o| o.is_in_stock());
        if !usable && !result.unavailable_options.contains(option_id) {
            result.unavailable_options.push(option_id.clone());
        }
    }

    // A choice filed under the wrong category, or one the product lacks, is
    // never selectable and never priced.
    for (category_id, option_id) in selection.iter() {
        let misfiled = catalog.option_in(category_id, option_id).is_none();
        if misfiled && !result.unavailable_options.contains(option_id) {
            result.unavailable_options.push(option_id.clone());
        }
    }

    let selected = chosen.iter().cloned().collect();
    for rule in &catalog.rules().incompatibilities {
        if rule.is_triggered(&selected, config.incompatibility) {
            result.incompatibilities.push(IncompatibilityViolation {
                rule_id: rule.id.clone(),
                rule_name: rule.name.clone(),
                rule_description: rule.description.clone(),
                conflicting_options: rule.selected_members(&selected),
            });
        }
    }

    result
}
