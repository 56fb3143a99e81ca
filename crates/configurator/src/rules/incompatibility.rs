//! Incompatibility rules.

use crate::config::IncompatibilityPolicy;
use crate::ids::{OptionId, RuleId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A named set of options that must not be selected together.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IncompatibilityRule {
    /// Rule identifier.
    pub id: RuleId,
    /// Rule name shown to the shopper.
    pub name: String,
    /// Optional longer explanation.
    pub description: Option<String>,
    /// Member options; always at least two distinct ids.
    pub option_ids: BTreeSet<OptionId>,
}

impl IncompatibilityRule {
    /// Create a rule. Returns `None` when fewer than two distinct members remain.
    pub fn new(
        id: RuleId,
        name: impl Into<String>,
        option_ids: impl IntoIterator<Item = OptionId>,
    ) -> Option<Self> {
        let option_ids: BTreeSet<OptionId> = option_ids.into_iter().collect();
        if option_ids.len() < 2 {
            return None;
        }
        Some(Self {
            id,
            name: name.into(),
            description: None,
            option_ids,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Check whether an option is a member of this rule.
    pub fn contains(&self, option_id: &OptionId) -> bool {
        self.option_ids.contains(option_id)
    }

    /// Members of this rule that are currently selected, in id order.
    pub fn selected_members(&self, selected: &BTreeSet<OptionId>) -> Vec<OptionId> {
        self.option_ids.intersection(selected).cloned().collect()
    }

    /// Check whether the selected set violates this rule.
    pub fn is_triggered(&self, selected: &BTreeSet<OptionId>, policy: IncompatibilityPolicy) -> bool {
        let hits = self.option_ids.intersection(selected).count();
        match policy {
            IncompatibilityPolicy::AnyPair => hits >= 2,
            IncompatibilityPolicy::FullSet => hits == self.option_ids.len(),
        }
    }

    /// Selected members that would make `candidate` violate this rule.
    ///
    /// Empty when the candidate is not a member or adding it would leave the
    /// rule satisfied. The candidate itself is never counted as selected.
    pub fn blockers(
        &self,
        candidate: &OptionId,
        selected: &BTreeSet<OptionId>,
        policy: IncompatibilityPolicy,
    ) -> Vec<OptionId> {
        if !self.contains(candidate) {
            return Vec::new();
        }
        let others: Vec<OptionId> = self
            .option_ids
            .iter()
            .filter(|id| *id != candidate && selected.contains(*id))
            .cloned()
            .collect();
        let fires = match policy {
            IncompatibilityPolicy::AnyPair => !others.is_empty(),
            IncompatibilityPolicy::FullSet => others.len() == self.option_ids.len() - 1,
        };
        if fires {
            others
        } else {
            Vec::new()
        }
    }
}
