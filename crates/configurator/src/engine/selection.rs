//! Per-category option choices.

use crate::catalog::ProductCatalog;
use crate::ids::{CategoryId, OptionId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Mapping from category to its chosen option; absence means "none".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    choices: BTreeMap<CategoryId, OptionId>,
}

/// Problems found while turning a flat option list into a [`Selection`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionIssues {
    /// Ids that are not options of the product, in input order.
    pub unknown_options: Vec<OptionId>,
    /// Categories that received more than one option, in step order.
    pub duplicate_categories: Vec<CategoryId>,
    /// Options dropped because their category was already filled, in input order.
    pub displaced_options: Vec<OptionId>,
}

impl SelectionIssues {
    pub fn is_empty(&self) -> bool {
        self.unknown_options.is_empty() && self.duplicate_categories.is_empty()
    }
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection from the flat option list a client submits.
    ///
    /// The first option seen for a category wins; later ones are reported.
    pub fn from_option_ids<'a>(
        catalog: &ProductCatalog,
        option_ids: impl IntoIterator<Item = &'a OptionId>,
    ) -> (Self, SelectionIssues) {
        let mut selection = Selection::new();
        let mut issues = SelectionIssues::default();
        let mut duplicates = BTreeSet::new();

        for option_id in option_ids {
            let Some(option) = catalog.option(option_id) else {
                if !issues.unknown_options.contains(option_id) {
                    issues.unknown_options.push(option_id.clone());
                }
                continue;
            };
            match selection.get(&option.category_id) {
                None => {
                    selection.set(option.category_id.clone(), option_id.clone());
                }
                Some(existing) if existing == option_id => {}
                Some(_) => {
                    if let Some(step) = catalog.step_of(&option.category_id) {
                        duplicates.insert(step);
                    }
                    if !issues.displaced_options.contains(option_id) {
                        issues.displaced_options.push(option_id.clone());
                    }
                }
            }
        }

        issues.duplicate_categories = duplicates
            .into_iter()
            .filter_map(|step| catalog.category_at(step))
            .map(|c| c.id.clone())
            .collect();

        (selection, issues)
    }

    /// Option chosen for a category.
    pub fn get(&self, category_id: &CategoryId) -> Option<&OptionId> {
        self.choices.get(category_id)
    }

    /// Choose an option, returning the one it replaced.
    pub fn set(&mut self, category_id: CategoryId, option_id: OptionId) -> Option<OptionId> {
        self.choices.insert(category_id, option_id)
    }

    /// Clear a category, returning the option it held.
    pub fn clear(&mut self, category_id: &CategoryId) -> Option<OptionId> {
        self.choices.remove(category_id)
    }

    pub fn clear_all(&mut self) {
        self.choices.clear();
    }

    /// Check whether an option is chosen in any category.
    pub fn is_selected(&self, option_id: &OptionId) -> bool {
        self.choices.values().any(|o| o == option_id)
    }

    /// All chosen options.
    pub fn selected_option_ids(&self) -> BTreeSet<OptionId> {
        self.choices.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CategoryId, &OptionId)> {
        self.choices.iter()
    }
}

impl FromIterator<(CategoryId, OptionId)> for Selection {
    fn from_iter<I: IntoIterator<Item = (CategoryId, OptionId)>>(iter: I) -> Self {
        Self {
            choices: iter.into_iter().collect(),
        }
    }
}
