//! Immutable per-product catalog snapshot.

use crate::catalog::{Category, ConfigOption};
use crate::error::ConfiguratorError;
use crate::ids::{CategoryId, OptionId, ProductId};
use crate::money::{Currency, Money};
use crate::rules::RuleSet;
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

/// A configurable product with its ordered categories and rules.
///
/// Built once per configuration session and never mutated afterwards; every
/// engine function takes it by shared reference.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductCatalog {
    id: ProductId,
    name: String,
    description: Option<String>,
    base_price: Money,
    categories: Vec<Category>,
    rules: RuleSet,
    #[serde(skip)]
    category_index: HashMap<CategoryId, usize>,
    #[serde(skip)]
    option_index: HashMap<OptionId, (usize, usize)>,
}

impl ProductCatalog {
    /// Build a snapshot.
    ///
    /// Categories are ordered by `sort_order`, keeping input order for ties.
    /// Duplicate ids, negative prices and mixed currencies are rejected.
    /// Price overrides naming options outside the product are dropped with a
    /// warning; incompatibility members outside the product are kept, since
    /// they can never be selected.
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        base_price: Money,
        mut categories: Vec<Category>,
        mut rules: RuleSet,
    ) -> Result<Self, ConfiguratorError> {
        let currency = base_price.currency;
        if base_price.is_negative() {
            return Err(ConfiguratorError::InvalidPrice {
                field: "basePrice".to_string(),
                value: base_price.to_decimal(),
            });
        }

        categories.sort_by_key(|c| c.sort_order);

        let mut category_index = HashMap::with_capacity(categories.len());
        let mut option_index = HashMap::new();
        for (ci, category) in categories.iter_mut().enumerate() {
            if category_index.insert(category.id.clone(), ci).is_some() {
                return Err(ConfiguratorError::DuplicateCategory(category.id.to_string()));
            }
            for (oi, option) in category.options.iter_mut().enumerate() {
                option.category_id = category.id.clone();
                check_option_price(option, currency)?;
                if option_index.insert(option.id.clone(), (ci, oi)).is_some() {
                    return Err(ConfiguratorError::DuplicateOption(option.id.to_string()));
                }
            }
        }

        rules.price_overrides.retain(|o| {
            let known = option_index.contains_key(&o.base_option_id)
                && option_index.contains_key(&o.trigger_option_id);
            if !known {
                warn!(
                    product = %id,
                    base = %o.base_option_id,
                    trigger = %o.trigger_option_id,
                    "dropping price override that references an unknown option"
                );
                return false;
            }
            if o.override_price.currency != currency || o.override_price.is_negative() {
                warn!(
                    product = %id,
                    base = %o.base_option_id,
                    price = %o.override_price,
                    "dropping price override with invalid price"
                );
                return false;
            }
            true
        });

        for rule in &rules.incompatibilities {
            let unknown: Vec<&str> = rule
                .option_ids
                .iter()
                .filter(|o| !option_index.contains_key(*o))
                .map(|o| o.as_str())
                .collect();
            if !unknown.is_empty() {
                warn!(
                    product = %id,
                    rule = %rule.id,
                    unknown = ?unknown,
                    "incompatibility rule references options outside the product"
                );
            }
        }

        Ok(Self {
            id,
            name: name.into(),
            description: None,
            base_price,
            categories,
            rules,
            category_index,
            option_index,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn base_price(&self) -> Money {
        self.base_price
    }

    pub fn currency(&self) -> Currency {
        self.base_price.currency
    }

    /// Categories in wizard order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn category(&self, category_id: &CategoryId) -> Option<&Category> {
        self.category_index
            .get(category_id)
            .map(|&i| &self.categories[i])
    }

    /// Category configured at wizard step `step`.
    pub fn category_at(&self, step: usize) -> Option<&Category> {
        self.categories.get(step)
    }

    /// Wizard step of a category.
    pub fn step_of(&self, category_id: &CategoryId) -> Option<usize> {
        self.category_index.get(category_id).copied()
    }

    pub fn option(&self, option_id: &OptionId) -> Option<&ConfigOption> {
        self.option_index
            .get(option_id)
            .map(|&(ci, oi)| &self.categories[ci].options[oi])
    }

    /// Option lookup restricted to one category.
    pub fn option_in(&self, category_id: &CategoryId, option_id: &OptionId) -> Option<&ConfigOption> {
        self.option(option_id)
            .filter(|o| &o.category_id == category_id)
    }

    /// Category that owns `option_id`.
    pub fn category_of(&self, option_id: &OptionId) -> Option<&Category> {
        self.option_index
            .get(option_id)
            .map(|&(ci, _)| &self.categories[ci])
    }
}

fn check_option_price(option: &ConfigOption, currency: Currency) -> Result<(), ConfiguratorError> {
    if option.price.currency != currency {
        return Err(ConfiguratorError::CurrencyMismatch {
            expected: currency.code().to_string(),
            got: option.price.currency.code().to_string(),
        });
    }
    if option.price.is_negative() {
        return Err(ConfiguratorError::InvalidPrice {
            field: format!("option {}", option.id),
            value: option.price.to_decimal(),
        });
    }
    Ok(())
}
