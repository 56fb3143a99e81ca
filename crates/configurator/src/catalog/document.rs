//! Wire documents handed over by the catalog service.
//!
//! Field names follow the product API (`basePrice`, `isRequired`,
//! `stockQuantity`, ...). Defaults mirror the storage defaults of that
//! service: categories are required, options are available with 100 units.

use crate::catalog::{Category, ConfigOption, ProductCatalog};
use crate::error::ConfiguratorError;
use crate::ids::{CategoryId, OptionId, ProductId, RuleId};
use crate::money::{Currency, Money};
use crate::rules::{IncompatibilityRule, PriceOverride, RuleSet};
use serde::{Deserialize, Serialize};
use tracing::warn;

const DEFAULT_STOCK: i64 = 100;

fn default_true() -> bool {
    true
}

fn default_stock() -> i64 {
    DEFAULT_STOCK
}

/// Product with embedded categories and options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDocument {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub base_price: f64,
    /// ISO code; USD when absent.
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub categories: Vec<CategoryDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDocument {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_required: bool,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub options: Vec<OptionDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionDocument {
    pub id: OptionId,
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default = "default_stock")]
    pub stock_quantity: i64,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

/// Reference to an option nested inside a rule (`options: [{ id }]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionRef {
    pub id: OptionId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncompatibilityRuleDocument {
    pub id: RuleId,
    #[serde(alias = "ruleName")]
    pub name: String,
    #[serde(default, alias = "ruleDescription")]
    pub description: Option<String>,
    #[serde(default)]
    pub option_ids: Vec<OptionId>,
    #[serde(default)]
    pub options: Vec<OptionRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceOverrideDocument {
    pub base_option_id: OptionId,
    pub trigger_option_id: OptionId,
    /// Nullable in storage; overrides without a price are ignored.
    #[serde(default)]
    pub override_price: Option<f64>,
}

/// A product together with its auxiliary rule collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDocument {
    pub product: ProductDocument,
    #[serde(default)]
    pub incompatibility_rules: Vec<IncompatibilityRuleDocument>,
    #[serde(default, alias = "priceModifiers")]
    pub price_overrides: Vec<PriceOverrideDocument>,
}

impl CatalogDocument {
    /// Convert into an engine snapshot.
    pub fn into_catalog(self) -> Result<ProductCatalog, ConfiguratorError> {
        ProductCatalog::from_document(self.product, self.incompatibility_rules, self.price_overrides)
    }
}

impl ProductCatalog {
    /// Parse a [`CatalogDocument`] from JSON and build the snapshot.
    pub fn from_json(json: &str) -> Result<Self, ConfiguratorError> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        document.into_catalog()
    }

    /// Build a snapshot from the service documents.
    pub fn from_document(
        product: ProductDocument,
        rules: Vec<IncompatibilityRuleDocument>,
        overrides: Vec<PriceOverrideDocument>,
    ) -> Result<Self, ConfiguratorError> {
        let currency = match product.currency.as_deref() {
            None => Currency::default(),
            Some(code) => Currency::from_code(code).ok_or_else(|| {
                ConfiguratorError::InvalidDocument(format!("unsupported currency '{code}'"))
            })?,
        };

        let base_price = to_money(product.base_price, currency, "basePrice")?;

        let categories = product
            .categories
            .into_iter()
            .map(|c| convert_category(c, currency))
            .collect::<Result<Vec<_>, _>>()?;

        let incompatibilities = rules
            .into_iter()
            .filter_map(|doc| convert_rule(&product.id, doc))
            .collect();

        let price_overrides = overrides
            .into_iter()
            .filter_map(|doc| convert_override(&product.id, doc, currency))
            .collect();

        let catalog = ProductCatalog::new(
            product.id,
            product.name,
            base_price,
            categories,
            RuleSet::new(incompatibilities, price_overrides),
        )?;

        Ok(match product.description {
            Some(description) => catalog.with_description(description),
            None => catalog,
        })
    }
}

fn to_money(amount: f64, currency: Currency, field: &str) -> Result<Money, ConfiguratorError> {
    Money::from_decimal(amount, currency)
        .filter(|m| !m.is_negative())
        .ok_or_else(|| ConfiguratorError::InvalidPrice {
            field: field.to_string(),
            value: amount,
        })
}

fn convert_category(doc: CategoryDocument, currency: Currency) -> Result<Category, ConfiguratorError> {
    let mut category = Category::new(doc.id, doc.name, doc.is_required).with_sort_order(doc.sort_order);
    category.description = doc.description;

    for option in doc.options {
        let price = to_money(option.price, currency, &format!("option {}", option.id))?;
        let stock = u32::try_from(option.stock_quantity.max(0)).unwrap_or(u32::MAX);
        if option.stock_quantity < 0 {
            warn!(option = %option.id, stock = option.stock_quantity, "negative stock treated as zero");
        }
        let mut converted = ConfigOption::new(option.id, option.name, price, stock);
        converted.is_available = option.is_available;
        category = category.with_option(converted);
    }

    Ok(category)
}

fn convert_rule(product_id: &ProductId, doc: IncompatibilityRuleDocument) -> Option<IncompatibilityRule> {
    let members = doc
        .option_ids
        .into_iter()
        .chain(doc.options.into_iter().map(|r| r.id));

    match IncompatibilityRule::new(doc.id.clone(), doc.name, members) {
        Some(rule) => Some(match doc.description {
            Some(description) => rule.with_description(description),
            None => rule,
        }),
        None => {
            warn!(
                product = %product_id,
                rule = %doc.id,
                "dropping incompatibility rule with fewer than two distinct options"
            );
            None
        }
    }
}

fn convert_override(
    product_id: &ProductId,
    doc: PriceOverrideDocument,
    currency: Currency,
) -> Option<PriceOverride> {
    let price = doc
        .override_price
        .and_then(|p| Money::from_decimal(p, currency))
        .filter(|m| !m.is_negative());

    match price {
        Some(price) => Some(PriceOverride::new(doc.base_option_id, doc.trigger_option_id, price)),
        None => {
            warn!(
                product = %product_id,
                base = %doc.base_option_id,
                trigger = %doc.trigger_option_id,
                "dropping price override without a usable price"
            );
            None
        }
    }
}
