//! Cart and configured line item types.

use crate::catalog::ProductCatalog;
use crate::config::EngineConfig;
use crate::engine::{price, validate, validate_option_ids, ConfigurationResult, Selection};
use crate::error::ConfiguratorError;
use crate::ids::{CartId, LineItemId, OptionId, ProductId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: u32 = 9999;

/// A configured product ready for purchase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfiguredItem {
    /// Unique line item identifier.
    pub id: LineItemId,
    /// Product ID.
    pub product_id: ProductId,
    /// Product name (denormalized for display).
    pub product_name: String,
    /// Chosen options; order of selection does not matter.
    pub option_ids: BTreeSet<OptionId>,
    /// Base price plus effective option prices.
    pub unit_price: Money,
    /// Quantity.
    pub quantity: u32,
    /// Total price (unit_price * quantity).
    pub total_price: Money,
}

impl ConfiguredItem {
    /// Validate and price a selection, producing a cart line.
    pub fn from_selection(
        catalog: &ProductCatalog,
        selection: &Selection,
        config: &EngineConfig,
        quantity: u32,
    ) -> Result<Self, ConfiguratorError> {
        check_quantity(quantity)?;

        let result = validate(catalog, selection, config);
        if !result.is_valid {
            return Err(ConfiguratorError::InvalidConfiguration(Box::new(result)));
        }

        let unit_price = price(catalog, selection, config).total;
        let total_price = unit_price.checked_mul(i64::from(quantity))?;
        Ok(Self {
            id: LineItemId::generate(),
            product_id: catalog.id().clone(),
            product_name: catalog.name().to_string(),
            option_ids: selection.selected_option_ids(),
            unit_price,
            quantity,
            total_price,
        })
    }

    /// Check whether two lines describe the same configuration.
    pub fn same_configuration(&self, other: &ConfiguredItem) -> bool {
        self.product_id == other.product_id && self.option_ids == other.option_ids
    }

    /// Re-check this line against a fresh snapshot of its product.
    ///
    /// Returns `None` when the configuration is still valid at the same price.
    pub fn recheck(
        &self,
        catalog: &ProductCatalog,
        config: &EngineConfig,
    ) -> Result<Option<CartIssue>, ConfiguratorError> {
        if &self.product_id != catalog.id() {
            return Err(ConfiguratorError::ProductMismatch {
                expected: self.product_id.to_string(),
                got: catalog.id().to_string(),
            });
        }

        let option_ids: Vec<OptionId> = self.option_ids.iter().cloned().collect();
        let result = validate_option_ids(catalog, &option_ids, config);
        if !result.is_valid {
            return Ok(Some(CartIssue::InvalidConfiguration {
                line_item_id: self.id.clone(),
                result,
            }));
        }

        let (selection, _) = Selection::from_option_ids(catalog, &option_ids);
        let current = price(catalog, &selection, config).total;
        if current != self.unit_price {
            return Ok(Some(CartIssue::PriceChanged {
                line_item_id: self.id.clone(),
                previous: self.unit_price,
                current,
            }));
        }
        Ok(None)
    }

    /// Update the total price based on quantity.
    fn update_total(&mut self) -> Result<(), ConfiguratorError> {
        self.total_price = self.unit_price.checked_mul(i64::from(self.quantity))?;
        Ok(())
    }
}

/// A problem found when re-checking a cart line against a fresh catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CartIssue {
    /// The configuration no longer passes validation.
    InvalidConfiguration {
        line_item_id: LineItemId,
        result: ConfigurationResult,
    },
    /// The configuration is still valid but its price moved.
    PriceChanged {
        line_item_id: LineItemId,
        previous: Money,
        current: Money,
    },
}

impl CartIssue {
    pub fn line_item_id(&self) -> &LineItemId {
        match self {
            CartIssue::InvalidConfiguration { line_item_id, .. } => line_item_id,
            CartIssue::PriceChanged { line_item_id, .. } => line_item_id,
        }
    }
}

/// A shopping cart of configured products.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Unique cart identifier.
    pub id: CartId,
    /// Items in the cart.
    pub items: Vec<ConfiguredItem>,
    /// Cart currency.
    pub currency: Currency,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Cart {
    /// Create an empty cart.
    pub fn new(currency: Currency) -> Self {
        let now = current_timestamp();
        Self {
            id: CartId::generate(),
            items: Vec::new(),
            currency,
            created_at: now,
            updated_at: now,
        }
    }

    /// Add a configured item to the cart.
    ///
    /// An identical configuration already in the cart absorbs the quantity and
    /// takes the incoming item's unit price, which reflects the newer snapshot.
    /// Returns an error if:
    /// - Quantity is zero
    /// - The merged quantity would exceed MAX_QUANTITY_PER_ITEM
    /// - The item is priced in another currency
    pub fn add_item(&mut self, item: ConfiguredItem) -> Result<LineItemId, ConfiguratorError> {
        check_quantity(item.quantity)?;
        if item.unit_price.currency != self.currency {
            return Err(ConfiguratorError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: item.unit_price.currency.code().to_string(),
            });
        }

        if let Some(existing) = self.items.iter_mut().find(|i| i.same_configuration(&item)) {
            let new_quantity = existing.quantity.saturating_add(item.quantity);
            if new_quantity > MAX_QUANTITY_PER_ITEM {
                return Err(ConfiguratorError::QuantityExceedsLimit(
                    new_quantity,
                    MAX_QUANTITY_PER_ITEM,
                ));
            }
            let total_price = item.unit_price.checked_mul(i64::from(new_quantity))?;
            existing.quantity = new_quantity;
            existing.unit_price = item.unit_price;
            existing.total_price = total_price;
            self.updated_at = current_timestamp();
            tracing::debug!(cart = %self.id, line = %existing.id, quantity = new_quantity, "Merged cart line");
            return Ok(existing.id.clone());
        }

        let id = item.id.clone();
        tracing::debug!(cart = %self.id, line = %id, product = %item.product_id, "Added cart line");
        self.items.push(item);
        self.updated_at = current_timestamp();
        Ok(id)
    }

    /// Update item quantity. A quantity of zero removes the item.
    pub fn update_quantity(
        &mut self,
        line_item_id: &LineItemId,
        quantity: u32,
    ) -> Result<(), ConfiguratorError> {
        if quantity == 0 {
            return if self.remove_item(line_item_id) {
                Ok(())
            } else {
                Err(ConfiguratorError::ItemNotInCart(line_item_id.to_string()))
            };
        }
        check_quantity(quantity)?;

        let item = self
            .items
            .iter_mut()
            .find(|i| &i.id == line_item_id)
            .ok_or_else(|| ConfiguratorError::ItemNotInCart(line_item_id.to_string()))?;
        item.quantity = quantity;
        item.update_total()?;
        self.updated_at = current_timestamp();
        Ok(())
    }

    /// Remove an item from the cart.
    pub fn remove_item(&mut self, line_item_id: &LineItemId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.id != line_item_id);
        let removed = self.items.len() < len_before;
        if removed {
            self.updated_at = current_timestamp();
        }
        removed
    }

    /// Clear all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.updated_at = current_timestamp();
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get an item by ID.
    pub fn get_item(&self, line_item_id: &LineItemId) -> Option<&ConfiguredItem> {
        self.items.iter().find(|i| &i.id == line_item_id)
    }

    /// Sum of line totals.
    pub fn total(&self) -> Result<Money, ConfiguratorError> {
        Money::sum(self.items.iter().map(|i| &i.total_price), self.currency)
    }

    /// Re-check every line of `catalog`'s product against the current catalog.
    ///
    /// Lines for other products are skipped rather than reported as a
    /// [`ConfiguratorError::ProductMismatch`].
    pub fn revalidate(&self, catalog: &ProductCatalog, config: &EngineConfig) -> Vec<CartIssue> {
        self.items
            .iter()
            .filter(|i| &i.product_id == catalog.id())
            .filter_map(|item| item.recheck(catalog, config).ok().flatten())
            .inspect(|issue| {
                if matches!(issue, CartIssue::InvalidConfiguration { .. }) {
                    tracing::warn!(cart = %self.id, line = %issue.line_item_id(), "Cart line no longer valid");
                }
            })
            .collect()
    }
}

fn check_quantity(quantity: u32) -> Result<(), ConfiguratorError> {
    if quantity == 0 {
        return Err(ConfiguratorError::InvalidQuantity(quantity));
    }
    if quantity > MAX_QUANTITY_PER_ITEM {
        return Err(ConfiguratorError::QuantityExceedsLimit(
            quantity,
            MAX_QUANTITY_PER_ITEM,
        ));
    }
    Ok(())
}

/// Get current Unix timestamp.
fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, ConfigOption};
    use crate::ids::CategoryId;
    use crate::rules::RuleSet;

    fn usd(cents: i64) -> Money {
        Money::new(cents, Currency::USD)
    }

    fn catalog_with_frame_price(frame_cents: i64, frame_stock: u32) -> ProductCatalog {
        ProductCatalog::new(
            ProductId::new("bike"),
            "Bike",
            usd(10000),
            vec![
                Category::new("frame", "Frame", true)
                    .with_option(ConfigOption::new("full", "Full", usd(frame_cents), frame_stock))
                    .with_option(ConfigOption::new("hard", "Hard", usd(2000), 5)),
                Category::new("bell", "Bell", false)
                    .with_sort_order(1)
                    .with_option(ConfigOption::new("bell", "Bell", usd(500), 5)),
            ],
            RuleSet::default(),
        )
        .unwrap()
    }

    fn selection(pairs: &[(&str, &str)]) -> Selection {
        pairs
            .iter()
            .map(|(c, o)| (CategoryId::new(*c), OptionId::new(*o)))
            .collect()
    }

    fn item(pairs: &[(&str, &str)], quantity: u32) -> ConfiguredItem {
        ConfiguredItem::from_selection(
            &catalog_with_frame_price(3000, 5),
            &selection(pairs),
            &EngineConfig::default(),
            quantity,
        )
        .unwrap()
    }

    #[test]
    fn test_cart_creation() {
        let cart = Cart::new(Currency::USD);
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
        assert!(cart.total().unwrap().is_zero());
    }

    #[test]
    fn test_item_from_selection() {
        let line = item(&[("frame", "full"), ("bell", "bell")], 2);
        assert_eq!(line.unit_price, usd(13500));
        assert_eq!(line.total_price, usd(27000));
        assert_eq!(line.option_ids.len(), 2);
    }

    #[test]
    fn test_invalid_configuration_refused() {
        let result = ConfiguredItem::from_selection(
            &catalog_with_frame_price(3000, 5),
            &selection(&[("bell", "bell")]),
            &EngineConfig::default(),
            1,
        );
        match result {
            Err(ConfiguratorError::InvalidConfiguration(result)) => {
                assert_eq!(result.missing_required_categories, vec!["Frame".to_string()]);
            }
            other => panic!("expected InvalidConfiguration, got {other:?}"),
        }
    }

    #[test]
    fn test_add_same_configuration_merges() {
        let mut cart = Cart::new(Currency::USD);
        let first = cart.add_item(item(&[("frame", "full"), ("bell", "bell")], 1)).unwrap();
        // Same options, different selection order.
        let second = cart.add_item(item(&[("bell", "bell"), ("frame", "full")], 2)).unwrap();

        assert_eq!(first, second);
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.total().unwrap(), usd(13500 * 3));
    }

    #[test]
    fn test_different_configurations_stay_apart() {
        let mut cart = Cart::new(Currency::USD);
        cart.add_item(item(&[("frame", "full")], 1)).unwrap();
        cart.add_item(item(&[("frame", "full"), ("bell", "bell")], 1)).unwrap();
        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.total().unwrap(), usd(13000 + 13500));
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = Cart::new(Currency::USD);
        let line_id = cart.add_item(item(&[("frame", "hard")], 1)).unwrap();

        cart.update_quantity(&line_id, 5).unwrap();
        assert_eq!(cart.item_count(), 5);
        assert_eq!(cart.get_item(&line_id).map(|i| i.total_price), Some(usd(60000)));

        cart.update_quantity(&line_id, 0).unwrap();
        assert!(cart.is_empty());
        assert!(matches!(
            cart.update_quantity(&line_id, 1),
            Err(ConfiguratorError::ItemNotInCart(_))
        ));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = Cart::new(Currency::USD);
        let line_id = cart.add_item(item(&[("frame", "hard")], 1)).unwrap();
        cart.add_item(item(&[("frame", "full")], 1)).unwrap();

        assert!(cart.remove_item(&line_id));
        assert!(!cart.remove_item(&line_id));
        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_quantity_limit() {
        let mut cart = Cart::new(Currency::USD);
        cart.add_item(item(&[("frame", "hard")], MAX_QUANTITY_PER_ITEM)).unwrap();
        let result = cart.add_item(item(&[("frame", "hard")], 1));
        assert!(matches!(result, Err(ConfiguratorError::QuantityExceedsLimit(10000, 9999))));

        let result = ConfiguredItem::from_selection(
            &catalog_with_frame_price(3000, 5),
            &selection(&[("frame", "hard")]),
            &EngineConfig::default(),
            0,
        );
        assert!(matches!(result, Err(ConfiguratorError::InvalidQuantity(0))));
    }

    #[test]
    fn test_currency_mismatch() {
        let mut cart = Cart::new(Currency::EUR);
        assert!(matches!(
            cart.add_item(item(&[("frame", "hard")], 1)),
            Err(ConfiguratorError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_revalidate_reports_price_change_and_stock() {
        let mut cart = Cart::new(Currency::USD);
        let full = cart.add_item(item(&[("frame", "full")], 1)).unwrap();
        let hard = cart.add_item(item(&[("frame", "hard")], 1)).unwrap();
        let config = EngineConfig::default();

        assert!(cart.revalidate(&catalog_with_frame_price(3000, 5), &config).is_empty());

        let repriced = cart.revalidate(&catalog_with_frame_price(3500, 5), &config);
        assert_eq!(repriced.len(), 1);
        assert_eq!(
            repriced[0],
            CartIssue::PriceChanged {
                line_item_id: full.clone(),
                previous: usd(13000),
                current: usd(13500),
            }
        );

        let sold_out = cart.revalidate(&catalog_with_frame_price(3000, 0), &config);
        assert_eq!(sold_out.len(), 1);
        assert_eq!(sold_out[0].line_item_id(), &full);
        assert_ne!(sold_out[0].line_item_id(), &hard);
        match &sold_out[0] {
            CartIssue::InvalidConfiguration { result, .. } => {
                assert_eq!(result.unavailable_options, vec![OptionId::new("full")]);
            }
            other => panic!("expected InvalidConfiguration, got {other:?}"),
        }
    }

    #[test]
    fn test_merge_takes_newer_unit_price() {
        let mut cart = Cart::new(Currency::USD);
        let line_id = cart.add_item(item(&[("frame", "full")], 1)).unwrap();

        let repriced = ConfiguredItem::from_selection(
            &catalog_with_frame_price(3500, 5),
            &selection(&[("frame", "full")]),
            &EngineConfig::default(),
            2,
        )
        .unwrap();
        assert_eq!(cart.add_item(repriced).unwrap(), line_id);

        let line = cart.get_item(&line_id).unwrap();
        assert_eq!(line.quantity, 3);
        assert_eq!(line.unit_price, usd(13500));
        assert_eq!(line.total_price, usd(13500 * 3));
        assert!(cart
            .revalidate(&catalog_with_frame_price(3500, 5), &EngineConfig::default())
            .is_empty());
    }

    #[test]
    fn test_recheck_against_other_product() {
        let line = item(&[("frame", "hard")], 1);
        let other = ProductCatalog::new(
            ProductId::new("trailer"),
            "Trailer",
            usd(5000),
            vec![],
            RuleSet::default(),
        )
        .unwrap();
        let config = EngineConfig::default();

        assert!(matches!(
            line.recheck(&other, &config),
            Err(ConfiguratorError::ProductMismatch { .. })
        ));
        assert_eq!(line.recheck(&catalog_with_frame_price(3000, 5), &config).unwrap(), None);

        let mut cart = Cart::new(Currency::USD);
        cart.add_item(line).unwrap();
        assert!(cart.revalidate(&other, &config).is_empty());
    }
}
