//! Rule engine for configurable products.
//!
//! A product is configured by choosing at most one option in each of its
//! ordered categories. This crate decides what can be chosen and what it
//! costs:
//!
//! - **Catalog**: Immutable product snapshot with categories, options and rules
//! - **Rules**: Incompatibility sets and conditional price overrides
//! - **Engine**: Compatibility and price resolution, validation, the selection wizard
//! - **Cart**: Validated configurations as purchasable line items
//!
//! # Example
//!
//! ```rust,ignore
//! use configurator::prelude::*;
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(ProductCatalog::from_json(&document)?);
//! let mut session = ConfigurationSession::new(catalog);
//!
//! let frame = CategoryId::new("frame");
//! session.select_option(&frame, Some(OptionId::new("full-suspension")));
//! session.go_to_next_step()?;
//!
//! println!("Total: {}", session.price().total.display());
//! let item = session.to_cart_item(1)?;
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod config;
pub mod catalog;
pub mod rules;
pub mod engine;
pub mod cart;

pub use error::ConfiguratorError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::{EngineConfig, IncompatibilityPolicy, OverridePrecedence};
    pub use crate::error::ConfiguratorError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{CatalogDocument, Category, ConfigOption, ProductCatalog};

    // Rules
    pub use crate::rules::{IncompatibilityRule, PriceOverride, RuleSet};

    // Engine
    pub use crate::engine::{
        availability_for_category, price, quote_option, resolve, validate, validate_option_ids,
        Availability, ConfigurationResult, ConfigurationSession, PriceBreakdown, Selection,
        SelectionOutcome, UnavailabilityReason,
    };

    // Cart
    pub use crate::cart::{Cart, CartIssue, ConfiguredItem};
}
