//! Configurator error types.
//!
//! The compatibility resolver, price resolver and validator are total
//! functions and never produce these; rejected selections are reported as
//! data. Errors cover catalog ingestion, wizard navigation and the cart.

use crate::engine::ConfigurationResult;
use thiserror::Error;

/// Errors that can occur outside the pure rule engine.
#[derive(Error, Debug)]
pub enum ConfiguratorError {
    /// Catalog document is structurally unusable.
    #[error("Invalid catalog document: {0}")]
    InvalidDocument(String),

    /// Two categories share an identifier.
    #[error("Duplicate category id: {0}")]
    DuplicateCategory(String),

    /// Two options share an identifier.
    #[error("Duplicate option id: {0}")]
    DuplicateOption(String),

    /// A price is negative or not a finite number.
    #[error("Invalid price for {field}: {value}")]
    InvalidPrice { field: String, value: f64 },

    /// The current step's required category has no selection.
    #[error("Category '{category}' requires a selection before continuing")]
    StepIncomplete { category: String },

    /// Wizard navigation outside the step range.
    #[error("Invalid step transition from {from} to {to}")]
    InvalidStepTransition { from: usize, to: usize },

    /// Configuration failed validation and cannot be added to a cart.
    #[error("Configuration is not valid: {}", summarize(.0))]
    InvalidConfiguration(Box<ConfigurationResult>),

    /// Cart item refers to a different product than the catalog.
    #[error("Product mismatch: expected {expected}, got {got}")]
    ProductMismatch { expected: String, got: String },

    /// Item not in cart.
    #[error("Item not in cart: {0}")]
    ItemNotInCart(String),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(u32, u32),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Engine configuration could not be parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn summarize(result: &ConfigurationResult) -> String {
    let mut parts = Vec::new();
    if !result.missing_required_categories.is_empty() {
        parts.push(format!(
            "missing {}",
            result.missing_required_categories.join(", ")
        ));
    }
    if !result.unavailable_options.is_empty() {
        parts.push(format!(
            "{} unavailable option(s)",
            result.unavailable_options.len()
        ));
    }
    if !result.incompatibilities.is_empty() {
        let names: Vec<&str> = result
            .incompatibilities
            .iter()
            .map(|v| v.rule_name.as_str())
            .collect();
        parts.push(format!("incompatible ({})", names.join(", ")));
    }
    if !result.duplicate_categories.is_empty() {
        parts.push(format!(
            "several options for {}",
            result.duplicate_categories.join(", ")
        ));
    }
    parts.join("; ")
}
