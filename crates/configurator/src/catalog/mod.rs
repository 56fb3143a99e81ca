//! Product catalog module.
//!
//! Contains the immutable product snapshot the engine works on and the wire
//! documents it is built from.

mod category;
mod document;
mod option;
mod product;

pub use category::Category;
pub use document::{
    CatalogDocument, CategoryDocument, IncompatibilityRuleDocument, OptionDocument, OptionRef,
    PriceOverrideDocument, ProductDocument,
};
pub use option::ConfigOption;
pub use product::ProductCatalog;
