//! Shopping cart module.
//!
//! Holds validated, priced configurations. Lines with the same product and
//! option set are merged.

mod cart;

pub use cart::{Cart, CartIssue, ConfiguredItem, MAX_QUANTITY_PER_ITEM};
