//! The rule engine.
//!
//! Pure functions over a [`ProductCatalog`](crate::catalog::ProductCatalog)
//! and a [`Selection`], plus the [`ConfigurationSession`] wizard that drives
//! them one step at a time.

mod compatibility;
mod pricing;
mod selection;
mod session;
mod validator;

pub use compatibility::{
    availability_for_category, resolve, Availability, OptionAvailability, UnavailabilityReason,
};
pub use pricing::{price, quote_option, AppliedOverride, OptionQuote, PriceBreakdown, PriceLine};
pub use selection::{Selection, SelectionIssues};
pub use session::{ConfigurationSession, SelectionOutcome};
pub use validator::{validate, validate_option_ids, ConfigurationResult, IncompatibilityViolation};
