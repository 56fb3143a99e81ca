//! Newtype IDs for type-safe identifiers.
//!
//! Catalog documents may carry integer keys (the product service stores
//! them as serial columns) or strings; both deserialize into the same
//! string-backed newtype so an `OptionId` can never be passed where a
//! `CategoryId` is expected.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// A unique identifier.
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<u64> for $name {
            fn from(n: u64) -> Self {
                Self(n.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                RawId::deserialize(deserializer).map(|raw| Self(raw.into_string()))
            }
        }
    };
}

/// Adds `generate()` to IDs the engine mints itself.
macro_rules! generated_id {
    ($name:ident, $prefix:literal) => {
        impl $name {
            /// Generate a new unique ID.
            pub fn generate() -> Self {
                Self(generate_id($prefix))
            }
        }
    };
}

define_id!(ProductId);
define_id!(CategoryId);
define_id!(OptionId);
define_id!(RuleId);
define_id!(CartId);
define_id!(LineItemId);
define_id!(SessionId);

generated_id!(CartId, "cart");
generated_id!(LineItemId, "line");
generated_id!(SessionId, "cfg");

/// Wire form of an identifier: JSON string or non-negative integer.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

/// Generate a unique ID from the wall clock and a process-wide counter.
fn generate_id(prefix: &str) -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let counter = COUNTER.fetch_add(1, Ordering::Relaxed);

    format!("{prefix}-{timestamp:x}-{counter:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = OptionId::new("opt-12");
        assert_eq!(id.as_str(), "opt-12");
        assert_eq!(id.to_string(), "opt-12");
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("cfg-"));
    }

    #[test]
    fn test_numeric_ids_deserialize_as_strings() {
        let ids: Vec<OptionId> = serde_json::from_str(r#"[7, "8"]"#).unwrap();
        assert_eq!(ids, vec![OptionId::new("7"), OptionId::new("8")]);
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let json = serde_json::to_string(&CategoryId::new("frame")).unwrap();
        assert_eq!(json, r#""frame""#);
    }
}
