//! Engine policy configuration.
//!
//! Two behaviors of the rule engine are policy choices rather than facts of
//! the catalog: when an incompatibility rule fires, and which price wins when
//! several overrides for the same base option are active. Both are held in
//! one `EngineConfig` that the resolver, the price calculator and the
//! validator all read, so interactive selection and server-side
//! re-validation cannot disagree.

use crate::error::ConfiguratorError;
use serde::{Deserialize, Serialize};

/// When an incompatibility rule counts as violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IncompatibilityPolicy {
    /// Any two members of the rule selected together violate it.
    #[default]
    AnyPair,
    /// The rule is violated only once every member is selected.
    FullSet,
}

impl IncompatibilityPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncompatibilityPolicy::AnyPair => "any_pair",
            IncompatibilityPolicy::FullSet => "full_set",
        }
    }
}

/// Which override applies when several target the same base option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OverridePrecedence {
    /// The applicable override declared last wins.
    #[default]
    LastDeclared,
    /// The smallest applicable override price wins; ties go to the one declared last.
    LowestPrice,
}

impl OverridePrecedence {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverridePrecedence::LastDeclared => "last_declared",
            OverridePrecedence::LowestPrice => "lowest_price",
        }
    }
}

/// Rule engine policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Incompatibility semantics shared by resolver and validator.
    #[serde(default)]
    pub incompatibility: IncompatibilityPolicy,
    /// Tie-break between simultaneously active price overrides.
    #[serde(default)]
    pub override_precedence: OverridePrecedence,
}

impl EngineConfig {
    /// Parse from a TOML document holding the fields at top level.
    pub fn from_toml(content: &str) -> Result<Self, ConfiguratorError> {
        Ok(toml::from_str(content)?)
    }

    pub fn with_incompatibility(mut self, policy: IncompatibilityPolicy) -> Self {
        self.incompatibility = policy;
        self
    }

    pub fn with_override_precedence(mut self, precedence: OverridePrecedence) -> Self {
        self.override_precedence = precedence;
        self
    }
}
