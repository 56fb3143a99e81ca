//! CLI configuration.

use anyhow::{Context, Result};
use configurator::config::EngineConfig;
use serde::{Deserialize, Serialize};

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Rule engine policies.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Output preferences.
    #[serde(default)]
    pub output: OutputConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        Self::parse(&content, path.ends_with(".json"))
            .with_context(|| format!("Failed to parse config file: {}", path))
    }

    fn parse(content: &str, json: bool) -> Result<Self> {
        if json {
            Ok(serde_json::from_str(content)?)
        } else {
            Ok(toml::from_str(content)?)
        }
    }
}

/// Output preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Emit JSON even without `--json`.
    #[serde(default)]
    pub json: bool,

    /// List options that cannot be picked right now.
    #[serde(default = "default_true")]
    pub show_unavailable: bool,
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json: false,
            show_unavailable: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use configurator::config::{IncompatibilityPolicy, OverridePrecedence};

    #[test]
    fn test_parse_toml() {
        let config = CliConfig::parse(
            r#"
[engine]
incompatibility = "full_set"

[output]
show_unavailable = false
"#,
            false,
        )
        .unwrap();
        assert_eq!(config.engine.incompatibility, IncompatibilityPolicy::FullSet);
        assert_eq!(config.engine.override_precedence, OverridePrecedence::LastDeclared);
        assert!(!config.output.show_unavailable);
        assert!(!config.output.json);
    }

    #[test]
    fn test_parse_json() {
        let config = CliConfig::parse(
            r#"{ "engine": { "override_precedence": "lowest_price" }, "output": { "json": true } }"#,
            true,
        )
        .unwrap();
        assert_eq!(config.engine.override_precedence, OverridePrecedence::LowestPrice);
        assert!(config.output.json);
        assert!(config.output.show_unavailable);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = CliConfig::parse("", false).unwrap();
        assert_eq!(config.engine, EngineConfig::default());
        assert!(config.output.show_unavailable);
    }
}
