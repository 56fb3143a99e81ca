//! CLI command implementations.

pub mod configure;
pub mod options;
pub mod price;
pub mod validate;

use clap::Args;
use configurator::ids::OptionId;

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// Catalog document (JSON).
    pub catalog: String,

    /// Selected option ids, comma separated.
    #[arg(short, long, value_delimiter = ',')]
    pub options: Vec<String>,
}

/// Arguments for the price command.
#[derive(Args)]
pub struct PriceArgs {
    /// Catalog document (JSON).
    pub catalog: String,

    /// Selected option ids, comma separated.
    #[arg(short, long, value_delimiter = ',')]
    pub options: Vec<String>,
}

/// Arguments for the options command.
#[derive(Args)]
pub struct OptionsArgs {
    /// Catalog document (JSON).
    pub catalog: String,

    /// Options already selected, comma separated.
    #[arg(short, long, value_delimiter = ',')]
    pub options: Vec<String>,

    /// Only list this category.
    #[arg(long)]
    pub category: Option<String>,
}

/// Arguments for the configure command.
#[derive(Args)]
pub struct ConfigureArgs {
    /// Catalog document (JSON).
    pub catalog: String,

    /// Quantity for the resulting cart line.
    #[arg(short, long, default_value = "1")]
    pub quantity: u32,
}

/// Turn raw command line ids into option ids, dropping blanks.
pub(crate) fn option_ids(raw: &[String]) -> Vec<OptionId> {
    raw.iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(OptionId::new)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_ids_trims_and_skips_blanks() {
        let raw = vec![" fat".to_string(), "".to_string(), "red ".to_string()];
        assert_eq!(option_ids(&raw), vec![OptionId::new("fat"), OptionId::new("red")]);
    }
}
