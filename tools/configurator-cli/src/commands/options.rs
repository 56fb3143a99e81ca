//! List options with their availability and price.

use anyhow::{bail, Result};
use configurator::engine::{availability_for_category, quote_option, Selection};
use configurator::ids::CategoryId;
use serde::Serialize;

use super::{option_ids, OptionsArgs};
use crate::context::Context;
use crate::output::{availability_badge, price_label};

#[derive(Serialize)]
struct OptionRow {
    category_id: String,
    option_id: String,
    name: String,
    available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    nominal: f64,
    effective: f64,
}

/// Run the options command.
pub fn run(args: OptionsArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.load_catalog(&args.catalog)?;
    let (selection, issues) = Selection::from_option_ids(&catalog, &option_ids(&args.options));
    for id in &issues.unknown_options {
        ctx.output.warn(&format!("Ignoring unknown option: {}", id));
    }

    let categories: Vec<_> = match &args.category {
        Some(id) => {
            let id = CategoryId::new(id.as_str());
            match catalog.category(&id) {
                Some(category) => vec![category],
                None => bail!("Unknown category: {}", id),
            }
        }
        None => catalog.categories().iter().collect(),
    };

    let mut rows = Vec::new();
    for category in categories {
        ctx.output.header(&format!(
            "{}{}",
            category.name,
            if category.is_required { "" } else { " (optional)" }
        ));

        let listing = availability_for_category(&catalog, &selection, &category.id, &ctx.config.engine);
        for (option, entry) in category.options.iter().zip(&listing) {
            let available = entry.availability.is_available();
            let Some(quote) = quote_option(&catalog, &selection, &option.id, &ctx.config.engine) else {
                continue;
            };

            if available || ctx.config.output.show_unavailable {
                let chosen = if selection.get(&category.id) == Some(&option.id) { "*" } else { " " };
                ctx.output.table_row(
                    &[
                        chosen,
                        &option.name,
                        &price_label(quote.nominal, quote.effective),
                        &availability_badge(&entry.availability),
                    ],
                    &[1, 28, 24, 0],
                );
            }

            rows.push(OptionRow {
                category_id: category.id.to_string(),
                option_id: option.id.to_string(),
                name: option.name.clone(),
                available,
                reason: entry.availability.reason().map(|r| r.code().to_string()),
                nominal: quote.nominal.to_decimal(),
                effective: quote.effective.to_decimal(),
            });
        }
    }

    if ctx.output.is_json() {
        ctx.output.json(&rows);
    }

    Ok(())
}
