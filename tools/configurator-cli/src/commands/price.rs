//! Itemize the price of a configuration.

use anyhow::Result;
use configurator::engine::{price, Selection};

use super::{option_ids, PriceArgs};
use crate::context::Context;

/// Run the price command.
pub fn run(args: PriceArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.load_catalog(&args.catalog)?;
    let ids = option_ids(&args.options);
    let (selection, issues) = Selection::from_option_ids(&catalog, &ids);

    for id in &issues.unknown_options {
        ctx.output.warn(&format!("Ignoring unknown option: {}", id));
    }
    for id in &issues.displaced_options {
        ctx.output.warn(&format!("Ignoring second option for its category: {}", id));
    }

    let breakdown = price(&catalog, &selection, &ctx.config.engine);

    if ctx.output.is_json() {
        ctx.output.json(&breakdown);
        return Ok(());
    }

    ctx.output.header(&format!("Price for {}", catalog.name()));
    ctx.output.breakdown(&breakdown);

    let savings = breakdown.override_savings();
    if savings > 0 {
        let saved = configurator::Money::new(savings, catalog.currency());
        ctx.output.success(&format!("Combination savings: {}", saved.display()));
    }

    Ok(())
}
