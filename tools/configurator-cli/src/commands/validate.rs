//! Validate a submitted option list.

use anyhow::{bail, Result};
use configurator::engine::validate_option_ids;

use super::{option_ids, ValidateArgs};
use crate::context::Context;

/// Run the validate command.
pub fn run(args: ValidateArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.load_catalog(&args.catalog)?;
    let ids = option_ids(&args.options);
    let result = validate_option_ids(&catalog, &ids, &ctx.config.engine);

    if ctx.output.is_json() {
        ctx.output.json(&result);
    } else {
        ctx.output.header(&format!("Validating {} option(s) for {}", ids.len(), catalog.name()));
        ctx.output.kv("incompatibility policy", ctx.config.engine.incompatibility.as_str());

        for name in &result.missing_required_categories {
            ctx.output.list_item(&format!("Missing required category: {}", name));
        }
        for name in &result.duplicate_categories {
            ctx.output.list_item(&format!("Several options chosen for: {}", name));
        }
        for id in &result.unavailable_options {
            ctx.output.list_item(&format!("Unavailable option: {}", id));
        }
        for violation in &result.incompatibilities {
            let members: Vec<&str> = violation.conflicting_options.iter().map(|o| o.as_str()).collect();
            let detail = violation
                .rule_description
                .as_deref()
                .map(|d| format!(" - {}", d))
                .unwrap_or_default();
            ctx.output.list_item(&format!(
                "{} [{}]{}",
                violation.rule_name,
                members.join(", "),
                detail
            ));
        }
    }

    if !result.is_valid {
        bail!("Configuration has {} problem(s)", result.violation_count());
    }

    ctx.output.success("Configuration is valid");
    Ok(())
}
