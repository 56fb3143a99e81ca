//! Interactive step-by-step configuration.

use anyhow::{Context as _, Result};
use configurator::cart::Cart;
use configurator::engine::{ConfigurationSession, SelectionOutcome};
use dialoguer::{Confirm, Select};

use super::ConfigureArgs;
use crate::context::Context;
use crate::output::{availability_badge, price_label};

/// What the shopper picked from a step's menu.
enum Choice {
    Option(usize),
    Skip,
    Back,
}

/// Run the configure command.
pub fn run(args: ConfigureArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.load_catalog(&args.catalog)?;
    let mut session = ConfigurationSession::new(catalog.clone()).with_config(ctx.config.engine);

    ctx.output.header(&format!("Configuring {}", catalog.name()));
    ctx.output.kv("base price", &catalog.base_price().display());

    while let Some(category) = session.current_category().cloned() {
        let total = catalog.category_count();
        ctx.output.step(session.step() + 1, total, &category.name);

        let listing = session.current_category_availability();
        let mut items: Vec<String> = category
            .options
            .iter()
            .zip(&listing)
            .map(|(option, entry)| {
                let price = session
                    .quote(&option.id)
                    .map(|q| price_label(q.nominal, q.effective))
                    .unwrap_or_default();
                format!("{:28} {:>12}  {}", option.name, price, availability_badge(&entry.availability))
            })
            .collect();

        let mut extras = Vec::new();
        if !category.is_required {
            items.push("Skip".to_string());
            extras.push(Choice::Skip);
        }
        if session.can_go_previous() {
            items.push("Back".to_string());
            extras.push(Choice::Back);
        }

        let picked = Select::new()
            .with_prompt(format!("Choose {}", category.name))
            .items(&items)
            .default(0)
            .interact()?;

        let choice = if picked < category.options.len() {
            Choice::Option(picked)
        } else {
            extras.swap_remove(picked - category.options.len())
        };

        match choice {
            Choice::Back => {
                session.go_to_previous_step()?;
                continue;
            }
            Choice::Skip => {
                session.select_option(&category.id, None);
            }
            Choice::Option(index) => {
                let option = &category.options[index];
                match session.select_option(&category.id, Some(option.id.clone())) {
                    SelectionOutcome::Rejected(reason) => {
                        ctx.output.warn(&format!("{} cannot be selected: {}", option.name, reason));
                        continue;
                    }
                    SelectionOutcome::Applied | SelectionOutcome::Cleared => {
                        ctx.output.debug(&format!("Selected {}", option.name));
                    }
                }
            }
        }

        if session.is_at_last_step() {
            break;
        }
        session.go_to_next_step()?;
    }

    ctx.output.header("Summary");
    ctx.output.breakdown(&session.price());

    let confirmed = ctx.output.is_json()
        || Confirm::new()
            .with_prompt(format!("Add {} to cart?", args.quantity))
            .default(true)
            .interact()?;
    if !confirmed {
        ctx.output.warn("Configuration discarded");
        return Ok(());
    }

    let item = session
        .to_cart_item(args.quantity)
        .context("Configuration cannot be added to the cart")?;
    let mut cart = Cart::new(catalog.currency());
    cart.add_item(item)?;

    ctx.output.success(&format!("Cart total: {}", cart.total()?.display()));
    ctx.output.json(&cart);
    Ok(())
}
