//! Configurator CLI - Check and explore configurable products from the terminal.
//!
//! Commands:
//! - `configurator validate` - Validate a submitted option list
//! - `configurator price` - Itemize the price of a configuration
//! - `configurator options` - Show which options can be picked and what they cost
//! - `configurator configure` - Walk through a product step by step

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ConfigureArgs, OptionsArgs, PriceArgs, ValidateArgs};

/// Configurator CLI - Validate, price and build product configurations
#[derive(Parser)]
#[command(name = "configurator")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a list of option ids against a catalog
    Validate(ValidateArgs),

    /// Show the itemized price of a configuration
    Price(PriceArgs),

    /// List options with their availability and price
    Options(OptionsArgs),

    /// Configure a product interactively
    Configure(ConfigureArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = match context::Context::load(config_path, cli.verbose, cli.json) {
        Ok(ctx) => ctx,
        Err(e) => {
            output::Output::new(cli.verbose, cli.json).error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    // Execute command
    let result = match cli.command {
        Commands::Validate(args) => commands::validate::run(args, &ctx),
        Commands::Price(args) => commands::price::run(args, &ctx),
        Commands::Options(args) => commands::options::run(args, &ctx),
        Commands::Configure(args) => commands::configure::run(args, &ctx),
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG`; `-v` lowers the default to debug.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
