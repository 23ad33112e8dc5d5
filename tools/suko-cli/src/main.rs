//! SUKO CLI - Command line tool for the SUKO storefront.
//!
//! Commands:
//! - `suko env` - Generate and check environment files
//! - `suko currency` - Convert and list display currencies
//! - `suko catalog` - Inspect the placeholder catalog

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{CatalogArgs, CurrencyArgs, EnvArgs};

/// SUKO CLI - Tooling for the SUKO storefront
#[derive(Parser)]
#[command(name = "suko")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate or check the storefront environment files
    Env(EnvArgs),

    /// Convert prices between display currencies
    Currency(CurrencyArgs),

    /// Inspect the placeholder catalog
    Catalog(CatalogArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Variables from `.env` never override the real environment
    let dotenv = dotenvy::dotenv().ok();
    suko_store::logging::init(cli.verbose);

    let output = output::Output::new(cli.verbose, cli.json);
    let ctx = context::Context::load(output)?;
    if let Some(path) = dotenv {
        ctx.output.debug(&format!("Loaded {}", path.display()));
    }

    let result = match cli.command {
        Commands::Env(args) => commands::env::run(args, &ctx).await,
        Commands::Currency(args) => commands::currency::run(args, &ctx).await,
        Commands::Catalog(args) => commands::catalog::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
