//! CLI command implementations.

pub mod catalog;
pub mod currency;
pub mod env;

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Arguments for the env command.
#[derive(Args)]
pub struct EnvArgs {
    #[command(subcommand)]
    pub command: EnvCommand,
}

#[derive(Subcommand)]
pub enum EnvCommand {
    /// Write the environment files from FIREBASE_* variables
    Generate {
        /// Build mode the files are generated for.
        #[arg(value_enum, default_value_t = BuildMode::Prod)]
        mode: BuildMode,

        /// Directory to write into.
        #[arg(short, long, default_value = "environments")]
        out_dir: PathBuf,
    },

    /// Validate the FIREBASE_* variables without writing anything
    Check,
}

/// Build mode for `env generate`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum BuildMode {
    Prod,
    Dev,
}

/// Arguments for the currency command.
#[derive(Args)]
pub struct CurrencyArgs {
    #[command(subcommand)]
    pub command: CurrencyCommand,
}

#[derive(Subcommand)]
pub enum CurrencyCommand {
    /// Convert an amount in EUR into display currencies
    Convert {
        /// Amount in EUR.
        amount: f64,

        /// Target currency codes (default: all).
        codes: Vec<String>,
    },

    /// List supported currencies and their rates
    List,
}

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommand,
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// Show the catalog served while the database is unreachable
    Placeholders {
        /// Only show products in this category.
        #[arg(short, long)]
        category: Option<String>,
    },
}
