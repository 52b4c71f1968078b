use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Empire Rules - check empire selections against a rules catalog
#[derive(Parser)]
#[command(name = "empire-rules")]
#[command(about = "Legality and completability checks for empire selections")]
#[command(version)]
pub struct Cli {
    /// Engine configuration file (JSON). Defaults to the standard rule set.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log search details (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check a complete set of identifiers against the hard rules
    Validate {
        /// Catalog file
        #[arg(short, long)]
        catalog: PathBuf,
        /// Identifiers making up the candidate set
        #[arg(required = true)]
        identifiers: Vec<String>,
    },
    /// Report whether a saved selection is legal and completable
    Check {
        /// Catalog file
        #[arg(short, long)]
        catalog: PathBuf,
        /// Selection file
        #[arg(short, long)]
        selection: PathBuf,
    },
    /// List which options can and cannot still be chosen
    Available {
        /// Catalog file
        #[arg(short, long)]
        catalog: PathBuf,
        /// Selection file
        #[arg(short, long)]
        selection: PathBuf,
    },
    /// List the legal completions of a selection
    Completions {
        /// Catalog file
        #[arg(short, long)]
        catalog: PathBuf,
        /// Selection file
        #[arg(short, long)]
        selection: PathBuf,
        /// Print at most this many completions
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Load a catalog and check its integrity
    Lint {
        /// Catalog file
        #[arg(short, long)]
        catalog: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}
