//! Empire Rules - Main entry point
//!
//! Thin command-line front end over the library's validator.

use anyhow::{Context, Result};
use serde_json::json;
use std::path::Path;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use empire_rules::cli::{Cli, Commands};
use empire_rules::{
    Conjunctive, EngineConfig, OptionCatalog, Selection, SelectionValidator,
};

/// Initialize the logger; RUST_LOG overrides the default level
fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            info!("Loading engine configuration from {:?}", path);
            EngineConfig::load_from_file(path)
        }
        None => Ok(EngineConfig::default()),
    }
}

fn load_catalog(path: &Path) -> Result<OptionCatalog> {
    OptionCatalog::load_from_file(path)
        .with_context(|| format!("Failed to load catalog from {:?}", path))
}

fn load_selection(path: &Path, catalog: &OptionCatalog) -> Result<Selection> {
    let selection = Selection::load_from_file(path)
        .with_context(|| format!("Failed to load selection from {:?}", path))?;
    selection
        .check_slots(catalog)
        .with_context(|| format!("Selection in {:?} does not match the catalog", path))?;
    Ok(selection)
}

/// Main application entry point
fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logger(cli.verbose);
    debug!("CLI arguments parsed");

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Validate {
            catalog,
            identifiers,
        } => {
            let catalog = load_catalog(&catalog)?;
            let validator = SelectionValidator::with_config(&catalog, config);
            let candidate: Conjunctive = identifiers.into_iter().collect();
            let violation = validator.explain(&candidate)?;

            if cli.json {
                let output = json!({
                    "candidate": candidate,
                    "legal": violation.is_none(),
                    "violation": violation.as_ref().map(|v| v.to_string()),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                match &violation {
                    None => println!("✓ {} is legal", candidate),
                    Some(v) => println!("✗ {} is illegal: {}", candidate, v),
                }
            }
            if violation.is_some() {
                std::process::exit(1);
            }
        }
        Commands::Check { catalog, selection } => {
            let catalog = load_catalog(&catalog)?;
            let selection = load_selection(&selection, &catalog)?;
            let validator = SelectionValidator::with_config(&catalog, config);
            let report = validator.report(&selection)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Selection: {}", report.effective_options);
                match &report.violation {
                    None => println!("✓ Legal"),
                    Some(v) => println!("✗ Illegal: {}", v),
                }
                if !report.unmet_requirements.is_empty() {
                    println!("Unmet requirements: {}", report.unmet_requirements.join(", "));
                }
                if report.completable {
                    println!("✓ Completable ({} completion(s))", report.completions);
                } else {
                    println!("✗ No legal completion exists");
                }
            }
            if !report.completable {
                std::process::exit(1);
            }
        }
        Commands::Available { catalog, selection } => {
            let catalog = load_catalog(&catalog)?;
            let selection = load_selection(&selection, &catalog)?;
            let validator = SelectionValidator::with_config(&catalog, config);
            let available = validator.available_options(&selection)?;
            let unavailable = validator.unavailable_options(&selection)?;

            if cli.json {
                let output = json!({
                    "available": available,
                    "unavailable": unavailable,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("Available ({}):", available.len());
                for identifier in &available {
                    println!("  {}", identifier);
                }
                println!("Unavailable ({}):", unavailable.len());
                for identifier in &unavailable {
                    println!("  {}", identifier);
                }
            }
        }
        Commands::Completions {
            catalog,
            selection,
            limit,
        } => {
            let catalog = load_catalog(&catalog)?;
            let selection = load_selection(&selection, &catalog)?;
            let validator = SelectionValidator::with_config(&catalog, config);
            let completions = validator.completions(&selection)?;
            let shown: Vec<&Conjunctive> =
                completions.iter().take(limit.unwrap_or(usize::MAX)).collect();

            if cli.json {
                let output = json!({
                    "total": completions.len(),
                    "completions": shown,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("{} completion(s)", completions.len());
                for completion in shown {
                    println!("  {}", completion);
                }
            }
        }
        Commands::Lint { catalog } => match OptionCatalog::load_from_file(&catalog) {
            Ok(loaded) => {
                info!("Catalog integrity check passed");
                println!("✓ Catalog is valid: {} option(s)", loaded.len());
            }
            Err(e) if e.is_catalog_fault() => {
                error!("Catalog integrity check failed: {}", e);
                eprintln!("✗ Catalog data is malformed: {}", e);
                std::process::exit(1);
            }
            Err(e) => {
                error!("Catalog could not be loaded: {}", e);
                eprintln!("✗ Catalog is invalid: {}", e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
