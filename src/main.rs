//! dripgrid - command line entry point
//!
//! Thin wrapper over the library: loads a layout document, asks the engine
//! for derived connectivity and prints it.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use dripgrid::catalog::Catalog;
use dripgrid::cli::{Cli, Commands};
use dripgrid::config::EditorConfig;
use dripgrid::document::{ImportedDocument, read_document_file};
use dripgrid::error::DripGridError;
use dripgrid::engine::GridEngine;
use dripgrid::seed::SEED_DOCUMENT;

/// Initialize logging; `RUST_LOG` overrides the default `info` level
fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_logger();

    let cli = Cli::parse_args();
    debug!("CLI arguments parsed");

    let config = EditorConfig::load_or_default(cli.config.as_deref())?;
    let engine = GridEngine::new(Arc::new(Catalog::builtin()), config.bounds());

    match cli.command {
        Commands::Catalog { json } => print_catalog(engine.catalog(), json)?,
        Commands::Connections { file, json } => {
            let imported = read_document(&file, &engine)?;
            let engine = engine.with_bounds(imported.document.bounds);
            let connections = engine.connections(&imported.document.grid);
            if json {
                println!("{}", serde_json::to_string_pretty(&connections)?);
            } else if connections.is_empty() {
                println!("No connections");
            } else {
                for connection in &connections {
                    println!("{}", connection);
                }
                println!("{} connection(s)", connections.len());
            }
        }
        Commands::Targets { file, x, y, port } => {
            let imported = read_document(&file, &engine)?;
            let engine = engine.with_bounds(imported.document.bounds);
            let grid = &imported.document.grid;
            let Some(placed) = grid.get(x, y) else {
                eprintln!("✗ No component at ({}, {})", x, y);
                std::process::exit(1);
            };
            let targets = engine.valid_connection_targets(grid, x, y, port.as_deref());
            println!("{} at ({}, {}) rotation {}", placed.component_id, x, y, placed.rotation);
            if targets.is_empty() {
                println!("  no valid connection targets");
            }
            for target in &targets {
                println!("  -> {}", target);
            }
            let linked = engine.connections_at(grid, x, y);
            println!("{} connection(s) at this cell", linked.len());
        }
        Commands::Validate { file } => {
            let imported = read_document(&file, &engine)?;
            let unknown: Vec<_> = imported
                .document
                .grid
                .iter()
                .filter(|p| !engine.catalog().contains(&p.component_id))
                .collect();

            println!(
                "'{}': {} component(s), {} skipped, {} unknown",
                imported.document.name,
                imported.document.grid.len(),
                imported.skipped.len(),
                unknown.len()
            );
            for entry in &imported.skipped {
                println!("  placed[{}]: {}", entry.index, entry.reason);
            }
            for placed in &unknown {
                println!("  ({}, {}): unknown component '{}'", placed.x, placed.y, placed.component_id);
            }
            if imported.skipped.is_empty() && unknown.is_empty() {
                println!("✓ Layout is clean");
            }
        }
        Commands::Seed { output } => match output {
            Some(path) => {
                fs::write(&path, SEED_DOCUMENT)
                    .with_context(|| format!("Failed to write starter layout to {:?}", path))?;
                info!("Wrote starter layout to {:?}", path);
            }
            None => println!("{}", SEED_DOCUMENT),
        },
    }

    Ok(())
}

/// Read and import a layout, exiting with status 1 if it cannot be parsed
fn read_document(path: &Path, engine: &GridEngine) -> Result<ImportedDocument> {
    let imported = match read_document_file(path, engine.bounds()) {
        Ok(imported) => imported,
        Err(DripGridError::Import(reason)) => {
            eprintln!("✗ {:?}: {}", path, reason);
            std::process::exit(1);
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to read layout from {:?}", path)),
    };
    if !imported.skipped.is_empty() {
        warn!("{} entr(ies) in {:?} could not be read", imported.skipped.len(), path);
    }
    Ok(imported)
}

fn print_catalog(catalog: &Catalog, json: bool) -> Result<()> {
    if json {
        let components: Vec<_> = catalog.iter().collect();
        println!("{}", serde_json::to_string_pretty(&components)?);
        return Ok(());
    }
    for component in catalog.iter() {
        let ports: Vec<String> = component
            .ports
            .iter()
            .map(|p| format!("{}:{}@{}", p.id, p.port_type, p.direction))
            .collect();
        println!(
            "{:<20} {:<10} {:<32} {}",
            component.id,
            component.category,
            component.name,
            ports.join(" ")
        );
    }
    Ok(())
}
