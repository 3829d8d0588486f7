//! avumeta CLI - AVU metadata editor
//!
//! This binary lists and edits the attribute-value-unit metadata of one
//! catalog object, working against a catalog snapshot file.

mod error_log;
mod settings;

use anyhow::{Context, Result};
use avumeta_client::{CatalogConnection, MemoryCatalog};
use avumeta_common::{ObjEntry, ObjectKind};
use avumeta_store::{MetaError, ObjMetadata};
use clap::{Parser, Subcommand};
use error_log::{ErrorLog, ErrorLogEntry};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "avumeta-cli")]
#[command(about = "AVU metadata editor for catalog objects")]
#[command(version)]
struct Args {
    /// Catalog snapshot file
    #[arg(long, env = "AVUMETA_CATALOG", default_value = "catalog.json")]
    catalog: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(flatten)]
    target: Target,

    #[command(subcommand)]
    command: Commands,
}

/// Object whose metadata is addressed
#[derive(clap::Args, Debug)]
#[group(required = true, multiple = false)]
struct Target {
    /// Data object path
    #[arg(short = 'd', long = "data")]
    data: Option<String>,

    /// Collection path
    #[arg(short = 'C', long = "coll")]
    coll: Option<String>,
}

impl Target {
    fn entry(&self) -> Result<ObjEntry> {
        match (&self.data, &self.coll) {
            (Some(path), _) => ObjEntry::from_path(ObjectKind::DataObject, path)
                .ok_or_else(|| anyhow::anyhow!("Invalid data object path: '{path}'")),
            (None, Some(path)) => Ok(ObjEntry::collection(path.as_str())),
            (None, None) => anyhow::bail!("No object given"),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Register the object in the catalog snapshot
    Init,
    /// List metadata triplets
    Ls {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a triplet
    Add {
        name: String,
        value: String,
        unit: Option<String>,
    },
    /// Modify a triplet's value and unit
    Mod {
        name: String,
        old_value: String,
        new_value: String,
        /// Current unit (also requests a unit change)
        #[arg(long, default_value = "")]
        old_unit: String,
        /// New unit
        #[arg(long, default_value = "")]
        new_unit: String,
    },
    /// Remove a triplet
    Rm {
        name: String,
        value: String,
        unit: Option<String>,
    },
}

fn print_triplets(meta: &ObjMetadata, json: bool) -> Result<()> {
    let triplets = meta.store().triplets();
    if json {
        println!("{}", serde_json::to_string_pretty(&triplets)?);
        return Ok(());
    }

    println!("Metadata of {}", meta.entry());
    println!("{}", "=".repeat(40));
    if triplets.is_empty() {
        println!("No metadata found");
    } else {
        println!("{:<30} {:<30} {:<15}", "ATTRIBUTE", "VALUE", "UNITS");
        println!("{}", "-".repeat(77));
        for avu in triplets {
            println!(
                "{:<30} {:<30} {:<15}",
                avu.name,
                avu.value,
                if avu.unit.is_empty() { "-" } else { &avu.unit }
            );
        }
    }
    Ok(())
}

/// Run a mutation; failures go to the error log
fn apply(
    log: &mut ErrorLog,
    message: &str,
    op: impl FnOnce() -> Result<i32, MetaError>,
) -> bool {
    match op() {
        Ok(status) => {
            info!("{} succeeded with status {}", message, status);
            true
        }
        Err(e) => {
            log.log(ErrorLogEntry::from_error(format!("{message} failed"), &e));
            false
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let config = settings::load_config(args.config.as_deref())?;
    let entry = args.target.entry()?;

    if matches!(args.command, Commands::Init) {
        let catalog = if args.catalog.exists() {
            MemoryCatalog::load(&args.catalog)?
        } else {
            MemoryCatalog::new()
        };
        if catalog.insert_object(entry.clone()) {
            println!("Registered {entry}");
        } else {
            println!("Already registered: {entry}");
        }
        catalog
            .save(&args.catalog)
            .with_context(|| format!("Failed to write {}", args.catalog.display()))?;
        return Ok(ExitCode::SUCCESS);
    }

    let catalog = Arc::new(
        MemoryCatalog::load(&args.catalog)
            .with_context(|| format!("Failed to open catalog {}", args.catalog.display()))?,
    );
    let conn: Arc<dyn CatalogConnection> = catalog.clone();
    let mut meta = ObjMetadata::with_config(conn, Arc::new(entry), config);
    let mut log = ErrorLog::default();

    // Populate the cache so local edits line up with the catalog
    if let Err(e) = meta.refresh() {
        log.log(ErrorLogEntry::from_error("Metadata refresh failed", &e));
    }

    let ok = log.is_empty()
        && match args.command {
            Commands::Init => unreachable!("handled above"),
            Commands::Ls { json } => {
                print_triplets(&meta, json)?;
                true
            }
            Commands::Add { name, value, unit } => apply(&mut log, "Metadata add", || {
                meta.add(&name, &value, unit.as_deref().unwrap_or(""))
            }),
            Commands::Mod {
                name,
                old_value,
                new_value,
                old_unit,
                new_unit,
            } => apply(&mut log, "Metadata modify", || {
                meta.modify(&name, &old_value, &new_value, &old_unit, &new_unit)
            }),
            Commands::Rm { name, value, unit } => apply(&mut log, "Metadata remove", || {
                meta.remove(&name, &value, unit.as_deref().unwrap_or(""))
            }),
        };

    for entry in log.entries() {
        eprintln!("{entry}\n");
    }
    if !ok {
        return Ok(ExitCode::FAILURE);
    }

    catalog
        .save(&args.catalog)
        .with_context(|| format!("Failed to write {}", args.catalog.display()))?;
    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    run(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use avumeta_common::Avu;
    use std::path::Path;
    use tempfile::tempdir;

    const FILE: &str = "/zone/home/alice/scan.dat";

    fn cli(catalog: &Path, rest: &[&str]) -> Result<ExitCode> {
        let catalog = catalog.to_str().unwrap();
        let mut argv = vec!["avumeta-cli", "--catalog", catalog, "-d", FILE];
        argv.extend_from_slice(rest);
        run(Args::try_parse_from(argv).unwrap())
    }

    fn saved_avus(catalog: &Path) -> Vec<Avu> {
        MemoryCatalog::load(catalog).unwrap().avus(FILE).unwrap()
    }

    #[test]
    fn test_init_add_rm() {
        let dir = tempdir().unwrap();
        let catalog = dir.path().join("catalog.json");

        assert_eq!(cli(&catalog, &["init"]).unwrap(), ExitCode::SUCCESS);
        assert!(saved_avus(&catalog).is_empty());

        assert_eq!(cli(&catalog, &["add", "size", "10", "cm"]).unwrap(), ExitCode::SUCCESS);
        assert_eq!(cli(&catalog, &["add", "color", "red"]).unwrap(), ExitCode::SUCCESS);
        assert_eq!(
            saved_avus(&catalog),
            vec![Avu::new("size", "10", "cm"), Avu::new("color", "red", "")]
        );

        assert_eq!(cli(&catalog, &["rm", "size", "10", "cm"]).unwrap(), ExitCode::SUCCESS);
        assert_eq!(saved_avus(&catalog), vec![Avu::new("color", "red", "")]);
    }

    #[test]
    fn test_failed_command_exits_nonzero() {
        let dir = tempdir().unwrap();
        let catalog = dir.path().join("catalog.json");
        cli(&catalog, &["init"]).unwrap();
        cli(&catalog, &["add", "color", "red"]).unwrap();
        let before = std::fs::read_to_string(&catalog).unwrap();

        assert_eq!(cli(&catalog, &["rm", "color", "blue"]).unwrap(), ExitCode::FAILURE);
        assert_eq!(cli(&catalog, &["add", "color", ""]).unwrap(), ExitCode::FAILURE);
        assert_eq!(std::fs::read_to_string(&catalog).unwrap(), before);
    }

    #[test]
    fn test_unregistered_object_fails() {
        let dir = tempdir().unwrap();
        let catalog = dir.path().join("catalog.json");
        MemoryCatalog::new().save(&catalog).unwrap();

        // The query finds nothing, then the catalog refuses the unknown file
        assert_eq!(cli(&catalog, &["add", "k", "v"]).unwrap(), ExitCode::FAILURE);
        assert!(MemoryCatalog::load(&catalog).unwrap().avus(FILE).is_none());
    }

    #[test]
    fn test_missing_catalog_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(cli(&dir.path().join("missing.json"), &["ls"]).is_err());
    }
}
