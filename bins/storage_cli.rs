use std::process::ExitCode;

use clap::{Parser, Subcommand};
use configs::{AppConfig, Backend, LogFormat};
use dotenvy::dotenv;
use serde::Serialize;
use serde_json::Value;
use storage::{FileStore, KeyValueStore, MemoryStore, StorageResult, TypedAccessor};
use tracing::{debug, error, warn};
use uuid::Uuid;

/// Inspect and edit JSON entries in a key-value store
#[derive(Parser)]
#[command(name = "storage-cli")]
#[command(about = "Read, write and update JSON entries in a key-value store", long_about = None)]
#[command(version)]
struct Cli {
    /// Store file, overriding the configured path (file backend only)
    #[arg(long, env = "STORAGE_PATH")]
    path: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the entry stored under a key
    Get { key: String },
    /// Store a JSON value under a key
    Set {
        key: String,
        /// JSON text of the value
        value: String,
        /// Keep existing keys; only add missing ones
        #[arg(long)]
        preserve: bool,
    },
    /// Check whether the entry has a top-level property
    Has { key: String, property: String },
    /// Overwrite properties that already exist on the entry
    Update {
        key: String,
        /// JSON object of updates
        updates: String,
    },
    /// Delete the entry stored under a key
    Remove { key: String },
}

fn init_logging(cfg: &AppConfig) {
    let fallback = cfg.logging.filter.as_deref();
    match cfg.logging.format {
        LogFormat::Compact => common::utils::logging::init_logging_default(fallback),
        LogFormat::Json => common::utils::logging::init_logging_json(fallback),
    }
    debug!(service = "storage", event = "logger_init", "tracing subscriber initialized");
}

/// Open the configured backend.
///
/// `memory` is a scratch store: each invocation starts empty and nothing is kept
/// after exit. It is only useful for checking JSON arguments and quota limits.
fn open_store(cfg: &AppConfig, path_given: bool) -> anyhow::Result<Box<dyn KeyValueStore>> {
    let store: Box<dyn KeyValueStore> = match cfg.storage.backend {
        Backend::Memory => {
            warn!(
                service = "storage",
                event = "scratch_store",
                path_ignored = path_given,
                "memory backend keeps nothing between runs; use backend = \"file\" to persist"
            );
            match cfg.storage.quota_bytes {
                Some(quota) => Box::new(MemoryStore::with_quota(quota)),
                None => Box::new(MemoryStore::new()),
            }
        }
        Backend::File => {
            common::env::ensure_data_dir(&cfg.storage.path)?;
            Box::new(FileStore::new(&cfg.storage.path)?)
        }
    };
    Ok(store)
}

fn parse_json(text: &str) -> anyhow::Result<Value> {
    serde_json::from_str(text).map_err(|e| anyhow::anyhow!("argument is not valid JSON: {e}"))
}

fn emit<T: Serialize>(res: &StorageResult<T>) -> ExitCode {
    match serde_json::to_string(res) {
        Ok(line) => println!("{line}"),
        Err(e) => {
            error!(service = "storage", event = "emit_failed", error = %e, "cannot render result");
            return ExitCode::FAILURE;
        }
    }
    if res.success { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

fn run(cli: Cli, cfg: AppConfig, path_given: bool) -> anyhow::Result<ExitCode> {
    let typed = TypedAccessor::new(open_store(&cfg, path_given)?);

    let code = match cli.command {
        Commands::Get { key } => emit(&typed.get_entry_from_storage::<Value>(&key)),
        Commands::Set { key, value, preserve } => {
            emit(&typed.set_item_in_storage(&key, &parse_json(&value)?, preserve))
        }
        Commands::Has { key, property } => emit(&typed.has_property_for_key(&key, &property)),
        Commands::Update { key, updates } => {
            emit(&typed.update_stored_props_for_key(&key, &parse_json(&updates)?))
        }
        Commands::Remove { key } => emit(&typed.remove_from_storage(&key)),
    };
    Ok(code)
}

fn main() -> ExitCode {
    // load .env before parsing so STORAGE_PATH and RUST_LOG take effect
    dotenv().ok();
    let mut cli = Cli::parse();

    let path_override = cli.path.take();
    let path_given = path_override.is_some();
    let cfg = match AppConfig::load_and_validate(path_override) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(&cfg);

    let run_id = Uuid::new_v4();
    debug!(
        service = "storage",
        event = "start",
        %run_id,
        backend = ?cfg.storage.backend,
        version = env!("CARGO_PKG_VERSION"),
        "storage command starting"
    );

    match run(cli, cfg, path_given) {
        Ok(code) => code,
        Err(e) => {
            error!(
                service = "storage",
                event = "run_failed",
                %run_id,
                error = %e,
                "storage command failed"
            );
            ExitCode::FAILURE
        }
    }
}
