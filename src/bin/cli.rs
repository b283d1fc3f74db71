//! jsonkv CLI
//!
//! Command-line inspector for jsonkv snapshot files.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use jsonkv::snapshot::SnapshotWriter;
use jsonkv::{Config, Engine, KeyPattern, SaveMode};
use tracing_subscriber::{fmt, EnvFilter};

/// jsonkv CLI
#[derive(Parser, Debug)]
#[command(name = "jsonkv")]
#[command(about = "Inspect and edit jsonkv snapshot files")]
#[command(version)]
struct Args {
    /// Snapshot file (a `.gz` suffix means gzip)
    #[arg(short, long, default_value = "./jsonkv.json")]
    file: PathBuf,

    /// Rewrite the file in place instead of write-then-rename
    #[arg(long)]
    in_place: bool,

    /// Gzip level for `.gz` files (0-9)
    #[arg(short, long, default_value = "6")]
    level: u32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the stored JSON for a key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key; the value is parsed as JSON, or stored as a string
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// List keys, sorted
    Keys {
        #[command(flatten)]
        pattern: PatternArgs,
    },

    /// Print `key<TAB>value` lines, sorted by key
    Scan {
        #[command(flatten)]
        pattern: PatternArgs,

        /// Print at most this many entries
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Rewrite the snapshot to another file (compression from its name)
    Convert {
        /// Destination snapshot file
        dest: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct PatternArgs {
    /// Keys starting with this text
    #[arg(long, conflicts_with_all = ["contains", "regex"])]
    prefix: Option<String>,

    /// Keys containing this text
    #[arg(long, conflicts_with = "regex")]
    contains: Option<String>,

    /// Keys matching this regular expression
    #[arg(long)]
    regex: Option<String>,
}

impl PatternArgs {
    fn to_pattern(&self) -> jsonkv::Result<Option<KeyPattern>> {
        if let Some(prefix) = &self.prefix {
            return Ok(Some(KeyPattern::prefix(prefix.as_str())));
        }
        if let Some(needle) = &self.contains {
            return Ok(Some(KeyPattern::contains(needle.as_str())));
        }
        self.regex.as_deref().map(KeyPattern::regex).transpose()
    }
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,jsonkv=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> jsonkv::Result<ExitCode> {
    let save_mode = if args.in_place {
        SaveMode::InPlace
    } else {
        SaveMode::Atomic
    };

    // Build config from args
    let config = Config::builder()
        .snapshot_path(&args.file)
        .save_mode(save_mode)
        .compression_level(args.level)
        .build();

    let engine = Engine::open(config)?;
    tracing::debug!("Opened {} ({} keys)", args.file.display(), engine.store().len());

    match args.command {
        Commands::Get { key } => match engine.get_raw(&key) {
            Some(raw) => println!("{}", raw),
            None => {
                eprintln!("no such key \"{}\"", key);
                return Ok(ExitCode::FAILURE);
            }
        },
        Commands::Set { key, value } => {
            let value = serde_json::from_str::<serde_json::Value>(&value)
                .unwrap_or(serde_json::Value::String(value));
            engine.set(key, &value)?;
        }
        Commands::Del { key } => {
            if !engine.delete(&key) {
                tracing::info!("Key \"{}\" not present, nothing to delete", key);
            }
        }
        Commands::Keys { pattern } => {
            let pattern = pattern.to_pattern()?;
            let mut keys: Vec<String> = engine.get_all(pattern.as_ref(), None).into_keys().collect();
            keys.sort();
            for key in keys {
                println!("{}", key);
            }
        }
        Commands::Scan { pattern, limit } => {
            let pattern = pattern.to_pattern()?;
            // Sort before truncating so the output is deterministic
            let mut entries: Vec<_> = engine.get_all(pattern.as_ref(), None).into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            for (key, raw) in entries.into_iter().take(limit.unwrap_or(usize::MAX)) {
                println!("{}\t{}", key, raw);
            }
        }
        Commands::Convert { dest } => {
            let info = SnapshotWriter::new(dest)
                .save_mode(save_mode)
                .compression_level(args.level)
                .write(engine.store())?;
            tracing::info!(
                "Wrote {} entries to {} ({}, {} bytes)",
                info.entry_count,
                info.path.display(),
                info.compression,
                info.file_size
            );
        }
    }

    if let Some(info) = engine.save_if_dirty()? {
        tracing::info!("Saved {} entries to {}", info.entry_count, info.path.display());
    }

    Ok(ExitCode::SUCCESS)
}
