//! casket CLI - Command line interface for the casket blob store
//!
//! Provides store/locate/cat/hash commands over a local store root.
//! Designed to be wrapped by daemons or sync tools in other languages;
//! `cat` writes raw bytes to stdout with no framing.

use casket::BlobStore;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "casket")]
#[command(about = "A local content-addressed blob store")]
#[command(version)]
struct Cli {
    /// Store root directory (defaults to the platform data directory)
    #[arg(short, long)]
    store_dir: Option<PathBuf>,

    /// Output format (json or text)
    #[arg(short, long, default_value = "json")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a file under its content digest
    Store {
        /// Path of the file to store
        path: PathBuf,
        /// Hard-link into the store instead of copying (same filesystem only)
        #[arg(long)]
        hard_link: bool,
        /// Trust this digest instead of hashing the file
        #[arg(long)]
        known_hash: Option<String>,
    },

    /// Print the store path of a digest, if present
    Locate {
        /// The content digest
        digest: String,
    },

    /// Write a byte range of an entry to stdout
    Cat {
        /// The content digest
        digest: String,
        /// Start offset (inclusive)
        #[arg(short, long)]
        start: Option<u64>,
        /// End offset (exclusive)
        #[arg(short, long)]
        end: Option<u64>,
    },

    /// Resolve the digest of a file without storing it
    Hash {
        /// Path of the file to hash
        path: PathBuf,
        /// Only use the store-entry shortcut; skip full hashing
        #[arg(long)]
        cache_only: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let store = BlobStore::new(resolve_store_dir(cli.store_dir.clone()));

    match cli.command {
        Commands::Store {
            path,
            hard_link,
            known_hash,
        } => {
            let known_hash = known_hash
                .map(|s| store.parse_digest(&s))
                .transpose()?;
            let (stored, digest) = store.store_file(&path, hard_link, known_hash)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "sha1": digest.to_string(),
                    "path": stored.display().to_string()
                }),
            );
        }

        Commands::Locate { digest } => {
            let digest = store.parse_digest(&digest)?;
            match store.load_file_path(&digest) {
                Some(path) => output(
                    &cli.format,
                    &serde_json::json!({
                        "status": "ok",
                        "path": path.display().to_string()
                    }),
                ),
                None => {
                    output(
                        &cli.format,
                        &serde_json::json!({
                            "status": "not_found",
                            "sha1": digest.to_string()
                        }),
                    );
                    std::process::exit(1);
                }
            }
        }

        Commands::Cat { digest, start, end } => {
            let digest = store.parse_digest(&digest)?;
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            match store.stream_bytes(&digest, start, end, &mut out)? {
                Some(_) => out.flush()?,
                None => {
                    eprintln!("not found: {digest}");
                    std::process::exit(1);
                }
            }
        }

        Commands::Hash { path, cache_only } => {
            match store.resolve_file_hash(&path, cache_only)? {
                Some(digest) => output(
                    &cli.format,
                    &serde_json::json!({
                        "status": "ok",
                        "sha1": digest.to_string()
                    }),
                ),
                None => {
                    output(&cli.format, &serde_json::json!({ "status": "not_found" }));
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

/// Store root resolution is the CLI's concern, not the library's:
/// an explicit flag wins, else the platform-local data directory.
fn resolve_store_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.unwrap_or_else(|| {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("casket")
    })
}

fn output(format: &OutputFormat, value: &serde_json::Value) {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(value).unwrap());
        }
        OutputFormat::Text => {
            println!("{}", serde_json::to_string_pretty(value).unwrap());
        }
    }
}
