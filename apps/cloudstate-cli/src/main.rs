//! CloudState CLI - save and fetch a state table kept in one DynamoDB item.
//!
//! # Usage
//!
//! ```text
//! cloudstate save alice=120 bob=95
//! cloudstate save --merge carol=70
//! cloudstate fetch
//! cloudstate owner-scope
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `AWS_ACCESS_KEY_ID` | *(required)* | Access key used for signing |
//! | `AWS_SECRET_ACCESS_KEY` | *(required)* | Secret key used for signing |
//! | `CLOUDSTATE_TABLE` | `games_state` | Table holding the state item |
//! | `CLOUDSTATE_ITEM_KEY` | `default` | Partition key value of the item |
//! | `CLOUDSTATE_ENDPOINT_URL` | *(unset)* | Endpoint override, e.g. `http://localhost:4566` |
//! | `CLOUDSTATE_NAMESPACED` | `false` | Prefix keys with this installation's owner scope |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use cloudstate_auth::Credentials;
use cloudstate_core::{FileOwnerScopeStore, StateClient, StateMap, StoreConfig, scope};
use cloudstate_http::HttpTransport;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cloudstate")]
#[command(about = "Save and fetch a key/value table stored in a single DynamoDB item", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level filter, unless RUST_LOG is set
    #[arg(long, global = true, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace the stored table with the given entries
    Save {
        /// Entries as KEY=VALUE
        #[arg(required = true, value_parser = parse_entry)]
        entries: Vec<(String, String)>,

        /// Fetch the stored table first and update it instead of replacing it
        #[arg(long)]
        merge: bool,
    },

    /// Print the stored table as tab-separated rows
    Fetch,

    /// Print this installation's owner scope, generating it if needed
    OwnerScope,
}

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to `log_level`. Logs go to
/// stderr so fetched rows can be piped.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn parse_entry(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {raw:?}"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in {raw:?}"));
    }
    if key.contains(',') || key.contains('\n') {
        return Err(format!("key {key:?} must not contain ',' or a newline"));
    }
    if value.contains('\n') {
        return Err(format!("value for {key:?} must not contain a newline"));
    }
    Ok((key.to_owned(), value.trim().to_owned()))
}

fn build_client(config: StoreConfig) -> Result<StateClient<HttpTransport>> {
    let credentials = Credentials::from_env().context("missing signing credentials")?;
    let transport = HttpTransport::from_config(&config)?;
    let namespaced = config.namespaced;
    let scope_path = config.owner_scope_path();

    let client = StateClient::new(config, credentials, transport)?;
    if namespaced {
        let store = FileOwnerScopeStore::new(scope_path);
        return Ok(client.resolve_owner_scope(&store)?);
    }
    Ok(client)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    let config = StoreConfig::from_env();

    match cli.command {
        Commands::Save { entries, merge } => {
            let client = build_client(config)?;
            let mut updates = StateMap::new();
            for (key, value) in entries {
                updates.insert(client.item_key(key)?, value);
            }
            let saved = if merge {
                client.merge_state(updates).await.context("failed to merge state")?
            } else {
                client.save_state(&updates).await.context("failed to save state")?;
                updates
            };
            println!("saved {} entries", saved.len());
        }
        Commands::Fetch => {
            let client = build_client(config)?;
            let state = client.fetch_state().await.context("failed to fetch state")?;
            for (key, value) in state.iter() {
                println!("{}\t{value}", key.flat_key());
            }
        }
        Commands::OwnerScope => {
            let store = FileOwnerScopeStore::new(config.owner_scope_path());
            let owner_scope = scope::resolve_owner_scope(&store, Utc::now())?;
            println!("{owner_scope}");
        }
    }

    Ok(())
}
