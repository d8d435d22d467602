use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::FromRef;
use clap::{Parser, Subcommand};
use directories_next::ProjectDirs;

mod clock;
mod commands;
mod config;
mod controllers;
mod error;
mod ids;
mod models;
mod storage;
#[cfg(test)]
mod testing;
mod types;

pub(crate) use error::ApiResult;

use clock::{Clock, SystemClock};
use config::{Config, StorageKind};
use ids::{OsRandom, RandomSource};
use storage::memory::MemoryStore;
use storage::AnyStore;

#[derive(Parser)]
#[command(version, about = "A minimal pastebin")]
struct Cli {
    /// Path to the config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server.
    Serve,
    /// Delete expired pastes from the store and exit.
    PurgeExpired,
}

#[derive(Clone, FromRef)]
pub struct App {
    pub config: Config,
    pub store: AnyStore,
    pub random: Arc<dyn RandomSource>,
    pub clock: Arc<dyn Clock>,
}

impl App {
    async fn load(config: Config) -> anyhow::Result<Self> {
        let store = open_store(&config).await?;
        Ok(App {
            config,
            store,
            random: Arc::new(OsRandom),
            clock: Arc::new(SystemClock),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let config = Config::load(config_path(cli.config)).await?;
    let app = App::load(config).await?;

    match cli.command {
        Command::Serve => commands::serve::run(app).await,
        Command::PurgeExpired => commands::purge_expired::run(app).await,
    }
}

/// The explicit path if given, then `./config.toml`, then the user config dir.
fn config_path(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }

    let local = PathBuf::from("config.toml");
    if local.exists() {
        return local;
    }

    ProjectDirs::from("", "", "pb")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or(local)
}

async fn open_store(config: &Config) -> anyhow::Result<AnyStore> {
    match config.storage.kind {
        StorageKind::Memory => Ok(MemoryStore::new().into()),
        #[cfg(feature = "sqlite")]
        StorageKind::Sql => {
            let sql = config
                .storage
                .sql
                .as_ref()
                .context("storage.sql must be set for the sql store")?;
            let store = storage::sql::SqlStore::connect(&sql.url)
                .await
                .context("failed to connect to database")?;
            Ok(store.into())
        }
    }
}
