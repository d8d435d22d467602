use tracing::{info, warn};

use crate::config::StorageKind;
use crate::storage::Store;
use crate::App;

pub async fn run(mut app: App) -> anyhow::Result<()> {
    if app.config.storage.kind == StorageKind::Memory {
        warn!("memory store keeps nothing between runs, doing nothing");
        return Ok(());
    }

    let count = app.store.purge_expired().await?;
    info!("deleted {count} expired pastes");

    Ok(())
}
