//! Migrate command - creates the database schema

use tracing::info;

use crate::infrastructure::storage::StorageFactory;

pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let storage = config.database.storage_config()?;
    StorageFactory::open(&storage).await?;

    info!("Schema ready for {:?} backend", storage.backend());
    Ok(())
}
