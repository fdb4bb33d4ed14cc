use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use tracing::{debug, error, info, trace};

use crate::config::AppConfig;

/// Brings the ledger schema up to date. Already-applied migrations are skipped.
pub async fn migrate(db: &DatabaseConnection) -> Result<()> {
    info!("Running database migrations");
    if let Err(e) = Migrator::up(db, None).await {
        error!("Failed to run database migrations: {}", e);
        return Err(e.into());
    }
    debug!("All pending migrations have been applied");
    Ok(())
}

/// Creates the files and transactions tables in the configured database.
pub async fn init_database(config: &AppConfig) -> Result<()> {
    trace!("Entering init_database function");
    debug!("Database URL: {}", config.database_url);
    let db = Database::connect(&config.database_url).await?;

    migrate(&db).await?;
    info!("Ledger database ready at {}", config.database_url);
    Ok(())
}
