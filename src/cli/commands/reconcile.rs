use anyhow::Result;
use compute::{DatabaseStore, Reconciliation, default_ledger};
use sea_orm::{Database, TransactionTrait};
use tracing::{debug, info, trace};

use crate::config::AppConfig;

/// Recounts every active file in one database transaction and prints the files
/// whose stored aggregates had drifted.
pub async fn reconcile(config: &AppConfig) -> Result<Vec<Reconciliation>> {
    trace!("Entering reconcile function");
    let db = Database::connect(&config.database_url).await?;
    let ledger = default_ledger(config.today);
    info!("Reconciling active files as of {}", ledger.today());

    let txn = db.begin().await?;
    let results = ledger.reconcile_all(&DatabaseStore::new(&txn)).await?;
    txn.commit().await?;

    for result in results.iter().filter(|r| r.changed()) {
        println!(
            "file {}: received {} -> {}, payments {} -> {}, bounces {} -> {}",
            result.file_id,
            result.previous.total_received,
            result.current.total_received,
            result.previous.transaction_count,
            result.current.transaction_count,
            result.previous.bounce_count,
            result.current.bounce_count,
        );
    }
    let changed = results.iter().filter(|r| r.changed()).count();
    println!("{} active files checked, {} updated", results.len(), changed);
    debug!("Reconcile finished");
    Ok(results)
}
