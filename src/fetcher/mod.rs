use crate::db::Database;
use crate::models::Snapshot;
use log::{error, info};
use thiserror::Error;

// The single error channel the page sees. Neither query is retried
// automatically; the UI offers a manual retry that re-runs the whole fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Could not load results: {0}")]
    Results(String),
    #[error("Could not load nominees: {0}")]
    Nominees(String),
}

// Run both read queries and hand back one snapshot, or one displayable error.
// No caching, no partial output: a retry fully replaces whatever came before.
pub async fn fetch_snapshot(database: &Database) -> Result<Snapshot, FetchError> {
    let results = database.get_results().await.map_err(|e| {
        error!("Results query failed: {}", e);
        FetchError::Results(e.to_string())
    })?;

    let nominees = database.get_nominees().await.map_err(|e| {
        error!("Nominees query failed: {}", e);
        FetchError::Nominees(e.to_string())
    })?;

    info!(
        "Fetched {} result(s) and {} nominee(s)",
        results.len(),
        nominees.len()
    );

    Ok(Snapshot { results, nominees })
}
