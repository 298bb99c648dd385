//! The `cleanup` operation
//!
//! Removes every folder known to the game database from the daemon along
//! with its local data. Irreversible, so it runs only after an interactive
//! confirmation; there is deliberately no flag to skip the prompt.

use anyhow::Result;
use dialoguer::Confirm;
use futures::stream::{self, StreamExt};
use peti_core::{Config, GameDatabase, ResilioClient};
use serde::Serialize;
use tracing::{info, warn};

use crate::folder::SyncFolder;
use crate::update::{unregister_folder, MAX_CONCURRENT_CALLS};

#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanupReport {
    /// Whether the operator confirmed the prompt
    pub confirmed: bool,
    pub removed: usize,
    pub failed: usize,
}

pub async fn run(config: &Config) -> Result<CleanupReport> {
    run_with_confirmation(config, confirm_removal()).await
}

/// Everything destructive sits behind the `confirmed` gate: no API client
/// is built and no database is opened until the operator has said yes.
async fn run_with_confirmation(config: &Config, confirmed: bool) -> Result<CleanupReport> {
    if !confirmed {
        warn!("Cleanup aborted, nothing was removed");
        return Ok(CleanupReport::default());
    }
    execute(config).await
}

/// The destructive part, reached only through the confirmation gate above.
async fn execute(config: &Config) -> Result<CleanupReport> {
    let client = ResilioClient::new(config)?;
    let db = GameDatabase::prepare(config).await?;

    let mut folders: Vec<SyncFolder> = db
        .allowed_folders()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    folders.extend(db.discarded_folders().await?.into_iter().map(SyncFolder::from));

    info!("Removing {} folders and their local data...", folders.len());
    let results = stream::iter(&folders)
        .map(|folder| {
            let client = &client;
            let sync_dir = config.resilio_sync_dir.as_path();
            async move { unregister_folder(client, folder, sync_dir).await }
        })
        .buffer_unordered(MAX_CONCURRENT_CALLS)
        .collect::<Vec<bool>>()
        .await;

    let removed = results.iter().filter(|ok| **ok).count();
    let report = CleanupReport {
        confirmed: true,
        removed,
        failed: results.len() - removed,
    };
    info!("Cleanup finished: {} removed, {} failed", report.removed, report.failed);
    Ok(report)
}

/// Mandatory interactive gate. A prompt failure (no terminal attached)
/// counts as a decline, so scripted invocations cannot wipe data.
fn confirm_removal() -> bool {
    Confirm::new()
        .with_prompt("Should all synchronized data be removed?")
        .default(false)
        .interact()
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn declined_cleanup_makes_no_destructive_calls() {
        // Host is unparseable and no database exists, so the run would
        // fail on client construction or database open if it ever got
        // past the gate.
        let config: Config = serde_yaml::from_str(
            r#"
resilio_host: "not a host"
resilio_sync_dir: /nonexistent/sync
data_dir: /nonexistent
"#,
        )
        .unwrap();

        let report = run_with_confirmation(&config, false).await.unwrap();
        assert!(!report.confirmed);
        assert_eq!(report.removed, 0);
        assert_eq!(report.failed, 0);
    }
}
