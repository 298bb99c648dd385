//! The `update` operation
//!
//! Builds the desired folder set from configuration and game database,
//! diffs it against the daemon and applies the resulting plan. Individual
//! folder failures are logged and counted; the pass itself keeps going.

use anyhow::Result;
use futures::stream::{self, StreamExt};
use peti_core::{bootstrap, Config, GameDatabase, ResilioClient};
use serde::Serialize;
use std::path::Path;
use tracing::{error, info, warn};

use crate::folder::SyncFolder;
use crate::plan::{apply_denylist, ReconcilePlan};

/// Folder API calls in flight at most
pub(crate) const MAX_CONCURRENT_CALLS: usize = 8;

#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateOptions {
    /// Leave denied games registered and on disk
    pub keep_discarded_games: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateReport {
    pub added: usize,
    pub removed: usize,
    pub unchanged: usize,
    pub failed: usize,
}

pub async fn run(config: &Config, options: &UpdateOptions) -> Result<UpdateReport> {
    let client = ResilioClient::new(config)?;
    let db = prepare_database(config).await?;

    info!("Prepare lists of games...");
    let allowed: Vec<SyncFolder> = db
        .allowed_folders()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let mut denied: Vec<SyncFolder> = db
        .discarded_folders()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let (allowed, moved) = apply_denylist(allowed, &config.games.denylist);
    for folder in &moved {
        info!("Move game {} to deny list...", folder);
    }
    denied.extend(moved);

    let mut desired = system_folders(config);
    desired.extend(allowed);
    info!("Found {} allowed folders to sync.", desired.len());
    info!("Found {} games to remove if existing.", denied.len());

    let actual = client.folders().await?;
    let plan = ReconcilePlan::compute(&desired, &denied, &actual, &config.resilio_sync_dir);

    let mut report = UpdateReport {
        unchanged: plan.unchanged,
        ..Default::default()
    };

    if plan.is_noop() {
        info!("Daemon already matches the configuration, nothing to do");
        return Ok(report);
    }

    info!("Synchronizing {} new folders...", plan.add.len());
    let results = stream::iter(&plan.add)
        .map(|folder| {
            let client = &client;
            let sync_dir = config.resilio_sync_dir.as_path();
            async move { register_folder(client, folder, sync_dir).await }
        })
        .buffer_unordered(MAX_CONCURRENT_CALLS)
        .collect::<Vec<bool>>()
        .await;
    report.added = results.iter().filter(|ok| **ok).count();
    report.failed += results.len() - report.added;

    if options.keep_discarded_games {
        info!("Keeping {} discarded folders as requested", plan.remove.len());
    } else {
        info!("Removing {} denied folders...", plan.remove.len());
        let results = stream::iter(&plan.remove)
            .map(|folder| {
                let client = &client;
                let sync_dir = config.resilio_sync_dir.as_path();
                async move { unregister_folder(client, folder, sync_dir).await }
            })
            .buffer_unordered(MAX_CONCURRENT_CALLS)
            .collect::<Vec<bool>>()
            .await;
        report.removed = results.iter().filter(|ok| **ok).count();
        report.failed += results.len() - report.removed;
    }

    info!(
        "Games synchronized: {} added, {} removed, {} unchanged, {} failed",
        report.added, report.removed, report.unchanged, report.failed
    );
    Ok(report)
}

/// System tool folders declared in the configuration
pub(crate) fn system_folders(config: &Config) -> Vec<SyncFolder> {
    config
        .folders
        .iter()
        .map(|(name, entry)| SyncFolder::system(name.clone(), entry.secret.clone()))
        .collect()
}

/// Open the game database, bootstrapping the initial copy when missing.
async fn prepare_database(config: &Config) -> Result<GameDatabase> {
    match GameDatabase::prepare(config).await {
        Err(e) if should_bootstrap(config) => {
            warn!("ETI database file not found ({}), downloading initial database...", e);
            bootstrap::download_initial_database(config).await?;
            GameDatabase::prepare(config).await
        }
        other => other,
    }
}

/// Download the initial database only when no local copy exists at all.
/// Any other open failure must surface; an existing copy may be newer than
/// the bootstrap archive and must never be overwritten by it.
fn should_bootstrap(config: &Config) -> bool {
    !config.database_path().exists()
}

async fn register_folder(client: &ResilioClient, folder: &SyncFolder, sync_dir: &Path) -> bool {
    info!("[{}] processing...", folder);
    let dir = folder.share_dir(sync_dir);

    let result = async {
        client.add_folder(&dir, &folder.secret).await?;
        client.set_folder_prefs(&dir, &folder.secret).await
    }
    .await;

    match result {
        Ok(()) => true,
        Err(e) => {
            error!("Error processing folder '{}': {}", folder.name, e);
            false
        }
    }
}

/// Remove a folder from the daemon and delete its local share directory.
pub(crate) async fn unregister_folder(
    client: &ResilioClient,
    folder: &SyncFolder,
    sync_dir: &Path,
) -> bool {
    info!("Removing {}...", folder);
    let dir = folder.share_dir(sync_dir);

    if let Err(e) = client.remove_folder(&dir, &folder.secret).await {
        error!("Error removing folder '{}': {}", folder.name, e);
        return false;
    }

    let local_path = Path::new(&dir);
    if local_path.exists() {
        if let Err(e) = tokio::fs::remove_dir_all(local_path).await {
            error!("Could not delete local folder '{}': {}", dir, e);
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_folders_come_from_config() {
        let config: Config = serde_yaml::from_str(
            r#"
resilio_host: "localhost:8888"
resilio_sync_dir: /data/sync
data_dir: /data
folders:
  eti_launcher:
    secret: KEY_L
  eti_tools:
    secret: KEY_T
"#,
        )
        .unwrap();

        let folders = system_folders(&config);
        assert_eq!(folders.len(), 2);
        assert!(folders
            .iter()
            .all(|folder| folder.name == folder.id && !folder.secret.is_empty()));
    }

    #[test]
    fn bootstrap_only_without_local_database() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config: Config = serde_yaml::from_str(&format!(
            r#"
resilio_host: "localhost:8888"
resilio_sync_dir: /data/sync
data_dir: {}
"#,
            tmp.path().display()
        ))
        .unwrap();

        assert!(should_bootstrap(&config));

        // A present copy, however broken, must not be replaced by the
        // bootstrap archive.
        std::fs::write(config.database_path(), b"not sqlite").unwrap();
        assert!(!should_bootstrap(&config));
    }
}
