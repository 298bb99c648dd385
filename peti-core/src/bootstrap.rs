//! Initial game database download
//!
//! A fresh install has no `game.db` yet and the sync that would deliver one
//! needs the database to set itself up. The ETI project hosts a bootstrap
//! archive for exactly this case.

use anyhow::Result;
use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::db::LOCAL_DB_NAME;

pub const SYNC_SERVER_DOWNLOAD_URL: &str = "https://www.eti-lan.xyz/sync_server.tar";

/// Download the bootstrap archive and extract `game.db` into the data dir.
pub async fn download_initial_database(config: &Config) -> Result<()> {
    info!("Downloading initial game database...");

    let response = reqwest::get(SYNC_SERVER_DOWNLOAD_URL)
        .await?
        .error_for_status()?;
    let bytes = response.bytes().await?;

    let download_dir = config.data_dir.join("download");
    tokio::fs::create_dir_all(&download_dir).await?;
    let tar_path = download_dir.join("sync_server.tar");
    tokio::fs::write(&tar_path, &bytes).await?;

    let db_path = config.database_path();
    let result = extract_database(&tar_path, &db_path);

    // Leftover download data is of no further use either way
    tokio::fs::remove_dir_all(&download_dir).await.ok();
    result?;

    info!("Initial game database downloaded to {}", db_path.display());
    Ok(())
}

/// Unpack the archive member ending in `game.db` to the given path.
fn extract_database(tar_path: &Path, db_path: &Path) -> Result<()> {
    let file = std::fs::File::open(tar_path)?;
    let mut archive = tar::Archive::new(file);

    for entry in archive.entries()? {
        let mut entry = entry?;
        let is_database = entry.path()?.to_string_lossy().ends_with(LOCAL_DB_NAME);
        if is_database {
            entry.unpack(db_path)?;
            return Ok(());
        }
    }

    anyhow::bail!("Download failed: {} not found in tarball", LOCAL_DB_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tar_with_member(dir: &Path, member: &str, content: &[u8]) -> std::path::PathBuf {
        let tar_path = dir.join("sync_server.tar");
        let file = std::fs::File::create(&tar_path).unwrap();
        let mut builder = tar::Builder::new(file);

        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, member, content).unwrap();
        builder.finish().unwrap();

        tar_path
    }

    #[test]
    fn extracts_nested_database_member() {
        let tmp = TempDir::new().unwrap();
        let tar_path = tar_with_member(tmp.path(), "sync_server/update/game.db", b"sqlite bytes");
        let db_path = tmp.path().join("game.db");

        extract_database(&tar_path, &db_path).unwrap();

        assert_eq!(std::fs::read(&db_path).unwrap(), b"sqlite bytes");
    }

    #[test]
    fn missing_database_member_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let tar_path = tar_with_member(tmp.path(), "sync_server/readme.txt", b"nope");
        let db_path = tmp.path().join("game.db");

        assert!(extract_database(&tar_path, &db_path).is_err());
        assert!(!db_path.exists());
    }
}
