//! Read-only access to the ETI launcher game database
//!
//! The database is produced by the launcher ecosystem and distributed
//! through the sync itself; this tool only ever reads it. Three tables
//! matter here: `games` and `tools` list folders to sync, `discarded`
//! lists folders to remove.

use anyhow::Result;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Row, SqlitePool};
use std::path::Path;
use tracing::{error, info};

use crate::config::Config;

pub const LOCAL_DB_NAME: &str = "game.db";

/// Location inside the sync dir where the launcher drops database updates
pub const LAUNCHER_DB_UPDATE_PATH: &str = "eti_launcher/update/game.db";

/// One folder row from the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderRecord {
    pub name: String,
    pub id: String,
    pub secret: String,
}

pub struct GameDatabase {
    pool: SqlitePool,
}

impl GameDatabase {
    /// Refresh the local database copy from the sync dir, then open it.
    ///
    /// Fails when no local copy exists; callers may bootstrap one and retry.
    pub async fn prepare(config: &Config) -> Result<Self> {
        refresh_local_copy(config);

        let db_path = config.database_path();
        if !db_path.exists() {
            anyhow::bail!("ETI database file not found: {}", db_path.display());
        }
        Self::open(&db_path).await
    }

    pub async fn open(path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true);
        let pool = SqlitePool::connect_with(options).await?;
        Ok(Self { pool })
    }

    /// Games and tools to sync, in database order
    pub async fn allowed_folders(&self) -> Result<Vec<FolderRecord>> {
        let mut records = Vec::new();

        let rows = sqlx::query("SELECT game_key, game_title, game_id FROM games ORDER BY db_id")
            .fetch_all(&self.pool)
            .await?;
        for row in rows {
            records.push(FolderRecord {
                secret: row.get::<String, _>(0),
                name: row.get::<String, _>(1),
                id: row.get::<String, _>(2),
            });
        }

        let rows = sqlx::query("SELECT tool_key, tool_name, tool_id FROM tools ORDER BY db_id")
            .fetch_all(&self.pool)
            .await?;
        for row in rows {
            records.push(FolderRecord {
                secret: row.get::<String, _>(0),
                name: row.get::<String, _>(1),
                id: row.get::<String, _>(2),
            });
        }

        Ok(records)
    }

    /// Folders marked for removal. The database keeps no title for these,
    /// so the folder id doubles as the display name.
    pub async fn discarded_folders(&self) -> Result<Vec<FolderRecord>> {
        let rows = sqlx::query("SELECT game_key, game_id FROM discarded ORDER BY del_id")
            .fetch_all(&self.pool)
            .await?;

        let records = rows
            .into_iter()
            .map(|row| {
                let id = row.get::<String, _>(1);
                FolderRecord {
                    secret: row.get::<String, _>(0),
                    name: id.clone(),
                    id,
                }
            })
            .collect();

        Ok(records)
    }
}

/// Copy a database update distributed through the sync over the local copy.
/// A failed copy is logged and the stale local copy stays in use.
fn refresh_local_copy(config: &Config) {
    let update_path = config.resilio_sync_dir.join(LAUNCHER_DB_UPDATE_PATH);
    if !update_path.exists() {
        return;
    }

    info!("Updating database from download: {}", update_path.display());
    if let Err(e) = std::fs::copy(&update_path, config.database_path()) {
        error!("Could not copy updated games database: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded_database() -> GameDatabase {
        // One connection, so every query sees the same in-memory database
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        sqlx::query(
            "CREATE TABLE games (db_id INTEGER PRIMARY KEY, game_key TEXT, game_title TEXT, game_id TEXT)",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "CREATE TABLE tools (db_id INTEGER PRIMARY KEY, tool_key TEXT, tool_name TEXT, tool_id TEXT)",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "CREATE TABLE discarded (del_id INTEGER PRIMARY KEY, game_key TEXT, game_id TEXT)",
        )
        .execute(&pool)
        .await
        .unwrap();

        sqlx::query("INSERT INTO games VALUES (2, 'KEY_B', 'Game B', 'game_b')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO games VALUES (1, 'KEY_A', 'Game A', 'game_a')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO tools VALUES (1, 'KEY_T', 'Launcher', 'eti_launcher')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO discarded VALUES (1, 'KEY_OLD', 'old_game')")
            .execute(&pool)
            .await
            .unwrap();

        GameDatabase { pool }
    }

    #[tokio::test]
    async fn allowed_folders_in_database_order() {
        let db = seeded_database().await;
        let folders = db.allowed_folders().await.unwrap();

        let ids: Vec<&str> = folders.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["game_a", "game_b", "eti_launcher"]);
        assert_eq!(folders[0].name, "Game A");
        assert_eq!(folders[0].secret, "KEY_A");
    }

    #[tokio::test]
    async fn discarded_folders_use_id_as_name() {
        let db = seeded_database().await;
        let folders = db.discarded_folders().await.unwrap();

        assert_eq!(folders.len(), 1);
        assert_eq!(folders[0].id, "old_game");
        assert_eq!(folders[0].name, "old_game");
        assert_eq!(folders[0].secret, "KEY_OLD");
    }
}
