//! Folder model shared by plan computation and the apply steps

use peti_core::FolderRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A folder managed through the sync daemon.
///
/// `name` is what the operator sees in logs, `id` is the path component
/// under the sync dir, `secret` is the Resilio share key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncFolder {
    pub name: String,
    pub id: String,
    pub secret: String,
}

impl SyncFolder {
    pub fn new(
        name: impl Into<String>,
        id: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            secret: secret.into(),
        }
    }

    /// A system tool folder from the configuration; its name doubles as id.
    pub fn system(name: impl Into<String>, secret: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            secret: secret.into(),
        }
    }

    /// The share directory submitted to (and reported by) the daemon
    pub fn share_dir(&self, sync_dir: &Path) -> String {
        format!("{}/{}", sync_dir.display(), self.id)
    }
}

impl From<FolderRecord> for SyncFolder {
    fn from(record: FolderRecord) -> Self {
        Self {
            name: record.name,
            id: record.id,
            secret: record.secret,
        }
    }
}

impl fmt::Display for SyncFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.name, self.id)
    }
}
