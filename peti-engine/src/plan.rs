//! Plan computation for folder reconciliation
//!
//! Pure diff of the desired folder set (configuration plus game database)
//! against the folder list the daemon actually has registered. The apply
//! steps in `update` and `cleanup` only ever execute a plan, so an unchanged
//! configuration yields an empty plan and no mutating API calls.

use peti_core::FolderInfo;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::folder::SyncFolder;

/// Result of diffing desired against actual state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcilePlan {
    /// Desired folders the daemon does not know yet
    pub add: Vec<SyncFolder>,
    /// Denied folders the daemon still has registered
    pub remove: Vec<SyncFolder>,
    /// Desired folders already registered, left untouched
    pub unchanged: usize,
}

impl ReconcilePlan {
    pub fn compute(
        desired: &[SyncFolder],
        denied: &[SyncFolder],
        actual: &[FolderInfo],
        sync_dir: &Path,
    ) -> Self {
        let registered: HashSet<String> = actual.iter().map(|f| normalize_dir(&f.dir)).collect();

        let mut add = Vec::new();
        let mut unchanged = 0;
        for folder in desired {
            if registered.contains(&normalize_dir(&folder.share_dir(sync_dir))) {
                unchanged += 1;
            } else {
                add.push(folder.clone());
            }
        }

        let remove = denied
            .iter()
            .filter(|folder| registered.contains(&normalize_dir(&folder.share_dir(sync_dir))))
            .cloned()
            .collect();

        Self {
            add,
            remove,
            unchanged,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}

/// Move denylisted entries from the allowed set over to the denied set.
/// Returns `(allowed, denied)`.
pub fn apply_denylist(
    allowed: Vec<SyncFolder>,
    denylist: &[String],
) -> (Vec<SyncFolder>, Vec<SyncFolder>) {
    let denied_ids: HashSet<&str> = denylist.iter().map(String::as_str).collect();
    let (denied, kept): (Vec<_>, Vec<_>) = allowed
        .into_iter()
        .partition(|folder| denied_ids.contains(folder.id.as_str()));
    (kept, denied)
}

/// The daemon reports the directory strings it was given, but has been seen
/// with a trailing separator appended.
fn normalize_dir(dir: &str) -> String {
    dir.trim_end_matches('/').to_string()
}
