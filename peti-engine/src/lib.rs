//! Reconciliation engine for the pETI sync server
//!
//! Aligns the folder set registered with a Resilio Sync daemon with the
//! desired set derived from configuration and the ETI game database:
//! - Pure plan computation (desired vs. actual diff)
//! - The `update` operation applying a plan with bounded concurrency
//! - The confirmation-gated destructive `cleanup` operation

pub mod cleanup;
pub mod folder;
pub mod plan;
pub mod update;


// Re-export main types and functions
pub use cleanup::CleanupReport;
pub use folder::SyncFolder;
pub use plan::{apply_denylist, ReconcilePlan};
pub use update::{UpdateOptions, UpdateReport};
