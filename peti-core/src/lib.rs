//! Core library for the pETI sync server
//!
//! This crate provides configuration loading, the Resilio Sync control-API
//! client, read access to the ETI game database and the initial database
//! bootstrap. The reconciliation logic on top of it lives in `peti-engine`.

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod db;

// Re-export main types and functions
pub use api::{ApiMethod, FolderInfo, ResilioClient, ResilioError};
pub use config::Config;
pub use db::{FolderRecord, GameDatabase};
