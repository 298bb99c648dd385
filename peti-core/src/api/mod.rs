//! Resilio Sync control API client
//!
//! Thin wrapper around the daemon's local HTTP API. All calls are GET
//! requests with query-string parameters and JSON responses; credentials
//! from the configuration are sent as HTTP basic auth.

pub mod client;
pub mod error;
pub mod types;

// Re-export main types for convenience
pub use client::ResilioClient;
pub use error::{ResilioError, Result};
pub use types::{ApiMethod, ApiResponse, FolderInfo};
