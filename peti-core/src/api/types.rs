//! Request and response types for the Resilio Sync control API

use serde::{Deserialize, Serialize};

/// API methods this tool issues against the daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMethod {
    GetFolders,
    AddFolder,
    SetFolderPrefs,
    RemoveFolder,
}

impl ApiMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiMethod::GetFolders => "get_folders",
            ApiMethod::AddFolder => "add_folder",
            ApiMethod::SetFolderPrefs => "set_folder_prefs",
            ApiMethod::RemoveFolder => "remove_folder",
        }
    }
}

/// One folder as reported by `get_folders`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderInfo {
    pub dir: String,
    #[serde(default)]
    pub secret: String,
    #[serde(default)]
    pub error: i64,
    #[serde(default)]
    pub indexing: i64,
}

/// Envelope returned by mutating calls. A missing `error` field means success.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub error: i64,
    #[serde(default)]
    pub message: String,
}

impl ApiResponse {
    pub fn is_ok(&self) -> bool {
        self.error == 0
    }

    /// Message for the operator, with known codes mapped to readable text.
    pub fn describe(&self) -> String {
        match describe_error_code(self.error) {
            Some(text) => text.to_string(),
            None => self.message.clone(),
        }
    }
}

/// Readable text for daemon error codes that come back with a bare number.
pub fn describe_error_code(code: i64) -> Option<&'static str> {
    match code {
        3 => Some("Folder is not known"),
        _ => None,
    }
}
