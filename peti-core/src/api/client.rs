use super::{error::*, types::*};
use crate::config::Config;
use reqwest::ClientBuilder;
use std::time::Duration;
use tracing::{debug, info};

/// Client for the Resilio Sync control API.
///
/// The daemon speaks a GET-only query-string protocol:
/// `http://{host}/api?method={method}&dir={dir}&secret={secret}&{options}`.
pub struct ResilioClient {
    http_client: reqwest::Client,
    base_url: String,
    user: String,
    password: String,
    /// Opaque pass-through options from the configuration
    sync_options: String,
}

impl ResilioClient {
    /// Create a new client from the loaded configuration
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = format!("http://{}", config.resilio_host);
        url::Url::parse(&base_url)?;

        // Build HTTP client with reasonable defaults
        let http_client = ClientBuilder::new()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("peti-sync/0.1.0")
            .build()
            .map_err(ResilioError::Network)?;

        Ok(Self {
            http_client,
            base_url,
            user: config.resilio_auth.user.clone(),
            password: config.resilio_auth.password.clone(),
            sync_options: config.resilio_sync_options.clone(),
        })
    }

    /// List all folders currently registered with the daemon
    pub async fn folders(&self) -> Result<Vec<FolderInfo>> {
        debug!("Fetching folder list from daemon");
        let url = format!("{}/api?method={}", self.base_url, ApiMethod::GetFolders.as_str());
        let response = self.send(&url).await?;

        if response.status().is_success() {
            let folders: Vec<FolderInfo> = response.json().await?;
            debug!("Daemon reports {} registered folders", folders.len());
            Ok(folders)
        } else {
            Err(self.server_error(response).await)
        }
    }

    /// Register a folder, or refresh its secret if already registered
    pub async fn add_folder(&self, dir: &str, secret: &str) -> Result<()> {
        self.folder_call(ApiMethod::AddFolder, dir, secret, false).await?;
        info!("[{}] added or updated", dir);
        Ok(())
    }

    /// Push the configured sync options to a registered folder
    pub async fn set_folder_prefs(&self, dir: &str, secret: &str) -> Result<()> {
        self.folder_call(ApiMethod::SetFolderPrefs, dir, secret, false).await?;
        info!("[{}] preferences updated", dir);
        Ok(())
    }

    /// Remove a folder from the daemon. Unknown folders (code 3) are tolerated.
    pub async fn remove_folder(&self, dir: &str, secret: &str) -> Result<()> {
        match self.folder_call(ApiMethod::RemoveFolder, dir, secret, true).await {
            Ok(()) => {
                info!("[{}] removed", dir);
                Ok(())
            }
            Err(ResilioError::Api { code: 3, .. }) => {
                debug!("[{}] already unknown to the daemon", dir);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn folder_call(
        &self,
        method: ApiMethod,
        dir: &str,
        secret: &str,
        force: bool,
    ) -> Result<()> {
        let mut url = format!(
            "{}/api?method={}&dir={}",
            self.base_url,
            method.as_str(),
            dir
        );
        if !secret.is_empty() {
            url.push_str(&format!("&secret={}", secret));
        }
        if !self.sync_options.is_empty() {
            url.push('&');
            url.push_str(&self.sync_options);
        }
        if force {
            url.push_str("&force=1");
        }

        let response = self.send(&url).await?;
        if !response.status().is_success() {
            return Err(self.server_error(response).await);
        }

        let api_response: ApiResponse = response.json().await?;
        if api_response.is_ok() {
            Ok(())
        } else {
            Err(ResilioError::Api {
                code: api_response.error,
                message: api_response.describe(),
            })
        }
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response> {
        let mut request = self.http_client.get(url);
        if !self.user.is_empty() {
            request = request.basic_auth(&self.user, Some(&self.password));
        }
        Ok(request.send().await?)
    }

    async fn server_error(&self, response: reqwest::Response) -> ResilioError {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        ResilioError::Server { status, message }
    }
}
