use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Top-level configuration, loaded once at startup from a YAML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Host and port of the Resilio Sync control API, e.g. "localhost:8888"
    pub resilio_host: String,
    #[serde(default)]
    pub resilio_auth: ResilioAuth,
    /// Directory under which all share folders live
    pub resilio_sync_dir: PathBuf,
    /// Directory holding the local game database and downloads
    pub data_dir: PathBuf,
    /// Opaque query options appended verbatim to folder API calls
    #[serde(default)]
    pub resilio_sync_options: String,
    /// System tool folders (launcher, updater, ...) keyed by folder name
    #[serde(default)]
    pub folders: BTreeMap<String, FolderEntry>,
    #[serde(default)]
    pub games: GamesConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResilioAuth {
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderEntry {
    pub secret: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GamesConfig {
    /// Game ids that must never be synced, even when the database allows them
    #[serde(default)]
    pub denylist: Vec<String>,
}

impl Config {
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            anyhow::anyhow!("cannot read configuration file {}: {}", path.display(), e)
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.resilio_host.is_empty() {
            anyhow::bail!("resilio_host cannot be empty");
        }
        if self.resilio_sync_dir.as_os_str().is_empty() {
            anyhow::bail!("resilio_sync_dir cannot be empty");
        }
        if self.data_dir.as_os_str().is_empty() {
            anyhow::bail!("data_dir cannot be empty");
        }
        for (name, entry) in &self.folders {
            if entry.secret.is_empty() {
                anyhow::bail!("folder '{}' has an empty secret", name);
            }
        }
        Ok(())
    }

    /// Path of the local game database copy.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(crate::db::LOCAL_DB_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
resilio_host: "localhost:8888"
resilio_auth:
  user: admin
  password: secret
resilio_sync_dir: /data/sync
data_dir: /data
resilio_sync_options: "selective_sync=0"
folders:
  eti_launcher:
    secret: AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA
games:
  denylist:
    - some_game
"#;

    #[test]
    fn parse_sample_config() {
        let config: Config = serde_yaml::from_str(SAMPLE).unwrap();
        assert_eq!(config.resilio_host, "localhost:8888");
        assert_eq!(config.resilio_auth.user, "admin");
        assert_eq!(config.resilio_sync_dir, PathBuf::from("/data/sync"));
        assert_eq!(config.folders.len(), 1);
        assert_eq!(config.games.denylist, vec!["some_game".to_string()]);
        config.validate().unwrap();
    }

    #[test]
    fn optional_sections_default() {
        let yaml = r#"
resilio_host: "localhost:8888"
resilio_sync_dir: /data/sync
data_dir: /data
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.resilio_auth.user.is_empty());
        assert!(config.resilio_sync_options.is_empty());
        assert!(config.folders.is_empty());
        assert!(config.games.denylist.is_empty());
        config.validate().unwrap();
    }

    #[test]
    fn empty_host_rejected() {
        let yaml = r#"
resilio_host: ""
resilio_sync_dir: /data/sync
data_dir: /data
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_folder_secret_rejected() {
        let yaml = r#"
resilio_host: "localhost:8888"
resilio_sync_dir: /data/sync
data_dir: /data
folders:
  eti_launcher:
    secret: ""
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let result: std::result::Result<Config, _> = serde_yaml::from_str("folders: [not: a: map");
        assert!(result.is_err());
    }
}
