use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::{redirect, Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::FeedError;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    pub backend: BackendConfig,
    pub expansion: ExpansionConfig,
    pub feed: FeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub request_timeout_seconds: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpansionConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub max_terms: usize,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    pub suggested_topics: Vec<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_owned(),
            request_timeout_seconds: 15,
            user_agent: "GovFeed/0.1".to_owned(),
        }
    }
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://api.datamuse.com/words".to_owned(),
            max_terms: 5,
            request_timeout_seconds: 3,
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            suggested_topics: ["AI", "Defense", "Cybersecurity", "China", "Pentagon"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
        }
    }
}

impl BackendConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl ExpansionConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl EngineConfig {
    /// Default location: `<config dir>/govfeed/config.json`.
    pub fn config_file_path() -> Option<PathBuf> {
        let mut dir = dirs::config_dir()?;
        dir.push("govfeed");
        dir.push("config.json");
        Some(dir)
    }

    /// Loads the user configuration, writing the defaults on first run.
    pub fn load() -> Self {
        let Some(path) = Self::config_file_path() else {
            warn!("no user config directory; using default configuration");
            return Self::default();
        };
        if path.exists() {
            return Self::load_from(&path);
        }
        let config = Self::default();
        if let Err(err) = config.save_to(&path) {
            warn!(error = %err, path = %path.display(), "failed to write default configuration");
        }
        config
    }

    /// Reads a config file; unreadable or corrupted files yield the defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read(path) {
            Ok(bytes) => match serde_json::from_slice::<EngineConfig>(&bytes) {
                Ok(config) => config,
                Err(err) => {
                    warn!(error = %err, path = %path.display(), "invalid configuration, using defaults");
                    Self::default()
                }
            },
            Err(err) => {
                warn!(error = %err, path = %path.display(), "cannot read configuration, using defaults");
                Self::default()
            }
        }
    }

    /// Writes the configuration as pretty JSON, creating parent directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Shared HTTP client used by every backend call.
    pub fn http_client(&self) -> Result<Client, FeedError> {
        let client = ClientBuilder::new()
            .redirect(redirect::Policy::limited(5))
            .user_agent(self.backend.user_agent.clone())
            .timeout(self.backend.request_timeout())
            .build()?;
        Ok(client)
    }
}
