use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::codec::DEFAULT_MAX_IMAGE_BYTES;

pub const DEFAULT_CONFIG_PATH: &str = "config/client.json";
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Session token sent in the `token` header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: u64,
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_max_image_bytes() -> u64 {
    DEFAULT_MAX_IMAGE_BYTES
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            token: None,
            max_image_bytes: default_max_image_bytes(),
        }
    }
}

impl AppConfig {
    /// Read the config file, falling back to defaults when it is missing or
    /// malformed.
    pub fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                log::info!(
                    "Config file {} not readable ({err}); using defaults",
                    path.display()
                );
                return Self::default();
            }
        };
        serde_json::from_str(&content).unwrap_or_else(|err| {
            log::warn!("Failed to parse config file {}: {err}", path.display());
            Self::default()
        })
    }

    /// Command-line values win over the file.
    pub fn apply_overrides(&mut self, server_url: Option<String>, token: Option<String>) {
        if let Some(url) = server_url {
            self.server_url = url;
        }
        if token.is_some() {
            self.token = token;
        }
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Saved settings to {}", path.display());
        Ok(())
    }
}
