//! Configuration management

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::convert::DEFAULT_EPG_URL;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// EPG source written into the `x-tvg-url` header of converted playlists.
    #[serde(default = "default_epg_url")]
    pub epg_url: String,
}

fn default_epg_url() -> String {
    DEFAULT_EPG_URL.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            epg_url: default_epg_url(),
        }
    }
}

impl AppConfig {
    fn config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("iptv_toolkit");
        fs::create_dir_all(&path).ok();
        path.push("config.json");
        path
    }

    /// Load the config file, writing the defaults on first run so the
    /// configuration surface is discoverable.
    pub fn load() -> Self {
        let path = Self::config_path();

        if path.exists() {
            if let Ok(content) = fs::read_to_string(&path) {
                if let Ok(config) = serde_json::from_str(&content) {
                    return config;
                }
            }
            return Self::default();
        }

        let config = Self::default();
        config.save();
        config
    }

    pub fn save(&self) {
        let path = Self::config_path();
        if let Ok(content) = serde_json::to_string_pretty(self) {
            let _ = fs::write(path, content);
        }
    }
}
