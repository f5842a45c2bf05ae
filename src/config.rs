use std::path::PathBuf;

use serde::Deserialize;
use tracing::warn;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    pub web_root: PathBuf,
    pub index_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            web_root: PathBuf::from("public"),
            index_file: "index.html".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration: defaults, then the YAML file named by
    /// `WICKET_CONFIG` (if any), then the `LISTEN` env override.
    pub fn load() -> Self {
        let mut cfg = match std::env::var("WICKET_CONFIG") {
            Ok(path) => Self::from_file(&path).unwrap_or_else(|e| {
                warn!(config = %path, error = %e, "Failed to load config file, using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        };

        if let Ok(addr) = std::env::var("LISTEN") {
            cfg.listen_addr = addr;
        }

        cfg
    }

    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }
}
