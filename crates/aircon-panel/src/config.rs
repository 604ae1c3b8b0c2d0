//! Panel configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PanelConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub scene: SceneConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the AC service
    #[serde(default = "default_url")]
    pub url: String,
    /// Identity sent with every command
    #[serde(default = "default_user")]
    pub user: String,
    /// Snapshot poll period in seconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            user: default_user(),
            poll_interval_secs: default_poll_interval(),
        }
    }
}

fn default_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_user() -> String {
    aircon_core::DEFAULT_USER.to_string()
}

fn default_poll_interval() -> u64 {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Whether walls and roof start visible
    #[serde(default = "default_true")]
    pub walls_visible: bool,
    /// Upper bound of the floor separation slider
    #[serde(default = "default_separation_max")]
    pub separation_max: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            walls_visible: true,
            separation_max: default_separation_max(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_separation_max() -> f32 {
    2.0
}

/// Load configuration from file, falling back to defaults when it is missing
pub fn load_config(path: &Path) -> Result<PanelConfig> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config: PanelConfig = toml::from_str(&content)?;
        if config.backend.poll_interval_secs == 0 {
            anyhow::bail!("backend.poll_interval_secs must be at least 1");
        }
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(PanelConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("aircon-panel.toml")).unwrap();
        assert_eq!(config.backend.url, "http://127.0.0.1:8000");
        assert_eq!(config.backend.user, "Admin");
        assert_eq!(config.backend.poll_interval_secs, 5);
        assert!(config.scene.walls_visible);
        assert_eq!(config.scene.separation_max, 2.0);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aircon-panel.toml");
        std::fs::write(
            &path,
            "[backend]\nurl = \"http://10.0.0.5:8000\"\n\n[scene]\nwalls_visible = false\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.backend.url, "http://10.0.0.5:8000");
        assert_eq!(config.backend.poll_interval_secs, 5);
        assert!(!config.scene.walls_visible);
        assert_eq!(config.scene.separation_max, 2.0);
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aircon-panel.toml");
        std::fs::write(&path, "[backend]\npoll_interval_secs = 0\n").unwrap();
        assert!(load_config(&path).is_err());
    }
}
