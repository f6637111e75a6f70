//! Configuration management for the speakerid CLI.
//!
//! Configuration is stored in ~/.speakerid/config.yaml.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use speakerid::Config;

/// Default base configuration directory name.
pub const DEFAULT_BASE_DIR: &str = ".speakerid";
/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";
/// Default template store filename, next to the config file.
pub const DEFAULT_STORE_FILE: &str = "templates.txt";

/// CLI settings: where templates live and how they are matched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Template store path (empty means next to the config file).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub store: String,

    /// Matching configuration.
    #[serde(flatten)]
    pub engine: Config,

    /// Path to the config file (not serialized).
    #[serde(skip)]
    config_path: PathBuf,
}

impl Settings {
    /// Gets the default config directory.
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(DEFAULT_BASE_DIR))
    }

    /// Gets the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        Self::default_config_dir().map(|dir| dir.join(DEFAULT_CONFIG_FILE))
    }

    /// Returns the config file path.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Resolves the template store: `override_path`, then the configured
    /// store, then `templates.txt` next to the config file.
    pub fn store_path(&self, override_path: Option<&str>) -> PathBuf {
        match override_path {
            Some(p) if !p.is_empty() => PathBuf::from(p),
            _ if !self.store.is_empty() => PathBuf::from(&self.store),
            _ => self
                .config_path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(DEFAULT_STORE_FILE),
        }
    }

    /// Updates one setting by name.
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "store" => self.store = value.to_string(),
            "dim" => {
                self.engine.dim = value
                    .parse()
                    .with_context(|| format!("invalid dim {value:?}"))?;
            }
            "mode" => {
                self.engine.mode = value.parse().map_err(anyhow::Error::msg)?;
            }
            "workers" => {
                self.engine.workers = value
                    .parse()
                    .with_context(|| format!("invalid workers {value:?}"))?;
            }
            _ => anyhow::bail!("unknown setting '{key}' (want store, dim, mode or workers)"),
        }
        Ok(())
    }

    /// Saves the configuration to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&self.config_path, content)?;
        Ok(())
    }
}

/// Loads settings, creating a default config file if none exists.
pub fn load_settings(custom_path: Option<&str>) -> anyhow::Result<Settings> {
    let config_path = match custom_path {
        Some(p) => PathBuf::from(p),
        None => Settings::default_config_path()
            .ok_or_else(|| anyhow::anyhow!("cannot determine config path"))?,
    };

    let mut settings = if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("reading {}", config_path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("parsing {}", config_path.display()))?
    } else {
        let settings = Settings {
            config_path: config_path.clone(),
            ..Settings::default()
        };
        settings.save()?;
        settings
    };

    settings.engine = settings.engine.with_defaults();
    settings.config_path = config_path;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use speakerid_dtw::Mode;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn missing_file_created_with_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sub").join("config.yaml");
        let settings = load_settings(path.to_str()).unwrap();
        assert!(path.exists());
        assert_eq!(settings.engine, Config::default());
        assert_eq!(settings.store_path(None), dir.path().join("sub").join("templates.txt"));
    }

    #[test]
    fn set_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let mut settings = load_settings(path.to_str()).unwrap();
        settings.set("mode", "window:6").unwrap();
        settings.set("workers", "3").unwrap();
        settings.set("store", "/tmp/voices.txt").unwrap();
        settings.save().unwrap();

        let reloaded = load_settings(path.to_str()).unwrap();
        assert_eq!(reloaded.engine.mode, Mode::Window(6));
        assert_eq!(reloaded.engine.workers, 3);
        assert_eq!(reloaded.engine.dim, 13);
        assert_eq!(reloaded.store_path(None), PathBuf::from("/tmp/voices.txt"));
        assert_eq!(reloaded.store_path(Some("other.txt")), PathBuf::from("other.txt"));
    }

    #[test]
    fn set_rejects_bad_values() {
        let mut settings = Settings::default();
        assert!(settings.set("mode", "fastest").is_err());
        assert!(settings.set("dim", "-1").is_err());
        assert!(settings.set("color", "blue").is_err());
    }

    #[test]
    fn yaml_layout_is_flat() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "store: t.txt\ndim: 20\nmode: banded\n").unwrap();
        let settings = load_settings(path.to_str()).unwrap();
        assert_eq!(settings.engine.dim, 20);
        assert_eq!(settings.engine.mode, Mode::Banded);
        assert_eq!(settings.engine.workers, 1);
    }
}
