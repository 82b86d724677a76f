//! User configuration and data locations

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::export::DEFAULT_EXPORT_FILE;
use crate::store::StoreError;
use crate::task::Category;

pub const APP_NAME: &str = "taskstreak";
pub const DATA_DIR_ENV: &str = "TASKSTREAK_HOME";
pub const DEBUG_ENV: &str = "TASKSTREAK_DEBUG";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub default_category: Category,

    #[serde(default = "default_export_path")]
    pub export_path: PathBuf,

    /// Theme used until the user toggles it for the first time.
    #[serde(default)]
    pub dark_mode_default: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_category: Category::default(),
            export_path: default_export_path(),
            dark_mode_default: false,
        }
    }
}

fn default_export_path() -> PathBuf {
    PathBuf::from(DEFAULT_EXPORT_FILE)
}

impl Config {
    /// Reads `config.toml` from `data_dir`; a missing file means defaults.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Like [`Config::load`], but writes the defaults out on first run so the
    /// user has a file to edit.
    pub fn load_or_init(data_dir: &Path) -> Result<Self> {
        if data_dir.join(CONFIG_FILE).exists() {
            return Self::load(data_dir);
        }

        let config = Self::default();
        config.save(data_dir)?;
        debug!(dir = %data_dir.display(), "wrote default config");
        Ok(config)
    }

    pub fn save(&self, data_dir: &Path) -> Result<()> {
        fs::create_dir_all(data_dir)?;
        let content = toml::to_string_pretty(self)?;
        fs::write(data_dir.join(CONFIG_FILE), content)?;
        Ok(())
    }
}

/// `explicit` (from `--data-dir` or `TASKSTREAK_HOME`) wins over the platform
/// data directory.
pub fn data_dir(explicit: Option<&Path>) -> std::result::Result<PathBuf, StoreError> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }
    dirs::data_dir()
        .map(|d| d.join(APP_NAME))
        .ok_or(StoreError::NoDataDir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.default_category, Category::Other);
        assert_eq!(config.export_path, PathBuf::from("todo-list.txt"));
        assert!(!config.dark_mode_default);
    }

    #[test]
    fn test_config_deserialize_empty_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_deserialize_partial_toml() {
        let toml = r#"
            default_category = "Work"
            dark_mode_default = true
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.default_category, Category::Work);
        assert!(config.dark_mode_default);
        assert_eq!(config.export_path, PathBuf::from("todo-list.txt"));
    }

    #[test]
    fn test_config_missing_file_is_default() -> Result<()> {
        let temp = tempdir()?;
        assert_eq!(Config::load(temp.path())?, Config::default());
        Ok(())
    }

    #[test]
    fn test_config_save_and_load() -> Result<()> {
        let temp = tempdir()?;
        let config = Config {
            default_category: Category::Study,
            export_path: PathBuf::from("/tmp/list.txt"),
            dark_mode_default: true,
        };
        config.save(temp.path())?;
        assert_eq!(Config::load(temp.path())?, config);
        Ok(())
    }

    #[test]
    fn test_load_or_init_writes_defaults_once() -> Result<()> {
        let temp = tempdir()?;
        let dir = temp.path().join("fresh");

        assert_eq!(Config::load_or_init(&dir)?, Config::default());
        assert!(dir.join(CONFIG_FILE).exists());

        fs::write(dir.join(CONFIG_FILE), "default_category = \"Health\"\n")?;
        let config = Config::load_or_init(&dir)?;
        assert_eq!(config.default_category, Category::Health);
        Ok(())
    }

    #[test]
    fn test_data_dir_prefers_explicit() -> Result<()> {
        let explicit = PathBuf::from("/somewhere/else");
        assert_eq!(data_dir(Some(explicit.as_path()))?, explicit);

        if let Ok(dir) = data_dir(None) {
            assert!(dir.ends_with(APP_NAME));
        }
        Ok(())
    }
}
