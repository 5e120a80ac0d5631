// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::context::AppContext;
use crate::display::ViewMode;
use crate::ingest::ColumnLabels;
use crate::model::DateSystem;
use crate::storage::FileStore;
use anyhow::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub view_mode: ViewMode,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub date_system: DateSystem,
    #[serde(default)]
    pub columns: ColumnLabels,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::default(),
            log_level: default_log_level(),
            date_system: DateSystem::default(),
            columns: ColumnLabels::default(),
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Like `load`, but a missing file yields the defaults.
    pub fn load_or_default(ctx: &dyn AppContext) -> Result<Self> {
        match Self::load(ctx) {
            Ok(config) => Ok(config),
            Err(e) if Self::is_missing_config_error(&e) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// Detects whether an error means the config file was missing, as opposed
    /// to unreadable or malformed.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }

        for cause in err.chain() {
            if let Some(io_err) = cause.downcast_ref::<std::io::Error>()
                && io_err.kind() == std::io::ErrorKind::NotFound
            {
                return true;
            }
        }

        false
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        FileStore::with_lock(&path, || {
            let toml_str = toml::to_string_pretty(self)?;
            FileStore::atomic_write(&path, toml_str)?;
            Ok(())
        })?;
        Ok(())
    }

    /// `log_level` as a filter, falling back to `Info` for unknown names.
    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TestContext;

    #[test]
    fn test_missing_file() {
        let ctx = TestContext::new();
        let err = Config::load(&ctx).unwrap_err();
        assert!(Config::is_missing_config_error(&err));
        assert_eq!(Config::load_or_default(&ctx).unwrap(), Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let ctx = TestContext::new();
        let mut config = Config::default();
        config.view_mode = ViewMode::Table;
        config.date_system = DateSystem::Mac1904;
        config.columns.subject = "נושא".to_string();
        config.save(&ctx).unwrap();

        assert_eq!(Config::load(&ctx).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let ctx = TestContext::new();
        let path = ctx.get_config_file_path().unwrap();
        fs::write(&path, "view_mode = \"table\"\n[columns]\nstart = \"Begin\"\n").unwrap();

        let config = Config::load(&ctx).unwrap();
        assert_eq!(config.view_mode, ViewMode::Table);
        assert_eq!(config.columns.start, "Begin");
        assert_eq!(config.columns.subject, "Subject");
        assert_eq!(config.date_system, DateSystem::Excel1900);
        assert_eq!(config.log_level_filter(), log::LevelFilter::Info);
    }

    #[test]
    fn test_malformed_file_is_not_missing() {
        let ctx = TestContext::new();
        let path = ctx.get_config_file_path().unwrap();
        fs::write(&path, "view_mode = [").unwrap();

        let err = Config::load(&ctx).unwrap_err();
        assert!(!Config::is_missing_config_error(&err));
        assert!(Config::load_or_default(&ctx).is_err());
    }
}
