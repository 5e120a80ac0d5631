// File: ./src/context.rs
//! Where sheetcal keeps its files.
//!
//! ```text
//! <config_dir>/config.toml
//! <data_dir>/store/calendarEventsV1.json
//! <data_dir>/sheetcal.log
//! ```
//!
//! With `--root <path>` both directories move under `<path>`; otherwise the
//! platform's per-user locations are used.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub trait AppContext: Send + Sync + std::fmt::Debug {
    fn get_data_dir(&self) -> Result<PathBuf>;
    fn get_config_dir(&self) -> Result<PathBuf>;

    fn get_config_file_path(&self) -> Result<PathBuf> {
        Ok(self.get_config_dir()?.join("config.toml"))
    }

    /// Backing directory of the snapshot store. Created on demand.
    fn get_store_dir(&self) -> Result<PathBuf> {
        make_dir(self.get_data_dir()?.join("store"))
    }

    /// `None` when there is no usable data directory; logging then stays on stderr.
    fn get_log_path(&self) -> Option<PathBuf> {
        self.get_data_dir().ok().map(|p| p.join("sheetcal.log"))
    }
}

fn make_dir(dir: PathBuf) -> Result<PathBuf> {
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create directory: {:?}", dir))?;
    Ok(dir)
}

/// Platform directories, or `data/` and `config/` under an explicit root.
#[derive(Clone, Debug)]
pub struct StandardContext {
    root: Option<PathBuf>,
}

impl StandardContext {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    fn resolve(&self, sub: &str, pick: fn(&ProjectDirs) -> &Path) -> Result<PathBuf> {
        let dir = match &self.root {
            Some(root) => root.join(sub),
            None => {
                let dirs = ProjectDirs::from("com", "sheetcal", "sheetcal")
                    .ok_or_else(|| anyhow::anyhow!("No home directory"))?;
                pick(&dirs).to_path_buf()
            }
        };
        make_dir(dir)
    }
}

impl AppContext for StandardContext {
    fn get_data_dir(&self) -> Result<PathBuf> {
        self.resolve("data", ProjectDirs::data_dir)
    }

    fn get_config_dir(&self) -> Result<PathBuf> {
        self.resolve("config", ProjectDirs::config_dir)
    }
}

/// Throwaway root under the system temp dir, deleted on drop.
#[derive(Clone, Debug)]
pub struct TestContext {
    pub root: PathBuf,
}

impl TestContext {
    pub fn new() -> Self {
        let root = std::env::temp_dir().join(format!("sheetcal_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&root).expect("failed to create TestContext temp dir");
        Self { root }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AppContext for TestContext {
    fn get_data_dir(&self) -> Result<PathBuf> {
        make_dir(self.root.join("data"))
    }

    fn get_config_dir(&self) -> Result<PathBuf> {
        make_dir(self.root.join("config"))
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}
