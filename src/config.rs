use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::app_dirs::AppDirs;
use crate::generator::drill;
use crate::practice::{PracticeMode, PracticeSettings};
use crate::registry::RowId;
use crate::runtime::TICK_RATE_MS;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub mode: PracticeMode,
    pub start_row: RowId,
    pub tick_rate_ms: u64,
    /// Characters per drill; paragraphs keep their own length target
    pub drill_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: PracticeMode::Characters,
            start_row: RowId::Home,
            tick_rate_ms: TICK_RATE_MS,
            drill_length: drill::TARGET_LENGTH,
        }
    }
}

impl Config {
    /// Replace stored values the practice loop cannot use with their defaults
    fn validated(mut self) -> Self {
        if !(1..=drill::MAX_TARGET_LENGTH).contains(&self.drill_length) {
            warn!(
                drill_length = self.drill_length,
                max = drill::MAX_TARGET_LENGTH,
                "drill length out of range, using default"
            );
            self.drill_length = drill::TARGET_LENGTH;
        }
        self
    }

    pub fn practice_settings(&self) -> PracticeSettings {
        PracticeSettings {
            mode: self.mode,
            row: self.start_row,
            drill_length: self.drill_length,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("keyforge_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg.validated(),
            Err(err) => {
                warn!(path = %self.path.display(), %err, "ignoring unreadable config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
