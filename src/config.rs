//! Host preferences: the options the user picked last time.
//!
//! The engine itself keeps no state between runs; this store belongs to the
//! terminal host. Results are never written here.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::options::Options;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub word_mode: String,
    pub language: String,
    pub time_mode: String,
}

impl Default for Config {
    fn default() -> Self {
        Options::default().into()
    }
}

impl From<Options> for Config {
    fn from(options: Options) -> Self {
        Self {
            word_mode: options.word_mode.to_string(),
            language: options.language.to_string(),
            time_mode: options.time_mode.to_string(),
        }
    }
}

impl Config {
    pub fn options(&self) -> Options {
        Options::normalize(&self.word_mode, &self.language, &self.time_mode)
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "typetuto") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("typetuto_config.json")
        };
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
    /// Falls back to defaults when the file is missing or unreadable.
    fn load(&self) -> Config {
        fs::read(&self.path)
            .ok()
            .and_then(|bytes| serde_json::from_slice::<Config>(&bytes).ok())
            .unwrap_or_default()
    }

    fn save(&self, cfg: &Config) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
