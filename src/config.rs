//! User settings loaded from `<config dir>/courier/config.yaml`
//!
//! Every field is optional. A missing file means defaults; a broken file means
//! defaults plus a warning in the log.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_HTTP_URL, DEFAULT_LOG_FILE, DEFAULT_TIMEOUT_SECS, MAX_TIMEOUT_SECS, MIN_TIMEOUT_SECS,
};
use crate::models::RequestConfig;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// URL pre-filled in a fresh form
    pub default_url: String,
    pub timeout_secs: f64,
    pub verify_ssl: bool,
    /// Where response bodies are saved
    pub download_dir: PathBuf,
    pub log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            default_url: String::from(DEFAULT_HTTP_URL),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            verify_ssl: true,
            download_dir: PathBuf::from("."),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl Settings {
    /// Default settings file location, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("courier").join("config.yaml"))
    }

    /// Load from the default location.
    ///
    /// Always yields usable settings; the error, if any, explains why the
    /// defaults were used instead of the file. The caller logs it once the
    /// log file is known.
    pub fn load() -> (Self, Option<anyhow::Error>) {
        let Some(path) = Self::default_path() else {
            return (Settings::default(), None);
        };
        if !path.exists() {
            return (Settings::default(), None);
        }
        match Self::load_from(&path) {
            Ok(settings) => (settings, None),
            Err(e) => (Settings::default(), Some(e)),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(settings.normalized())
    }

    fn normalized(mut self) -> Self {
        if !self.timeout_secs.is_finite() {
            self.timeout_secs = DEFAULT_TIMEOUT_SECS;
        }
        self.timeout_secs = self.timeout_secs.clamp(MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS);
        self
    }

    /// A fresh request form seeded from these settings
    pub fn initial_request(&self) -> RequestConfig {
        RequestConfig {
            url: self.default_url.clone(),
            timeout_secs: self.timeout_secs,
            verify_ssl: self.verify_ssl,
            ..RequestConfig::default()
        }
    }
}
