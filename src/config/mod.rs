use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

use crate::errors::FormError;

const CONFIG_DIR_NAME: &str = "business-form";
const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_CATEGORIES_URL: &str = "http://localhost:3000/categories";
pub const CATEGORIES_URL_ENV: &str = "BUSINESS_FORM_CATEGORIES_URL";

/// Where a completed submission is handed off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubmissionTarget {
    /// Write the payload to the log.
    Log,
    /// Print the payload as JSON on stdout.
    Stdout,
    File { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub categories_url: String,
    pub request_timeout_secs: u64,
    pub suggestion_grace_ms: u64,
    pub submission: SubmissionTarget,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            categories_url: DEFAULT_CATEGORIES_URL.into(),
            request_timeout_secs: 10,
            suggestion_grace_ms: 100,
            submission: SubmissionTarget::Stdout,
        }
    }
}

impl Config {
    /// Applies environment overrides on top of the loaded values.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = env::var(CATEGORIES_URL_ENV) {
            if !url.trim().is_empty() {
                self.categories_url = url;
            }
        }
        self
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Manager for `<config dir>/business-form/config.json`.
    pub fn new() -> Result<Self, FormError> {
        let base = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(Self::with_path(
            base.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME),
        ))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Missing files yield the defaults.
    pub fn load(&self) -> Result<Config, FormError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }
}
