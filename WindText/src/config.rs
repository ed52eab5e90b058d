//! Configuration for windtext.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::archive::DEFAULT_BANK_PATH;
use crate::error::Result;
use crate::formats::bmg::EncodeOptions;

/// Config file name looked up in the working directory and config dir
pub const CONFIG_FILE_NAME: &str = "windtext.toml";

fn default_bank_path() -> String {
    DEFAULT_BANK_PATH.to_string()
}

fn default_true() -> bool {
    true
}

/// The full configuration (windtext.toml)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Logical path of the bank inside an extracted archive
    #[serde(default = "default_bank_path")]
    pub bank_path: String,
    #[serde(default)]
    pub encode: EncodeSettings,
    #[serde(default)]
    pub export: ExportSettings,
}

/// Encoder settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeSettings {
    #[serde(default)]
    pub zero_total_size: bool,
}

/// CSV export settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSettings {
    #[serde(default = "default_true")]
    pub csv_header: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self { csv_header: true }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bank_path: default_bank_path(),
            encode: EncodeSettings::default(),
            export: ExportSettings::default(),
        }
    }
}

impl Config {
    /// Parse a config from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a config file
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Load the config
    ///
    /// Uses `explicit` if given (which must exist), otherwise the first of
    /// `./windtext.toml` and `<config dir>/WindText/windtext.toml` that
    /// exists, otherwise the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_file(path);
        }

        for candidate in Self::search_paths() {
            if candidate.is_file() {
                tracing::debug!("Using config {}", candidate.display());
                return Self::load_file(candidate);
            }
        }

        Ok(Self::default())
    }

    /// Candidate config locations, in lookup order
    #[must_use]
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("WindText").join(CONFIG_FILE_NAME));
        }
        paths
    }

    /// Encoder options derived from this config
    #[must_use]
    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            zero_total_size: self.encode.zero_total_size,
        }
    }
}
