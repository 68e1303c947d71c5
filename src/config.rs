//! Runtime configuration.
//!
//! Resolved in layers: built-in defaults, then `~/.satstack/config.toml`
//! (or `--config`), then environment/CLI overrides parsed by clap.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::SatstackError;
use crate::pricing::DEFAULT_PRICE_URL;
use crate::rates::DEFAULT_SERIES_URL;

const APP_DIR: &str = ".satstack";
const CACHE_DIR: &str = "satstack";
const CONFIG_FILENAME: &str = "config.toml";
const LEDGER_FILENAME: &str = "carteira.json";
const RATES_FILENAME: &str = "selic.csv";

const DEFAULT_RATES_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PRICE_TIMEOUT_SECS: u64 = 5;

/// Keys accepted in `config.toml`; all optional.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub ledger_path: Option<PathBuf>,
    pub rates_file: Option<PathBuf>,
    pub offline: Option<bool>,
    pub series_url: Option<String>,
    pub price_url: Option<String>,
    pub rates_timeout_secs: Option<u64>,
    pub price_timeout_secs: Option<u64>,
    pub accept_invalid_certs: Option<bool>,
}

/// Values given on the command line or through `SATSTACK_*` variables.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub ledger_path: Option<PathBuf>,
    pub rates_file: Option<PathBuf>,
    pub offline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub ledger_path: PathBuf,
    pub rates_file: PathBuf,
    pub offline: bool,
    pub series_url: String,
    pub price_url: String,
    pub rates_timeout: Duration,
    pub price_timeout: Duration,
    /// Skip TLS verification for the SELIC endpoint
    pub accept_invalid_certs: bool,
}

impl Config {
    /// Resolve the configuration for this process.
    pub fn load(overrides: &Overrides) -> Result<Self> {
        let app_dir = default_app_dir()?;
        let cache_dir = default_cache_dir()?;

        let file = match &overrides.config_path {
            Some(path) => Some(read_config_file(path)?),
            None => {
                let path = app_dir.join(CONFIG_FILENAME);
                if path.exists() {
                    Some(read_config_file(&path)?)
                } else {
                    None
                }
            }
        };

        Ok(Self::resolve(&app_dir, &cache_dir, file.unwrap_or_default(), overrides))
    }

    /// Merge the layers. Later layers win.
    pub fn resolve(
        app_dir: &Path,
        cache_dir: &Path,
        file: FileConfig,
        overrides: &Overrides,
    ) -> Self {
        let config = Self {
            ledger_path: overrides
                .ledger_path
                .clone()
                .or(file.ledger_path)
                .unwrap_or_else(|| app_dir.join(LEDGER_FILENAME)),
            rates_file: overrides
                .rates_file
                .clone()
                .or(file.rates_file)
                .unwrap_or_else(|| cache_dir.join(CACHE_DIR).join(RATES_FILENAME)),
            offline: overrides.offline || file.offline.unwrap_or(false),
            series_url: file
                .series_url
                .unwrap_or_else(|| DEFAULT_SERIES_URL.to_string()),
            price_url: file
                .price_url
                .unwrap_or_else(|| DEFAULT_PRICE_URL.to_string()),
            rates_timeout: Duration::from_secs(
                file.rates_timeout_secs
                    .unwrap_or(DEFAULT_RATES_TIMEOUT_SECS),
            ),
            price_timeout: Duration::from_secs(
                file.price_timeout_secs
                    .unwrap_or(DEFAULT_PRICE_TIMEOUT_SECS),
            ),
            accept_invalid_certs: file.accept_invalid_certs.unwrap_or(true),
        };
        debug!("Resolved configuration: {:?}", config);
        config
    }
}

fn read_config_file(path: &Path) -> Result<FileConfig> {
    let content =
        fs::read_to_string(path).context(format!("Failed to read config file {:?}", path))?;
    toml::from_str(&content)
        .map_err(|e| SatstackError::ConfigError(format!("{}: {}", path.display(), e)).into())
}

/// `~/.satstack`
pub fn default_app_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(APP_DIR))
}

/// `$XDG_CACHE_HOME`, falling back to the platform cache directory
pub fn default_cache_dir() -> Result<PathBuf> {
    std::env::var_os("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .or_else(dir_spec::cache_home)
        .ok_or_else(|| anyhow!("Could not determine cache directory"))
}
