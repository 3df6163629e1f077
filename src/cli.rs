//! Shared plumbing for the binaries in `src/bin/`: flag groups, appid list
//! parsing, environment loading and tracing setup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing_subscriber::EnvFilter;

use crate::cache::FsStore;
use crate::client::{ClientConfig, SteamClient};
use crate::types::identifiers::{AppId, IdentifierError, Locale};

/// Loads `.env` and then `config/.env`. Already-set variables win.
pub fn load_env() {
    for path in [".env", "config/.env"] {
        if Path::new(path).exists() {
            if let Err(err) = dotenvy::from_filename(path) {
                eprintln!("warning: could not load {path}: {err}");
            }
        }
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

pub fn now_ts() -> i64 {
    chrono::Utc::now().timestamp()
}

/// `570, 730,,440` → `[570, 730, 440]`.
pub fn parse_appid_csv(csv: &str) -> Result<Vec<AppId>, IdentifierError> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

/// One appid per line; blank lines and `#` comment lines are skipped.
pub fn parse_appid_lines(text: &str) -> Result<Vec<AppId>, IdentifierError> {
    text.lines()
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.starts_with('#'))
        .map(str::parse)
        .collect()
}

#[derive(Debug, Clone, Args)]
pub struct DataArgs {
    /// Root of the raw/interim/processed tree
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,
}

impl DataArgs {
    pub fn store(&self) -> FsStore {
        FsStore::new(&self.data_dir)
    }
}

#[derive(Debug, Clone, Args)]
pub struct LocaleArgs {
    /// Store country code
    #[arg(long, default_value = "us")]
    pub cc: String,

    /// Store language
    #[arg(long, default_value = "en")]
    pub lang: String,
}

impl LocaleArgs {
    pub fn locale(&self) -> Locale {
        Locale::new(self.cc.clone(), self.lang.clone())
    }
}

#[derive(Debug, Clone, Args)]
pub struct AppIdArgs {
    /// Comma-separated appids, e.g. 570,730
    #[arg(long)]
    pub appids: Option<String>,

    /// Text file with one appid per line (# comments allowed)
    #[arg(long)]
    pub appids_file: Option<PathBuf>,
}

impl AppIdArgs {
    /// `--appids` takes precedence over `--appids-file`. Empty when neither is given.
    pub fn resolve(&self) -> Result<Vec<AppId>> {
        if let Some(csv) = &self.appids {
            return parse_appid_csv(csv).context("Invalid --appids");
        }
        if let Some(path) = &self.appids_file {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read appids file: {}", path.display()))?;
            return parse_appid_lines(&text)
                .with_context(|| format!("Invalid appid in {}", path.display()));
        }
        Ok(Vec::new())
    }

    pub fn require(&self) -> Result<Vec<AppId>> {
        let appids = self.resolve()?;
        if appids.is_empty() {
            bail!("Either --appids or --appids-file is required");
        }
        Ok(appids)
    }
}

#[derive(Debug, Clone, Args)]
pub struct ClientArgs {
    /// Steam Web API key (required for owned games, recently played, schema)
    #[arg(long, env = "STEAM_API_KEY", hide_env_values = true)]
    pub steam_api_key: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 10.0)]
    pub timeout: f64,

    #[arg(long, default_value_t = 4)]
    pub max_retries: u32,

    /// Minimum seconds between Web API calls
    #[arg(long, default_value_t = 0.25)]
    pub min_interval_web: f64,

    /// Minimum seconds between Store API calls
    #[arg(long, default_value_t = 0.35)]
    pub min_interval_store: f64,

    #[arg(long, default_value_t = 20)]
    pub news_count: u32,

    #[arg(long, default_value_t = 300)]
    pub news_maxlength: u32,
}

/// Seconds flag → `Duration`. Negative values clamp to zero; NaN, infinite
/// and out-of-range values are rejected.
pub fn duration_secs(flag: &str, value: f64) -> Result<Duration> {
    let clamped = if value < 0.0 { 0.0 } else { value };
    Duration::try_from_secs_f64(clamped)
        .with_context(|| format!("Invalid --{flag}: {value} seconds"))
}

impl ClientArgs {
    pub fn config(&self) -> Result<ClientConfig> {
        Ok(ClientConfig {
            timeout: duration_secs("timeout", self.timeout)?,
            max_retries: self.max_retries,
            min_interval_web: duration_secs("min-interval-web", self.min_interval_web)?,
            min_interval_store: duration_secs("min-interval-store", self.min_interval_store)?,
            news_count: self.news_count,
            news_maxlength: self.news_maxlength,
            ..ClientConfig::default()
        })
    }

    /// Client persisting raw responses under `data`.
    pub fn client(&self, data: &DataArgs) -> Result<SteamClient> {
        Ok(SteamClient::new(
            self.steam_api_key.clone(),
            self.config()?,
            Some(data.store()),
        ))
    }
}
