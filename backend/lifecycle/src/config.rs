//! Application configuration loaded from environment variables.

use std::path::PathBuf;
use std::str::FromStr;

use waqf_engine::EngineConfig;

use crate::errors::{LifecycleError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// JSON array of persisted waqf profiles to sweep
    pub snapshot_path: PathBuf,
    /// Where each sweep writes its report
    pub report_path: PathBuf,
    /// How often (in seconds) to run a sweep
    pub sweep_interval_secs: u64,
    /// Engine constants; only the default revolving lock is read from the
    /// environment, it dates revolving waqfs stored without lock details
    pub engine: EngineConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Missing keys take their defaults.
    pub fn from_source<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = EngineConfig::default();
        Ok(Config {
            snapshot_path: lookup("SNAPSHOT_PATH")
                .unwrap_or_else(|| "./waqfs.json".to_string())
                .into(),
            report_path: lookup("REPORT_PATH")
                .unwrap_or_else(|| "./lifecycle_report.json".to_string())
                .into(),
            sweep_interval_secs: parse_or(&lookup, "SWEEP_INTERVAL_SECS", 60)?,
            engine: EngineConfig {
                default_lock_period_months: parse_or(
                    &lookup,
                    "DEFAULT_LOCK_PERIOD_MONTHS",
                    defaults.default_lock_period_months,
                )?,
                ..defaults
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| LifecycleError::Config(format!("Invalid {key}: {raw}"))),
        None => Ok(default),
    }
}
