use anyhow::{Context, Result};
use std::path::PathBuf;

const DEFAULT_DATA_PATH: &str = "all_data.csv";
const DEFAULT_LOG_FILE: &str = "logs/ecommerce_dashboard.log";
const DEFAULT_TOP_N: usize = 5;

/// Runtime settings read from the environment (and `.env`, once loaded).
///
/// | Variable              | Default                          |
/// |-----------------------|----------------------------------|
/// | `DASHBOARD_DATA_PATH` | `all_data.csv`                   |
/// | `DASHBOARD_TOP_N`     | `5`                              |
/// | `LOG_FILE_PATH`       | `logs/ecommerce_dashboard.log`   |
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub top_n: usize,
    pub log_file_path: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            top_n: DEFAULT_TOP_N,
            log_file_path: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("DASHBOARD_DATA_PATH") {
            config.data_path = PathBuf::from(path);
        }
        if let Some(top_n) = lookup("DASHBOARD_TOP_N") {
            config.top_n = top_n
                .parse()
                .with_context(|| format!("DASHBOARD_TOP_N must be a count, got {top_n:?}"))?;
        }
        if let Some(path) = lookup("LOG_FILE_PATH") {
            config.log_file_path = PathBuf::from(path);
        }

        Ok(config)
    }
}
