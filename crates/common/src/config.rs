use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Asset, Error};

/// How the binary drives the daily cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Walk every session in the price file back to back.
    Replay,
    /// Wait for the wall-clock stage / rebalance / close instants.
    Scheduled,
}

impl FromStr for RunMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "replay" => Ok(RunMode::Replay),
            "scheduled" => Ok(RunMode::Scheduled),
            other => Err(Error::Config(format!(
                "RUN_MODE must be 'replay' or 'scheduled', got: '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunMode::Replay => write!(f, "replay"),
            RunMode::Scheduled => write!(f, "scheduled"),
        }
    }
}

/// All process configuration loaded from environment variables at startup.
/// Missing required variables cause an immediate panic with a clear message.
#[derive(Debug, Clone)]
pub struct Config {
    pub run_mode: RunMode,

    // Strategy config file path
    pub strategy_config_path: String,

    // Daily closes and universe for the in-memory feed
    pub price_data_path: String,

    // Assets the paper execution client reports as not tradable
    pub paper_non_tradable: Vec<Asset>,
}

impl Config {
    /// Load all configuration from environment variables.
    /// Loads `.env` if present. Panics on any missing required variable.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore error if .env not present

        let run_mode = optional_env("RUN_MODE")
            .map(|v| v.parse::<RunMode>().unwrap_or_else(|e| panic!("ERROR: {e}")))
            .unwrap_or(RunMode::Replay);

        Config {
            run_mode,
            strategy_config_path: optional_env("STRATEGY_CONFIG_PATH")
                .unwrap_or_else(|| "config/momentum.toml".to_string()),
            price_data_path: required_env("PRICE_DATA_PATH"),
            paper_non_tradable: optional_env("PAPER_NON_TRADABLE")
                .map(|v| parse_asset_list(&v))
                .unwrap_or_default(),
        }
    }
}

/// Split a comma-separated symbol list, ignoring blanks.
pub fn parse_asset_list(raw: &str) -> Vec<Asset> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Asset::from)
        .collect()
}

fn required_env(key: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| {
        panic!("Required environment variable '{key}' is not set. Check your .env file.")
    })
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_mode_parses_case_insensitively() {
        assert_eq!("Replay".parse::<RunMode>().unwrap(), RunMode::Replay);
        assert_eq!(" scheduled ".parse::<RunMode>().unwrap(), RunMode::Scheduled);
        assert!(matches!("live".parse::<RunMode>(), Err(Error::Config(_))));
    }

    #[test]
    fn asset_list_skips_blanks() {
        let assets = parse_asset_list("AAPL, ,MSFT,");
        assert_eq!(assets, vec![Asset::from("AAPL"), Asset::from("MSFT")]);
    }
}
