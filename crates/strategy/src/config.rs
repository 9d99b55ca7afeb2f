use common::LeverageBudget;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read strategy config at '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse strategy config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid strategy config: {0}")]
    Invalid(String),
}

/// Named leverage presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeverageProfile {
    /// Longs at 1.0, shorts flattened to 0.0.
    #[default]
    LongOnly,
    /// Longs at 0.5, shorts at -0.5.
    LongShort,
}

/// Momentum strategy config file (TOML). Set once at process start.
///
/// Example `config/momentum.toml`:
/// ```toml
/// window_length = 10
/// signal_multiplier = 1.0
/// leverage_profile = "long_short"
///
/// # optional, override the profile
/// long_leverage = 0.6
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MomentumConfig {
    /// Trailing closes in the moving-average reference.
    #[serde(default = "default_window_length")]
    pub window_length: usize,
    /// Close must exceed `signal_multiplier * reference` to go long.
    #[serde(default = "default_signal_multiplier")]
    pub signal_multiplier: f64,
    #[serde(default)]
    pub leverage_profile: LeverageProfile,
    #[serde(default)]
    pub long_leverage: Option<f64>,
    #[serde(default)]
    pub short_leverage: Option<f64>,
}

fn default_window_length() -> usize {
    10
}

fn default_signal_multiplier() -> f64 {
    1.0
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            window_length: default_window_length(),
            signal_multiplier: default_signal_multiplier(),
            leverage_profile: LeverageProfile::default(),
            long_leverage: None,
            short_leverage: None,
        }
    }
}

impl MomentumConfig {
    /// Load and validate from a TOML file.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let cfg: MomentumConfig = toml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_length == 0 {
            return Err(ConfigError::Invalid("window_length must be >= 1".into()));
        }
        if !self.signal_multiplier.is_finite() || self.signal_multiplier <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "signal_multiplier must be a positive number, got {}",
                self.signal_multiplier
            )));
        }
        let budget = self.leverage();
        if !budget.long_leverage.is_finite() || !budget.short_leverage.is_finite() {
            return Err(ConfigError::Invalid("leverage must be finite".into()));
        }
        if budget.short_leverage > 0.0 {
            tracing::warn!(
                short_leverage = budget.short_leverage,
                "short_leverage is positive; short basket will be held long"
            );
        }
        Ok(())
    }

    /// The leverage budget after applying any explicit overrides to the profile.
    pub fn leverage(&self) -> LeverageBudget {
        let base = match self.leverage_profile {
            LeverageProfile::LongOnly => LeverageBudget::long_only(),
            LeverageProfile::LongShort => LeverageBudget::long_short(),
        };
        LeverageBudget {
            long_leverage: self.long_leverage.unwrap_or(base.long_leverage),
            short_leverage: self.short_leverage.unwrap_or(base.short_leverage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let cfg = MomentumConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.window_length, 10);
        assert_eq!(cfg.signal_multiplier, 1.0);
        assert_eq!(cfg.leverage(), LeverageBudget::long_only());
    }

    #[test]
    fn profile_with_override() {
        let cfg = MomentumConfig::from_toml_str(
            r#"
            window_length = 20
            leverage_profile = "long_short"
            long_leverage = 0.6
            "#,
        )
        .unwrap();
        assert_eq!(cfg.window_length, 20);
        let budget = cfg.leverage();
        assert_eq!(budget.long_leverage, 0.6);
        assert_eq!(budget.short_leverage, -0.5);
    }

    #[test]
    fn zero_window_is_rejected() {
        let err = MomentumConfig::from_toml_str("window_length = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn non_positive_multiplier_is_rejected() {
        assert!(MomentumConfig::from_toml_str("signal_multiplier = 0.0").is_err());
        assert!(MomentumConfig::from_toml_str("signal_multiplier = -1.5").is_err());
    }

    #[test]
    fn unknown_profile_fails_to_parse() {
        let err = MomentumConfig::from_toml_str(r#"leverage_profile = "yolo""#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = MomentumConfig::load("/nonexistent/momentum.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/momentum.toml"));
    }
}
