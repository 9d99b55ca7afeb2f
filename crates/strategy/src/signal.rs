use tracing::debug;

use common::{Asset, SignalRow, SkipReason, Skipped};

use crate::config::MomentumConfig;
use crate::indicators::SmaIndicator;

/// Turns an asset's trailing closes into a directional signal.
///
/// Pure: the same closes always produce the same row.
#[derive(Debug, Clone)]
pub struct SignalComputer {
    indicator: SmaIndicator,
    multiplier: f64,
}

impl SignalComputer {
    pub fn new(window_length: usize, multiplier: f64) -> Self {
        Self {
            indicator: SmaIndicator::new(window_length),
            multiplier,
        }
    }

    pub fn from_config(cfg: &MomentumConfig) -> Self {
        Self::new(cfg.window_length, cfg.signal_multiplier)
    }

    pub fn window_length(&self) -> usize {
        self.indicator.period
    }

    /// Evaluate one asset. `closes` is oldest first and ends with the close on
    /// the as-of date.
    ///
    /// Fewer than `window_length` closes, or any unusable price inside the
    /// window, excludes the asset for the day.
    pub fn evaluate(&self, asset: &Asset, closes: &[f64]) -> Result<SignalRow, SkipReason> {
        let required = self.indicator.period;
        if closes.len() < required {
            return Err(SkipReason::InsufficientHistory {
                required,
                available: closes.len(),
            });
        }

        let window = &closes[closes.len() - required..];
        if window.iter().any(|c| !c.is_finite() || *c <= 0.0) {
            return Err(SkipReason::InvalidPrice);
        }

        let reference = self
            .indicator
            .compute(window)
            .ok_or(SkipReason::InsufficientHistory {
                required,
                available: closes.len(),
            })?;
        let close = window[window.len() - 1];

        // Strict: a close exactly at the threshold is short.
        let signal = close > self.multiplier * reference;

        debug!(asset = %asset, close, reference, signal, "Signal computed");

        Ok(SignalRow {
            asset: asset.clone(),
            close,
            reference,
            signal,
        })
    }

    /// Evaluate a batch, splitting it into usable rows and excluded assets.
    pub fn evaluate_all<'a, I>(&self, inputs: I) -> (Vec<SignalRow>, Vec<Skipped>)
    where
        I: IntoIterator<Item = (&'a Asset, &'a [f64])>,
    {
        let mut rows = Vec::new();
        let mut excluded = Vec::new();
        for (asset, closes) in inputs {
            match self.evaluate(asset, closes) {
                Ok(row) => rows.push(row),
                Err(reason) => excluded.push(Skipped {
                    asset: asset.clone(),
                    reason,
                }),
            }
        }
        (rows, excluded)
    }
}
