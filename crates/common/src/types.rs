use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Opaque identifier of a tradable instrument, e.g. "AAPL".
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Asset(String);

impl Asset {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Asset {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One daily close as supplied by the market-data feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub asset: Asset,
    pub date: NaiveDate,
    pub close: f64,
}

/// Output of the signal computer for one asset on one day.
/// Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRow {
    pub asset: Asset,
    /// Close on the as-of date.
    pub close: f64,
    /// Moving-average reference over the trailing window, as-of date included.
    pub reference: f64,
    /// `close > multiplier * reference`. Ties are short.
    pub signal: bool,
}

/// The day's eligible universe split by signal direction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Basket {
    pub longs: BTreeSet<Asset>,
    pub shorts: BTreeSet<Asset>,
}

impl Basket {
    pub fn len(&self) -> usize {
        self.longs.len() + self.shorts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.longs.is_empty() && self.shorts.is_empty()
    }
}

/// Fraction of equity committed to each side of the book.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeverageBudget {
    pub long_leverage: f64,
    /// Conventionally zero or negative.
    pub short_leverage: f64,
}

impl LeverageBudget {
    /// Fully invested in longs, shorts flattened.
    pub fn long_only() -> Self {
        Self {
            long_leverage: 1.0,
            short_leverage: 0.0,
        }
    }

    /// Half the equity long, half short.
    pub fn long_short() -> Self {
        Self {
            long_leverage: 0.5,
            short_leverage: -0.5,
        }
    }
}

impl Default for LeverageBudget {
    fn default() -> Self {
        Self::long_only()
    }
}

/// Fraction of portfolio equity to hold in an asset. Negative means short.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetWeight {
    pub asset: Asset,
    pub weight: f64,
}

/// A "set target portfolio percentage" instruction for the execution layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetPercentOrder {
    pub id: String,
    pub asset: Asset,
    pub weight: f64,
}

impl TargetPercentOrder {
    pub fn new(target: &TargetWeight) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            asset: target.asset.clone(),
            weight: target.weight,
        }
    }
}

/// Why an asset dropped out of a day's cycle. None of these fail the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SkipReason {
    InsufficientHistory { required: usize, available: usize },
    MissingClose,
    InvalidPrice,
    FeedError(String),
    NotTradable,
    TradabilityCheckFailed(String),
    SubmissionFailed(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::InsufficientHistory { required, available } => {
                write!(f, "insufficient history ({available} of {required} closes)")
            }
            SkipReason::MissingClose => write!(f, "no close on as-of date"),
            SkipReason::InvalidPrice => write!(f, "non-positive or non-finite close"),
            SkipReason::FeedError(e) => write!(f, "market data unavailable: {e}"),
            SkipReason::NotTradable => write!(f, "not tradable"),
            SkipReason::TradabilityCheckFailed(e) => write!(f, "tradability check failed: {e}"),
            SkipReason::SubmissionFailed(e) => write!(f, "submission failed: {e}"),
        }
    }
}

/// An asset skipped for the day, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skipped {
    pub asset: Asset,
    pub reason: SkipReason,
}

/// Phase of the per-day rebalance cycle. Reset to `Idle` every day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DayPhase {
    #[default]
    Idle,
    SignalStaged,
    BasketsPartitioned,
    WeightsComputed,
    OrdersSubmitted,
}

impl DayPhase {
    /// The phase that must follow this one.
    pub fn next(self) -> DayPhase {
        match self {
            DayPhase::Idle => DayPhase::SignalStaged,
            DayPhase::SignalStaged => DayPhase::BasketsPartitioned,
            DayPhase::BasketsPartitioned => DayPhase::WeightsComputed,
            DayPhase::WeightsComputed => DayPhase::OrdersSubmitted,
            DayPhase::OrdersSubmitted => DayPhase::Idle,
        }
    }
}

impl std::fmt::Display for DayPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayPhase::Idle => write!(f, "idle"),
            DayPhase::SignalStaged => write!(f, "signal_staged"),
            DayPhase::BasketsPartitioned => write!(f, "baskets_partitioned"),
            DayPhase::WeightsComputed => write!(f, "weights_computed"),
            DayPhase::OrdersSubmitted => write!(f, "orders_submitted"),
        }
    }
}

/// End-of-day summary of one rebalance cycle. Logged, not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayReport {
    pub trade_date: NaiveDate,
    pub as_of: NaiveDate,
    pub longs: usize,
    pub shorts: usize,
    pub submitted: Vec<TargetWeight>,
    pub skipped: Vec<Skipped>,
}

impl DayReport {
    /// Sum of absolute submitted weights.
    pub fn gross_exposure(&self) -> f64 {
        self.submitted.iter().map(|t| t.weight.abs()).sum()
    }

    /// Sum of signed submitted weights.
    pub fn net_exposure(&self) -> f64 {
        self.submitted.iter().map(|t| t.weight).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_cycle_returns_to_idle() {
        let mut phase = DayPhase::Idle;
        for _ in 0..5 {
            phase = phase.next();
        }
        assert_eq!(phase, DayPhase::Idle);
    }

    #[test]
    fn target_percent_orders_get_unique_ids() {
        let target = TargetWeight { asset: "AAPL".into(), weight: 0.25 };
        let a = TargetPercentOrder::new(&target);
        let b = TargetPercentOrder::new(&target);
        assert_ne!(a.id, b.id);
        assert_eq!(a.asset.as_str(), "AAPL");
        assert_eq!(a.weight, 0.25);
    }

    #[test]
    fn report_exposures() {
        let report = DayReport {
            trade_date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            as_of: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            longs: 1,
            shorts: 1,
            submitted: vec![
                TargetWeight { asset: "A".into(), weight: 0.5 },
                TargetWeight { asset: "B".into(), weight: -0.5 },
            ],
            skipped: Vec::new(),
        };
        assert!((report.gross_exposure() - 1.0).abs() < 1e-12);
        assert!(report.net_exposure().abs() < 1e-12);
    }
}
