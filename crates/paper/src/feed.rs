use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use common::{Asset, MarketDataFeed, PriceObservation, Result};

/// On-disk price history for paper runs (JSON).
///
/// ```json
/// {
///   "closes": {
///     "AAPL": { "2024-01-02": 185.64, "2024-01-03": 184.25 },
///     "MSFT": { "2024-01-02": 370.87, "2024-01-03": 370.60 }
///   },
///   "universe": {
///     "2024-01-03": ["AAPL", "MSFT"]
///   }
/// }
/// ```
///
/// When `universe` is omitted, every asset with a close on a date is eligible
/// on that date.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PriceFile {
    pub closes: BTreeMap<Asset, BTreeMap<NaiveDate, f64>>,
    #[serde(default)]
    pub universe: Option<BTreeMap<NaiveDate, Vec<Asset>>>,
}

/// Market-data feed backed by a fully loaded `PriceFile`.
pub struct InMemoryFeed {
    data: PriceFile,
}

impl InMemoryFeed {
    pub fn new(data: PriceFile) -> Self {
        Self { data }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let feed = Self::from_json(&content)?;
        info!(
            path,
            assets = feed.data.closes.len(),
            sessions = feed.sessions().len(),
            "Price file loaded"
        );
        Ok(feed)
    }

    /// Every date with at least one close, ascending.
    pub fn sessions(&self) -> Vec<NaiveDate> {
        let dates: BTreeSet<NaiveDate> = self
            .data
            .closes
            .values()
            .flat_map(|series| series.keys().copied())
            .collect();
        dates.into_iter().collect()
    }
}

#[async_trait]
impl MarketDataFeed for InMemoryFeed {
    async fn eligible_assets(&self, date: NaiveDate) -> Result<Vec<Asset>> {
        if let Some(universe) = &self.data.universe {
            return Ok(universe.get(&date).cloned().unwrap_or_default());
        }
        Ok(self
            .data
            .closes
            .iter()
            .filter(|(_, series)| series.contains_key(&date))
            .map(|(asset, _)| asset.clone())
            .collect())
    }

    async fn trailing_closes(
        &self,
        asset: &Asset,
        as_of: NaiveDate,
        window: usize,
    ) -> Result<Vec<PriceObservation>> {
        let Some(series) = self.data.closes.get(asset) else {
            return Ok(Vec::new());
        };
        let mut observations: Vec<PriceObservation> = series
            .range(..=as_of)
            .rev()
            .take(window)
            .map(|(date, close)| PriceObservation {
                asset: asset.clone(),
                date: *date,
                close: *close,
            })
            .collect();
        observations.reverse();
        Ok(observations)
    }
}
