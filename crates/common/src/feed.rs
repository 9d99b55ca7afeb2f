use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{Asset, PriceObservation, Result};

/// Daily close prices and the eligible universe.
///
/// Implementations own the trailing price history; the engine only reads it.
#[async_trait]
pub trait MarketDataFeed: Send + Sync {
    /// Assets that pass the universe filter on `date`.
    async fn eligible_assets(&self, date: NaiveDate) -> Result<Vec<Asset>>;

    /// Up to `window` most recent closes for `asset` on or before `as_of`,
    /// oldest first.
    async fn trailing_closes(
        &self,
        asset: &Asset,
        as_of: NaiveDate,
        window: usize,
    ) -> Result<Vec<PriceObservation>>;

    /// Close of `asset` on exactly `date`, if one was recorded.
    async fn closing_price(&self, asset: &Asset, date: NaiveDate) -> Result<Option<f64>> {
        let last = self.trailing_closes(asset, date, 1).await?;
        Ok(last.into_iter().find(|o| o.date == date).map(|o| o.close))
    }
}
