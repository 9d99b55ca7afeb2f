pub mod feed;

pub use feed::{InMemoryFeed, PriceFile};

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use common::{Asset, Error, ExecutionClient, Result, TargetPercentOrder};

/// Simulated execution layer for paper runs.
///
/// Target percentages are recorded as the simulated book; nothing is sent to
/// a broker and no fills, prices or slippage are modelled.
pub struct PaperClient {
    /// Assets reported as not tradable (halted, delisted, ...).
    non_tradable: HashSet<Asset>,
    /// Current target weight per asset.
    holdings: Arc<RwLock<BTreeMap<Asset, f64>>>,
    /// Every accepted instruction, in submission order.
    orders: Arc<RwLock<Vec<TargetPercentOrder>>>,
}

impl PaperClient {
    pub fn new(non_tradable: impl IntoIterator<Item = Asset>) -> Self {
        let non_tradable: HashSet<Asset> = non_tradable.into_iter().collect();
        info!(non_tradable = non_tradable.len(), "PaperClient initialized");
        Self {
            non_tradable,
            holdings: Arc::new(RwLock::new(BTreeMap::new())),
            orders: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Expose the simulated book (for reporting and tests).
    pub fn holdings_handle(&self) -> Arc<RwLock<BTreeMap<Asset, f64>>> {
        self.holdings.clone()
    }

    pub async fn orders(&self) -> Vec<TargetPercentOrder> {
        self.orders.read().await.clone()
    }
}

#[async_trait]
impl ExecutionClient for PaperClient {
    async fn is_tradable(&self, asset: &Asset) -> Result<bool> {
        Ok(!self.non_tradable.contains(asset))
    }

    async fn submit_target_percent(&self, order: &TargetPercentOrder) -> Result<()> {
        if !order.weight.is_finite() {
            return Err(Error::Execution(format!(
                "PaperClient refuses non-finite target {} for '{}'",
                order.weight, order.asset
            )));
        }
        if self.non_tradable.contains(&order.asset) {
            return Err(Error::Execution(format!("'{}' is not tradable", order.asset)));
        }

        debug!(asset = %order.asset, weight = order.weight, "Paper target applied");

        let mut holdings = self.holdings.write().await;
        if order.weight == 0.0 {
            holdings.remove(&order.asset);
        } else {
            holdings.insert(order.asset.clone(), order.weight);
        }
        drop(holdings);

        self.orders.write().await.push(order.clone());
        Ok(())
    }
}
