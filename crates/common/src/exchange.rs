use async_trait::async_trait;

use crate::{Asset, Result, TargetPercentOrder};

/// Abstraction over the order-execution layer.
///
/// `PaperClient` implements this for simulation. A broker adapter for live
/// trading implements the same trait outside this workspace.
///
/// Only `RebalanceDriver` in `crates/engine` should hold a reference to a
/// `dyn ExecutionClient`.
#[async_trait]
pub trait ExecutionClient: Send + Sync {
    /// Whether the asset can be traded right now.
    async fn is_tradable(&self, asset: &Asset) -> Result<bool>;

    /// Move the holding in `order.asset` to `order.weight` of portfolio equity.
    async fn submit_target_percent(&self, order: &TargetPercentOrder) -> Result<()>;
}
