use std::sync::Arc;

use tracing::{info, warn};

use common::{ExecutionClient, SkipReason, Skipped, TargetPercentOrder, TargetWeight};

/// What happened to one day's target weights.
#[derive(Debug, Clone, Default)]
pub struct SubmissionOutcome {
    pub submitted: Vec<TargetWeight>,
    pub skipped: Vec<Skipped>,
}

/// Turns target weights into "set target percentage" instructions.
///
/// This is the ONLY component that calls `ExecutionClient`. Each asset is
/// handled on its own: a non-tradable asset or a rejected instruction is
/// skipped for the day and never retried, and it does not stop the rest.
pub struct RebalanceDriver {
    client: Arc<dyn ExecutionClient>,
}

impl RebalanceDriver {
    pub fn new(client: Arc<dyn ExecutionClient>) -> Self {
        Self { client }
    }

    pub async fn submit(&self, targets: &[TargetWeight]) -> SubmissionOutcome {
        let mut outcome = SubmissionOutcome::default();

        for target in targets {
            match self.submit_one(target).await {
                Ok(()) => outcome.submitted.push(target.clone()),
                Err(reason) => {
                    warn!(asset = %target.asset, weight = target.weight, reason = %reason, "Asset skipped");
                    outcome.skipped.push(Skipped {
                        asset: target.asset.clone(),
                        reason,
                    });
                }
            }
        }

        info!(
            submitted = outcome.submitted.len(),
            skipped = outcome.skipped.len(),
            "Rebalance instructions dispatched"
        );
        outcome
    }

    async fn submit_one(&self, target: &TargetWeight) -> Result<(), SkipReason> {
        let tradable = self
            .client
            .is_tradable(&target.asset)
            .await
            .map_err(|e| SkipReason::TradabilityCheckFailed(e.to_string()))?;
        if !tradable {
            return Err(SkipReason::NotTradable);
        }

        let order = TargetPercentOrder::new(target);
        self.client
            .submit_target_percent(&order)
            .await
            .map_err(|e| SkipReason::SubmissionFailed(e.to_string()))?;

        info!(asset = %order.asset, weight = order.weight, order_id = %order.id, "Target percent submitted");
        Ok(())
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use common::{Asset, Error, Result};

    #[derive(Default)]
    struct RecordingClient {
        halted: HashSet<Asset>,
        rejecting: HashSet<Asset>,
        unknown: HashSet<Asset>,
        orders: Mutex<Vec<TargetPercentOrder>>,
    }

    #[async_trait]
    impl ExecutionClient for RecordingClient {
        async fn is_tradable(&self, asset: &Asset) -> Result<bool> {
            if self.unknown.contains(asset) {
                return Err(Error::Execution("status unavailable".into()));
            }
            Ok(!self.halted.contains(asset))
        }

        async fn submit_target_percent(&self, order: &TargetPercentOrder) -> Result<()> {
            if self.rejecting.contains(&order.asset) {
                return Err(Error::Execution("rejected".into()));
            }
            self.orders.lock().await.push(order.clone());
            Ok(())
        }
    }

    fn target(asset: &str, weight: f64) -> TargetWeight {
        TargetWeight { asset: asset.into(), weight }
    }

    #[tokio::test]
    async fn non_tradable_asset_gets_no_order() {
        let client = Arc::new(RecordingClient {
            halted: HashSet::from([Asset::from("D")]),
            ..Default::default()
        });
        let driver = RebalanceDriver::new(client.clone());

        let outcome = driver.submit(&[target("D", 0.2), target("E", 0.2)]).await;

        let orders = client.orders.lock().await;
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].asset, Asset::from("E"));
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].asset, Asset::from("D"));
        assert_eq!(outcome.skipped[0].reason, SkipReason::NotTradable);
    }

    #[tokio::test]
    async fn rejected_submission_does_not_block_others() {
        let client = Arc::new(RecordingClient {
            rejecting: HashSet::from([Asset::from("A")]),
            ..Default::default()
        });
        let driver = RebalanceDriver::new(client.clone());

        let outcome = driver
            .submit(&[target("A", 0.25), target("B", 0.25), target("C", -0.5)])
            .await;

        assert_eq!(outcome.submitted.len(), 2);
        assert!(matches!(
            outcome.skipped[0].reason,
            SkipReason::SubmissionFailed(_)
        ));
        let orders = client.orders.lock().await;
        let assets: Vec<&str> = orders.iter().map(|o| o.asset.as_str()).collect();
        assert_eq!(assets, vec!["B", "C"]);
        assert_eq!(orders[1].weight, -0.5);
    }

    #[tokio::test]
    async fn tradability_error_skips_asset() {
        let client = Arc::new(RecordingClient {
            unknown: HashSet::from([Asset::from("X")]),
            ..Default::default()
        });
        let driver = RebalanceDriver::new(client.clone());

        let outcome = driver.submit(&[target("X", 1.0)]).await;

        assert!(outcome.submitted.is_empty());
        assert!(matches!(
            outcome.skipped[0].reason,
            SkipReason::TradabilityCheckFailed(_)
        ));
        assert!(client.orders.lock().await.is_empty());
    }

    #[tokio::test]
    async fn empty_targets_submit_nothing() {
        let client = Arc::new(RecordingClient::default());
        let driver = RebalanceDriver::new(client.clone());
        let outcome = driver.submit(&[]).await;
        assert!(outcome.submitted.is_empty());
        assert!(outcome.skipped.is_empty());
    }
}
