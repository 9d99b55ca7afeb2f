use std::collections::BTreeSet;

use tracing::{debug, info};

use common::{Asset, Basket, LeverageBudget, TargetWeight};

/// Per-asset weight for one side of the book, or `None` if the side is empty.
///
/// An empty basket is a normal day, not a fault: no weight is produced for it.
pub fn side_weight(leverage: f64, members: usize) -> Option<f64> {
    if members == 0 {
        return None;
    }
    Some(leverage / members as f64)
}

/// Convert basket membership into target weights.
///
/// Each long gets `long_leverage / |longs|` and each short gets
/// `short_leverage / |shorts|`. Longs come first, each side in asset order.
pub fn allocate(basket: &Basket, budget: &LeverageBudget) -> Vec<TargetWeight> {
    let mut targets = Vec::with_capacity(basket.len());
    push_side(&mut targets, &basket.longs, budget.long_leverage, "long");
    push_side(&mut targets, &basket.shorts, budget.short_leverage, "short");

    info!(
        longs = basket.longs.len(),
        shorts = basket.shorts.len(),
        targets = targets.len(),
        "Target weights computed"
    );
    targets
}

fn push_side(targets: &mut Vec<TargetWeight>, members: &BTreeSet<Asset>, leverage: f64, side: &str) {
    match side_weight(leverage, members.len()) {
        Some(weight) => {
            targets.extend(members.iter().map(|asset| TargetWeight {
                asset: asset.clone(),
                weight,
            }));
        }
        None => debug!(side, "Empty basket, no weights produced"),
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
