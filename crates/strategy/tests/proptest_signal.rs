use proptest::prelude::*;
use std::collections::BTreeSet;

use common::{Asset, SignalRow};
use strategy::{partition, SignalComputer};

proptest! {
    /// The reference is the mean of exactly the last W closes; anything
    /// earlier in the history must not move it.
    #[test]
    fn reference_ignores_prices_outside_window(
        window in 1usize..30,
        prefix in prop::collection::vec(0.01f64..10_000.0, 0..20),
        replacement in prop::collection::vec(0.01f64..10_000.0, 0..20),
        tail in prop::collection::vec(0.01f64..10_000.0, 30),
    ) {
        let tail = &tail[..window];
        let computer = SignalComputer::new(window, 1.0);
        let asset = Asset::from("TEST");

        let mut a = prefix.clone();
        a.extend_from_slice(tail);
        let mut b = replacement.clone();
        b.extend_from_slice(tail);

        let row_a = computer.evaluate(&asset, &a).unwrap();
        let row_b = computer.evaluate(&asset, &b).unwrap();

        let mean = tail.iter().sum::<f64>() / window as f64;
        prop_assert!((row_a.reference - mean).abs() <= 1e-9 * mean.max(1.0));
        prop_assert_eq!(row_a.reference, row_b.reference);
        prop_assert_eq!(row_a.signal, row_b.signal);
    }

    /// A close sitting exactly on a flat reference is never long.
    #[test]
    fn flat_history_is_never_long(window in 1usize..30, price in 1u32..100_000) {
        // Whole-number prices keep the mean exact
        let computer = SignalComputer::new(window, 1.0);
        let closes = vec![price as f64; window];
        let row = computer.evaluate(&Asset::from("FLAT"), &closes).unwrap();
        prop_assert!(!row.signal);
    }

    /// Partitioning is a total, disjoint split of the input assets.
    #[test]
    fn partition_is_total_and_disjoint(signals in prop::collection::btree_map("[A-Z]{1,4}", any::<bool>(), 0..50)) {
        let rows: Vec<SignalRow> = signals
            .iter()
            .map(|(asset, &signal)| SignalRow {
                asset: Asset::from(asset.as_str()),
                close: 1.0,
                reference: 1.0,
                signal,
            })
            .collect();

        let basket = partition(&rows);
        let all: BTreeSet<Asset> = rows.iter().map(|r| r.asset.clone()).collect();

        prop_assert!(basket.longs.is_disjoint(&basket.shorts));
        let union: BTreeSet<Asset> = basket.longs.union(&basket.shorts).cloned().collect();
        prop_assert_eq!(union, all);
        for row in &rows {
            prop_assert_eq!(basket.longs.contains(&row.asset), row.signal);
        }
    }
}
