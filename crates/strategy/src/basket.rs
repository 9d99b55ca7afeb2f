use common::{Basket, SignalRow};

/// Split signal rows into long and short baskets.
///
/// Every row lands in exactly one basket; the result does not depend on row order.
pub fn partition(rows: &[SignalRow]) -> Basket {
    let mut basket = Basket::default();
    for row in rows {
        if row.signal {
            basket.longs.insert(row.asset.clone());
        } else {
            basket.shorts.insert(row.asset.clone());
        }
    }
    basket
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Asset;

    fn row(asset: &str, signal: bool) -> SignalRow {
        SignalRow {
            asset: asset.into(),
            close: 1.0,
            reference: 1.0,
            signal,
        }
    }

    #[test]
    fn rows_split_by_signal() {
        let basket = partition(&[row("A", true), row("B", false), row("C", true)]);
        assert_eq!(
            basket.longs.iter().collect::<Vec<_>>(),
            vec![&Asset::from("A"), &Asset::from("C")]
        );
        assert_eq!(basket.shorts.iter().collect::<Vec<_>>(), vec![&Asset::from("B")]);
    }

    #[test]
    fn empty_rows_give_empty_basket() {
        let basket = partition(&[]);
        assert!(basket.is_empty());
        assert_eq!(basket.len(), 0);
    }

    #[test]
    fn order_does_not_matter() {
        let forward = partition(&[row("A", true), row("B", false)]);
        let backward = partition(&[row("B", false), row("A", true)]);
        assert_eq!(forward, backward);
    }
}
