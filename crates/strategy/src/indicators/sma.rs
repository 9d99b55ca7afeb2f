/// Simple moving average over a fixed trailing window.
///
/// Returns `None` until at least `period` close values are available.
#[derive(Debug, Clone)]
pub struct SmaIndicator {
    pub period: usize,
}

impl SmaIndicator {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self { period }
    }

    /// Arithmetic mean of the last `period` closes (slice is oldest first).
    /// Values before the window never affect the result.
    pub fn compute(&self, closes: &[f64]) -> Option<f64> {
        if closes.len() < self.period {
            return None;
        }
        let window = &closes[closes.len() - self.period..];
        Some(window.iter().sum::<f64>() / self.period as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_returns_none_when_insufficient_data() {
        let sma = SmaIndicator::new(10);
        assert!(sma.compute(&[1.0; 9]).is_none());
    }

    #[test]
    fn sma_uses_only_trailing_window() {
        let sma = SmaIndicator::new(3);
        // 100.0 sits outside the window
        let value = sma.compute(&[100.0, 1.0, 2.0, 3.0]).unwrap();
        assert!((value - 2.0).abs() < 1e-12, "Expected 2.0, got {value}");
    }

    #[test]
    fn sma_includes_latest_close() {
        let sma = SmaIndicator::new(10);
        let mut closes = vec![1.0; 10];
        closes.push(11.0);
        let value = sma.compute(&closes).unwrap();
        assert!((value - 2.0).abs() < 1e-12, "Expected 2.0, got {value}");
    }

    #[test]
    #[should_panic(expected = "SMA period must be >= 1")]
    fn sma_rejects_zero_period() {
        SmaIndicator::new(0);
    }
}
