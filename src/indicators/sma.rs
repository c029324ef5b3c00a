// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// Unweighted rolling mean of the last `window` closes:
//   SMA_t = (close_{t-window+1} + ... + close_t) / window
//
// The output is aligned row-for-row with the input. Rows before the window is
// full have no value (`None`), mirroring a rolling mean with a warm-up gap.
// =============================================================================

/// Compute the rolling mean of `closes` over `window` rows.
///
/// The returned vector always has `closes.len()` elements.
///
/// # Edge cases
/// - `window == 0` => every element is `None`
/// - `closes.len() < window` => every element is `None`
pub fn rolling_mean(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; closes.len()];
    if window == 0 || closes.len() < window {
        return result;
    }

    let divisor = window as f64;
    for (offset, chunk) in closes.windows(window).enumerate() {
        result[offset + window - 1] = Some(chunk.iter().sum::<f64>() / divisor);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_is_aligned_with_input() {
        let closes = [1.0, 2.0, 3.0, 4.0, 5.0];
        let sma = rolling_mean(&closes, 3);
        assert_eq!(sma.len(), closes.len());
        assert_eq!(sma[0], None);
        assert_eq!(sma[1], None);
        assert_eq!(sma[2], Some(2.0));
        assert_eq!(sma[3], Some(3.0));
        assert_eq!(sma[4], Some(4.0));
    }

    #[test]
    fn sma_window_zero_is_all_missing() {
        assert!(rolling_mean(&[1.0, 2.0], 0).iter().all(Option::is_none));
    }

    #[test]
    fn sma_insufficient_data() {
        let sma = rolling_mean(&[1.0, 2.0], 5);
        assert_eq!(sma, vec![None, None]);
    }

    #[test]
    fn sma_window_one_is_identity() {
        let closes = [3.5, 7.25, 1.0];
        let sma = rolling_mean(&closes, 1);
        assert_eq!(sma, vec![Some(3.5), Some(7.25), Some(1.0)]);
    }
}
