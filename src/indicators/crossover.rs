// =============================================================================
// Dual SMA Crossover ("golden cross")
// =============================================================================
//
// A bullish crossover is declared when, comparing the second-to-last and the
// last row, the short SMA was strictly below the long SMA and is now strictly
// above it. Only the final step counts; an older crossover is not a signal.
// =============================================================================

use super::sma::rolling_mean;

/// True when `a` was below `b` on the previous row and is above it on the
/// last row. Missing values on either row never cross.
pub fn crossed_above(a: &[Option<f64>], b: &[Option<f64>]) -> bool {
    let (n, m) = (a.len(), b.len());
    if n < 2 || m < 2 {
        return false;
    }

    match (a[n - 2], b[m - 2], a[n - 1], b[m - 1]) {
        (Some(a_prev), Some(b_prev), Some(a_last), Some(b_last)) => {
            a_prev < b_prev && a_last > b_last
        }
        _ => false,
    }
}

/// Detect a bullish SMA crossover on the last two rows of `closes`.
///
/// Returns `false` (not an error) when:
/// - there are fewer closes than `long_window`;
/// - either SMA column has no values at all;
/// - the crossover did not happen exactly on the final step.
///
/// `short_window < long_window` is expected but not enforced. The scanner
/// already holds both SMA columns and goes through [`cross_in_columns`].
#[allow(dead_code)]
pub fn detect_cross(closes: &[f64], short_window: usize, long_window: usize) -> bool {
    if closes.len() < long_window {
        return false;
    }

    let short = rolling_mean(closes, short_window);
    let long = rolling_mean(closes, long_window);
    cross_in_columns(closes.len(), long_window, &short, &long)
}

/// Same rule as [`detect_cross`] over SMA columns that were already
/// computed for a series of `rows` bars.
pub fn cross_in_columns(
    rows: usize,
    long_window: usize,
    short: &[Option<f64>],
    long: &[Option<f64>],
) -> bool {
    if rows < long_window {
        return false;
    }
    if short.iter().all(Option::is_none) || long.iter().all(Option::is_none) {
        return false;
    }

    crossed_above(short, long)
}
