// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators the scanner uses.
// Every function takes a close-price slice and returns freshly allocated
// columns aligned row-for-row with it; the raw series is never touched.

pub mod crossover;
pub mod ema;
pub mod macd;
pub mod sma;

pub use crossover::cross_in_columns;
pub use macd::{compute_macd, MacdColumns};
pub use sma::rolling_mean;
