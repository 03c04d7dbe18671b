// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators used by the
// screen.  Window-based series are aligned with their input and use `None`
// for positions whose window is not yet populated.

pub mod augmented;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use augmented::{derive, AugmentedBar, AugmentedHistory};
