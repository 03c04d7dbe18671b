// =============================================================================
// Augmented History — bars plus every indicator the screen needs
// =============================================================================
//
// `derive` runs each indicator once over the full history and zips the
// results back onto the bars.  Every indicator slot is an `Option<f64>`: a
// value that is not yet defined (window not full) stays `None` and is never
// read as zero.
// =============================================================================

use super::macd::calculate_standard_macd;
use super::rsi::calculate_rsi;
use super::sma::calculate_sma;
use crate::market_data::History;
use crate::types::Bar;

pub const SMA_FAST: usize = 50;
pub const SMA_MID: usize = 150;
pub const SMA_SLOW: usize = 200;
pub const VOLUME_SMA: usize = 20;
pub const RSI_PERIOD: usize = 14;

/// One bar together with its derived indicator values.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedBar {
    pub bar: Bar,
    pub sma50: Option<f64>,
    pub sma150: Option<f64>,
    pub sma200: Option<f64>,
    pub vol_sma20: Option<f64>,
    pub macd_line: Option<f64>,
    pub signal_line: Option<f64>,
    pub macd_hist: Option<f64>,
    pub rsi: Option<f64>,
}

#[cfg(test)]
impl AugmentedBar {
    /// A bar with no indicator values at all.
    pub fn bare(bar: Bar) -> Self {
        Self {
            bar,
            sma50: None,
            sma150: None,
            sma200: None,
            vol_sma20: None,
            macd_line: None,
            signal_line: None,
            macd_hist: None,
            rsi: None,
        }
    }
}

/// Immutable, time-ordered sequence of [`AugmentedBar`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AugmentedHistory {
    bars: Vec<AugmentedBar>,
}

impl AugmentedHistory {
    /// The two most recent positions as `(prev, curr)`.
    pub fn last_two(&self) -> Option<(&AugmentedBar, &AugmentedBar)> {
        match self.bars.as_slice() {
            [.., prev, curr] => Some((prev, curr)),
            _ => None,
        }
    }
}

#[cfg(test)]
impl AugmentedHistory {
    pub fn from_bars(bars: Vec<AugmentedBar>) -> Self {
        Self { bars }
    }

    pub fn bars(&self) -> &[AugmentedBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Derive every indicator for `history`.
///
/// Pure and deterministic: the same history always yields the same output.
pub fn derive(history: &History) -> AugmentedHistory {
    let closes = history.closes();
    let volumes = history.volumes();

    let sma50 = calculate_sma(&closes, SMA_FAST);
    let sma150 = calculate_sma(&closes, SMA_MID);
    let sma200 = calculate_sma(&closes, SMA_SLOW);
    let vol_sma20 = calculate_sma(&volumes, VOLUME_SMA);
    let macd = calculate_standard_macd(&closes);
    let rsi = calculate_rsi(&closes, RSI_PERIOD);

    let bars = history
        .bars()
        .iter()
        .enumerate()
        .map(|(i, bar)| AugmentedBar {
            bar: bar.clone(),
            sma50: sma50[i],
            sma150: sma150[i],
            sma200: sma200[i],
            vol_sma20: vol_sma20[i],
            macd_line: macd.line.get(i).copied(),
            signal_line: macd.signal.get(i).copied(),
            macd_hist: macd.histogram.get(i).copied(),
            rsi: rsi[i],
        })
        .collect();

    AugmentedHistory { bars }
}
