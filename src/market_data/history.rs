use anyhow::{bail, Result};

use crate::types::Bar;

/// Validated, time-ordered daily history for one instrument.
///
/// Dates are strictly increasing and every price is finite and non-negative.
/// Once built the history is read-only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    bars: Vec<Bar>,
}

impl History {
    pub fn new(bars: Vec<Bar>) -> Result<Self> {
        for (i, bar) in bars.iter().enumerate() {
            let prices = [bar.open, bar.high, bar.low, bar.close];
            if prices.iter().any(|p| !p.is_finite() || *p < 0.0) {
                bail!("bar {} ({}) has a negative or non-finite price", i, bar.date);
            }
            if i > 0 && bars[i - 1].date >= bar.date {
                bail!(
                    "bar dates must be strictly increasing: {} follows {}",
                    bar.date,
                    bars[i - 1].date
                );
            }
        }
        Ok(Self { bars })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume as f64).collect()
    }
}
