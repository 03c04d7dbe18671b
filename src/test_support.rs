// Fixtures shared by the unit tests: synthetic histories and an in-memory
// `HistorySource`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDate};

use crate::market_data::{History, HistorySource};
use crate::types::Bar;

pub const BASE_VOLUME: u64 = 900_000;

fn day(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + ChronoDuration::days(i as i64)
}

fn build(closes: &[f64], volumes: &[u64]) -> History {
    let bars = closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&c, &v))| Bar::new(day(i), c, c + 1.0, c - 1.0, c, v))
        .collect();
    History::new(bars).unwrap()
}

/// Rising closes (+0.5 per day) with a 1.2 pullback every third day and a
/// +1.5 jump on the final bar.  Volume is flat at [`BASE_VOLUME`] except for
/// the final bar.
///
/// With 220 bars the final bar has RSI ≈ 77.42 and a fresh MACD histogram
/// crossover.  A final volume of 1_900_000 is exactly 2x the 20-day average
/// (which includes the final bar).
pub fn bullish_history(n: usize, last_volume: u64) -> History {
    let mut closes: Vec<f64> = (0..n)
        .map(|i| {
            let base = 100.0 + 0.5 * i as f64;
            if i % 3 == 2 {
                base - 1.2
            } else {
                base
            }
        })
        .collect();
    if let Some(last) = closes.last_mut() {
        *last += 1.5;
    }
    let mut volumes = vec![BASE_VOLUME; n];
    if let Some(last) = volumes.last_mut() {
        *last = last_volume;
    }
    build(&closes, &volumes)
}

/// Constant closes of 100.0; the final bar carries double volume.
pub fn flat_history(n: usize) -> History {
    let closes = vec![100.0; n];
    let mut volumes = vec![1_000_000; n];
    if let Some(last) = volumes.last_mut() {
        *last = 2_000_000;
    }
    build(&closes, &volumes)
}

/// Scripted behaviour for one symbol of [`StaticSource`].
#[derive(Clone)]
pub enum Script {
    Bars(History),
    /// Answer with the history only after the given delay.
    Slow(History, Duration),
    Fail(&'static str),
    Stall(Duration),
    Panic,
}

/// In-memory history source.  Unknown symbols return an empty history.
#[derive(Default)]
pub struct StaticSource {
    scripts: HashMap<String, Script>,
    delay: Duration,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub calls: AtomicUsize,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, symbol: &str, script: Script) -> Self {
        self.scripts.insert(symbol.to_string(), script);
        self
    }

    /// Every fetch sleeps for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl HistorySource for StaticSource {
    async fn fetch_daily_bars(&self, symbol: &str, _range: &str) -> Result<History> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let outcome = match self.scripts.get(symbol).cloned() {
            Some(Script::Bars(h)) => Ok(h),
            Some(Script::Slow(h, d)) => {
                tokio::time::sleep(d).await;
                Ok(h)
            }
            Some(Script::Fail(msg)) => Err(anyhow!("{msg}")),
            Some(Script::Stall(d)) => {
                tokio::time::sleep(d).await;
                Ok(History::empty())
            }
            Some(Script::Panic) => {
                self.in_flight.fetch_sub(1, Ordering::SeqCst);
                panic!("scripted panic for {symbol}");
            }
            None => Ok(History::empty()),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }
}
