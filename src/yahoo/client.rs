// =============================================================================
// Yahoo Finance Chart Client — daily OHLCV history
// =============================================================================
//
// Public endpoint, no authentication:
//   GET {base_url}/v8/finance/chart/{symbol}?range=1y&interval=1d
//
// The payload is column-oriented: one `timestamp` array plus parallel
// open/high/low/close/volume arrays under `indicators.quote[0]`.  Any of
// those cells may be `null` (halted or not-yet-settled sessions); such rows
// are skipped.  Yahoo sometimes repeats the current session as an extra row
// with the same trading date, in which case the later row wins.
// =============================================================================

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::market_data::{History, HistorySource};
use crate::types::Bar;

/// Yahoo rejects requests without a browser-like user agent.
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Per-request HTTP timeout.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Yahoo Finance chart API client.
#[derive(Clone)]
pub struct YahooClient {
    base_url: String,
    client: reqwest::Client,
}

impl YahooClient {
    /// Create a new client against `base_url`
    /// (normally `https://query1.finance.yahoo.com`).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build reqwest client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(base_url = %base_url, "YahooClient initialised");

        Ok(Self { base_url, client })
    }

    /// GET /v8/finance/chart/{symbol} with daily interval.
    #[instrument(skip(self), name = "yahoo::get_daily_bars")]
    pub async fn get_daily_bars(&self, symbol: &str, range: &str) -> Result<History> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);

        let resp = self
            .client
            .get(&url)
            .query(&[("range", range), ("interval", "1d")])
            .send()
            .await
            .with_context(|| format!("GET chart for {symbol} request failed"))?;

        let status = resp.status();
        let body: Value = resp
            .json()
            .await
            .with_context(|| format!("failed to parse chart response for {symbol}"))?;

        if !status.is_success() {
            bail!("Yahoo chart for {} returned {}: {}", symbol, status, body);
        }

        let history = parse_chart(&body)?;
        debug!(symbol, range, count = history.len(), "daily bars fetched");
        Ok(history)
    }
}

#[async_trait]
impl HistorySource for YahooClient {
    async fn fetch_daily_bars(&self, symbol: &str, range: &str) -> Result<History> {
        self.get_daily_bars(symbol, range).await
    }
}

impl std::fmt::Debug for YahooClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Decode a chart API payload into a validated [`History`].
///
/// A missing `result` or `timestamp` array means Yahoo has no data for the
/// symbol and yields an empty history.  A non-null `chart.error` is an error.
pub fn parse_chart(body: &Value) -> Result<History> {
    let chart = body.get("chart").context("response missing 'chart' object")?;

    if let Some(err) = chart.get("error").filter(|e| !e.is_null()) {
        bail!("Yahoo chart error: {err}");
    }

    let Some(result) = chart["result"].as_array().and_then(|arr| arr.first()) else {
        return Ok(History::empty());
    };
    let Some(timestamps) = result["timestamp"].as_array() else {
        return Ok(History::empty());
    };

    let gmt_offset = result["meta"]["gmtoffset"].as_i64().unwrap_or(0);
    let quote = result["indicators"]["quote"]
        .as_array()
        .and_then(|arr| arr.first())
        .context("chart result missing 'indicators.quote'")?;

    let opens = quote_column(quote, "open")?;
    let highs = quote_column(quote, "high")?;
    let lows = quote_column(quote, "low")?;
    let closes = quote_column(quote, "close")?;
    let volumes = quote_column(quote, "volume")?;

    let cell = |col: &[Value], i: usize| col.get(i).and_then(Value::as_f64);

    let mut bars: Vec<Bar> = Vec::with_capacity(timestamps.len());
    let mut skipped = 0usize;

    for (i, ts) in timestamps.iter().enumerate() {
        let ts = ts
            .as_i64()
            .with_context(|| format!("timestamp[{i}] is not an integer"))?;

        let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = (
            cell(opens, i),
            cell(highs, i),
            cell(lows, i),
            cell(closes, i),
            cell(volumes, i),
        ) else {
            skipped += 1;
            continue;
        };
        if volume < 0.0 || !volume.is_finite() {
            skipped += 1;
            continue;
        }

        let date = DateTime::from_timestamp(ts + gmt_offset, 0)
            .with_context(|| format!("timestamp {ts} out of range"))?
            .date_naive();
        let bar = Bar::new(date, open, high, low, close, volume.round() as u64);

        match bars.last_mut() {
            Some(last) if last.date == date => *last = bar,
            _ => bars.push(bar),
        }
    }

    if skipped > 0 {
        debug!(skipped, "chart rows with missing values skipped");
    }

    History::new(bars)
}

fn quote_column<'a>(quote: &'a Value, name: &str) -> Result<&'a Vec<Value>> {
    quote[name]
        .as_array()
        .with_context(|| format!("chart quote missing '{name}' column"))
}
