use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::gateway::{AverageWindow, FetchError, MarketDataGateway};
use crate::http_client::{HttpClient, HttpRequest};
use crate::Symbol;

const CHART_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Yahoo Finance gateway over the v8 chart endpoint.
///
/// The chart endpoint is anonymous; no API key or cookie handshake is
/// required. Every operation issues one GET and maps any transport or
/// payload failure into a [`FetchError`] for the pipeline to branch on.
pub struct YahooGateway {
    http_client: Arc<dyn HttpClient>,
    timeout_ms: u64,
}

impl YahooGateway {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            timeout_ms: 10_000,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    async fn fetch_chart(&self, symbol: &Symbol, query: &str) -> Result<ChartResult, FetchError> {
        let url = format!(
            "{}/{}?{}",
            CHART_BASE_URL,
            urlencoding::encode(symbol.as_str()),
            query
        );
        debug!(%symbol, %url, "requesting yahoo chart");

        let request = HttpRequest::get(url)
            .with_header("referer", "https://finance.yahoo.com/")
            .with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|error| {
            FetchError::transport(format!("yahoo transport error: {}", error.message()))
        })?;

        if !response.is_success() {
            return Err(FetchError::upstream(format!(
                "yahoo returned status {}",
                response.status
            )));
        }

        let parsed: ChartResponse = serde_json::from_str(&response.body).map_err(|error| {
            FetchError::malformed(format!("failed to parse yahoo chart: {error}"))
        })?;

        if let Some(error) = parsed.chart.error {
            return Err(FetchError::upstream(format!(
                "yahoo chart error {}: {}",
                error.code, error.description
            )));
        }

        parsed
            .chart
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::no_data("chart response contained no result"))
    }
}

impl MarketDataGateway for YahooGateway {
    fn latest_volume<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<u64, FetchError>> + Send + 'a>> {
        Box::pin(async move {
            let result = self.fetch_chart(symbol, "range=1d&interval=1d").await?;
            result
                .last_volume()
                .ok_or_else(|| FetchError::no_data(format!("no volume observations for {symbol}")))
        })
    }

    fn current_price<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<f64, FetchError>> + Send + 'a>> {
        Box::pin(async move {
            let result = self.fetch_chart(symbol, "range=1d&interval=1d").await?;
            let close = result
                .last_close()
                .ok_or_else(|| FetchError::no_data(format!("no close observations for {symbol}")))?;
            Ok(round_dp(close, 2))
        })
    }

    fn trailing_average<'a>(
        &'a self,
        symbol: &'a Symbol,
        window: AverageWindow,
    ) -> Pin<Box<dyn Future<Output = Result<f64, FetchError>> + Send + 'a>> {
        Box::pin(async move {
            let window_len = usize::from(window.window_days);
            if window_len == 0 {
                return Err(FetchError::no_data("average window must cover at least one close"));
            }

            let now = OffsetDateTime::now_utc();
            let period1 = (now - Duration::days(i64::from(window.lookback_days))).unix_timestamp();
            let period2 = now.unix_timestamp();
            let query = format!("period1={period1}&period2={period2}&interval=1d");

            let result = self.fetch_chart(symbol, &query).await?;
            let closes = result.closes();
            if closes.len() < window_len {
                return Err(FetchError::insufficient_history(format!(
                    "{} closes available for {symbol}, {} required",
                    closes.len(),
                    window_len
                )));
            }

            let recent = &closes[closes.len() - window_len..];
            let mean = recent.iter().sum::<f64>() / window_len as f64;
            Ok(round_dp(mean, 3))
        })
    }
}

fn round_dp(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

// Yahoo chart API response structures

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartData,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartApiError>,
}

#[derive(Debug, Deserialize)]
struct ChartApiError {
    code: String,
    description: String,
}

#[derive(Debug, Default, Deserialize)]
struct ChartResult {
    #[serde(default)]
    indicators: ChartIndicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

impl ChartResult {
    /// Daily closes in chronological order, gaps dropped.
    fn closes(&self) -> Vec<f64> {
        self.indicators
            .quote
            .first()
            .map(|quote| quote.close.iter().copied().flatten().collect())
            .unwrap_or_default()
    }

    fn last_close(&self) -> Option<f64> {
        self.indicators
            .quote
            .first()
            .and_then(|quote| quote.close.iter().rev().copied().flatten().next())
    }

    fn last_volume(&self) -> Option<u64> {
        self.indicators
            .quote
            .first()
            .and_then(|quote| quote.volume.iter().rev().copied().flatten().next())
    }
}
