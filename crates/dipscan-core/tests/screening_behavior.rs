//! Behavior-driven tests for the screening pipeline.
//!
//! These tests verify HOW the pipeline handles gateway outcomes: the
//! liquidity gate, fetch-failure isolation, ordering guarantees, and the
//! underperformer projection, using a scripted in-memory gateway.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use dipscan_core::gateway::{AverageWindow, FetchError, MarketDataGateway};
use dipscan_core::rank;
use dipscan_core::screen::{ScreenConfig, ScreenPipeline, SkipReason};
use dipscan_core::Symbol;

/// Scripted per-symbol quote data; `None` means the fetch is unavailable.
#[derive(Debug, Clone, Copy, Default)]
struct ScriptedQuote {
    volume: Option<u64>,
    price: Option<f64>,
    average: Option<f64>,
}

#[derive(Debug, Default)]
struct ScriptedGateway {
    quotes: HashMap<String, ScriptedQuote>,
}

impl ScriptedGateway {
    fn insert(&mut self, ticker: &str, volume: Option<u64>, price: Option<f64>, average: Option<f64>) {
        self.quotes.insert(
            Symbol::qualify(ticker).as_str().to_owned(),
            ScriptedQuote {
                volume,
                price,
                average,
            },
        );
    }

    fn quote(&self, symbol: &Symbol) -> ScriptedQuote {
        self.quotes.get(symbol.as_str()).copied().unwrap_or_default()
    }
}

impl MarketDataGateway for ScriptedGateway {
    fn latest_volume<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<u64, FetchError>> + Send + 'a>> {
        let result = self
            .quote(symbol)
            .volume
            .ok_or_else(|| FetchError::no_data(format!("no volume for {symbol}")));
        Box::pin(async move { result })
    }

    fn current_price<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<f64, FetchError>> + Send + 'a>> {
        let result = self
            .quote(symbol)
            .price
            .ok_or_else(|| FetchError::no_data(format!("no price for {symbol}")));
        Box::pin(async move { result })
    }

    fn trailing_average<'a>(
        &'a self,
        symbol: &'a Symbol,
        _window: AverageWindow,
    ) -> Pin<Box<dyn Future<Output = Result<f64, FetchError>> + Send + 'a>> {
        let result = self
            .quote(symbol)
            .average
            .ok_or_else(|| FetchError::insufficient_history(format!("no history for {symbol}")));
        Box::pin(async move { result })
    }
}

fn pipeline(gateway: ScriptedGateway, config: ScreenConfig) -> ScreenPipeline {
    ScreenPipeline::new(Arc::new(gateway), config)
}

fn raw(symbols: &[&str]) -> Vec<String> {
    symbols.iter().map(|s| String::from(*s)).collect()
}

// =============================================================================
// Liquidity gate
// =============================================================================

#[tokio::test]
async fn when_volume_is_at_threshold_symbol_is_excluded() {
    // Given: a symbol trading exactly at the threshold
    let mut gateway = ScriptedGateway::default();
    gateway.insert("FLAT", Some(10_000), Some(100.0), Some(100.0));

    // When: the screen runs with the default threshold
    let outcome = pipeline(gateway, ScreenConfig::default())
        .run(&raw(&["FLAT"]))
        .await;

    // Then: the gate is strictly greater-than, so the symbol is skipped
    assert!(outcome.records.is_empty());
    assert_eq!(outcome.skipped.len(), 1);
    assert!(matches!(
        outcome.skipped[0].reason,
        SkipReason::IlliquidVolume { volume: 10_000 }
    ));
}

#[tokio::test]
async fn when_volume_is_just_above_threshold_symbol_proceeds() {
    let mut gateway = ScriptedGateway::default();
    gateway.insert("LIVE", Some(10_001), Some(100.0), Some(100.0));

    let outcome = pipeline(gateway, ScreenConfig::default())
        .run(&raw(&["LIVE"]))
        .await;

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].symbol.as_str(), "LIVE.NS");
    assert!(outcome.skipped.is_empty());
}

#[tokio::test]
async fn when_volume_is_unavailable_no_further_fetches_matter() {
    let mut gateway = ScriptedGateway::default();
    gateway.insert("DARK", None, Some(100.0), Some(100.0));

    let outcome = pipeline(gateway, ScreenConfig::default())
        .run(&raw(&["DARK"]))
        .await;

    assert!(outcome.records.is_empty());
    assert!(matches!(
        outcome.skipped[0].reason,
        SkipReason::VolumeUnavailable { .. }
    ));
}

// =============================================================================
// Fetch-failure isolation
// =============================================================================

#[tokio::test]
async fn when_average_fetch_fails_symbol_is_absent_entirely() {
    // Given: three symbols where only B's average fetch fails
    let mut gateway = ScriptedGateway::default();
    gateway.insert("A", Some(50_000), Some(100.0), Some(98.0));
    gateway.insert("B", Some(50_000), Some(100.0), None);
    gateway.insert("C", Some(50_000), Some(100.0), Some(102.0));

    // When: the screen runs
    let outcome = pipeline(gateway, ScreenConfig::default())
        .run(&raw(&["A", "B", "C"]))
        .await;

    // Then: the full dataset contains exactly A and C, never a partial B
    let symbols: Vec<&str> = outcome.records.iter().map(|r| r.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["A.NS", "C.NS"]);
    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(outcome.skipped[0].symbol.as_str(), "B.NS");
    assert!(matches!(
        outcome.skipped[0].reason,
        SkipReason::AverageUnavailable { .. }
    ));
}

#[tokio::test]
async fn when_price_fetch_fails_symbol_is_skipped_with_reason() {
    let mut gateway = ScriptedGateway::default();
    gateway.insert("NOPX", Some(50_000), None, Some(100.0));

    let outcome = pipeline(gateway, ScreenConfig::default())
        .run(&raw(&["NOPX"]))
        .await;

    assert!(outcome.records.is_empty());
    assert!(matches!(
        outcome.skipped[0].reason,
        SkipReason::PriceUnavailable { .. }
    ));
}

// =============================================================================
// Ordering and projection
// =============================================================================

#[tokio::test]
async fn when_all_symbols_pass_full_dataset_preserves_input_order() {
    // Given: three passing symbols with deliberately shuffled deviations
    let mut gateway = ScriptedGateway::default();
    gateway.insert("A", Some(50_000), Some(105.0), Some(100.0));
    gateway.insert("B", Some(50_000), Some(80.0), Some(100.0));
    gateway.insert("C", Some(50_000), Some(99.0), Some(100.0));

    // When: the screen runs
    let outcome = pipeline(gateway, ScreenConfig::default())
        .run(&raw(&["A", "B", "C"]))
        .await;

    // Then: the full dataset is in input order, not deviation order
    let symbols: Vec<&str> = outcome.records.iter().map(|r| r.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["A.NS", "B.NS", "C.NS"]);
}

#[tokio::test]
async fn when_percent_changes_are_mixed_underperformers_are_filtered_and_ranked() {
    // Given: five symbols with percent changes [5, -3, -10, -1, 0]
    let mut gateway = ScriptedGateway::default();
    gateway.insert("UP", Some(50_000), Some(105.0), Some(100.0));
    gateway.insert("DOWN3", Some(50_000), Some(97.0), Some(100.0));
    gateway.insert("DOWN10", Some(50_000), Some(90.0), Some(100.0));
    gateway.insert("DOWN1", Some(50_000), Some(99.0), Some(100.0));
    gateway.insert("FLAT", Some(50_000), Some(100.0), Some(100.0));

    // When: the screen runs and the candidates are ranked
    let outcome = pipeline(gateway, ScreenConfig::default())
        .run(&raw(&["UP", "DOWN3", "DOWN10", "DOWN1", "FLAT"]))
        .await;
    let ranked = rank::rank(outcome.underperformers.clone(), rank::DEFAULT_TOP_N);

    // Then: exactly the three negative entries survive, most negative first
    let changes: Vec<f64> = ranked.iter().map(|r| r.percent_change).collect();
    assert_eq!(changes, vec![-10.0, -3.0, -1.0]);
}

#[tokio::test]
async fn when_fifteen_underperformers_qualify_ranked_output_keeps_ten() {
    // Given: fifteen symbols, each one percent worse than the last
    let mut gateway = ScriptedGateway::default();
    let mut tickers = Vec::new();
    for i in 1..=15u32 {
        let ticker = format!("ETF{i}");
        gateway.insert(&ticker, Some(50_000), Some(100.0 - f64::from(i)), Some(100.0));
        tickers.push(ticker);
    }

    // When: the screen runs and the candidates are ranked
    let outcome = pipeline(gateway, ScreenConfig::default())
        .run(&tickers)
        .await;
    let ranked = rank::rank(outcome.underperformers.clone(), rank::DEFAULT_TOP_N);

    // Then: the ten most negative deviations survive, ascending
    assert_eq!(ranked.len(), 10);
    let changes: Vec<f64> = ranked.iter().map(|r| r.percent_change).collect();
    let expected: Vec<f64> = (6..=15).rev().map(|i| -f64::from(i)).collect();
    assert_eq!(changes, expected);
}

#[tokio::test]
async fn when_average_is_zero_record_is_not_an_underperformer() {
    // Given: a symbol with a zero trailing average
    let mut gateway = ScriptedGateway::default();
    gateway.insert("ZERO", Some(50_000), Some(5.0), Some(0.0));

    // When: the screen runs
    let outcome = pipeline(gateway, ScreenConfig::default())
        .run(&raw(&["ZERO"]))
        .await;

    // Then: the record carries change 5 and percent change 0, and is not
    // classified as underperforming
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].change, 5.0);
    assert_eq!(outcome.records[0].percent_change, 0.0);
    assert!(outcome.underperformers.is_empty());
}

// =============================================================================
// Bounded concurrency
// =============================================================================

#[tokio::test]
async fn when_concurrency_is_bounded_ordering_matches_sequential_run() {
    fn build_gateway() -> ScriptedGateway {
        let mut gateway = ScriptedGateway::default();
        for i in 1..=12u32 {
            let price = if i % 3 == 0 { None } else { Some(100.0 + f64::from(i)) };
            gateway.insert(&format!("ETF{i}"), Some(20_000 + u64::from(i)), price, Some(100.0));
        }
        gateway
    }

    let tickers: Vec<String> = (1..=12u32).map(|i| format!("ETF{i}")).collect();

    let sequential = pipeline(build_gateway(), ScreenConfig::default())
        .run(&tickers)
        .await;
    let bounded = pipeline(
        build_gateway(),
        ScreenConfig {
            concurrency: 4,
            ..ScreenConfig::default()
        },
    )
    .run(&tickers)
    .await;

    assert_eq!(sequential.records, bounded.records);
    assert_eq!(sequential.underperformers, bounded.underperformers);
}
