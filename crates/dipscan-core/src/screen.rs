//! The screening pipeline.
//!
//! Per symbol the pipeline runs a small state machine: qualify the ticker,
//! gate on traded volume, fetch the current price and the trailing average,
//! then emit a [`PriceRecord`] (and, for negative deviation, an
//! [`UnderperformerRecord`] candidate). A symbol either resolves fully or
//! is excluded with a recorded reason; partial records are never emitted
//! and a failed fetch never aborts the run.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::gateway::{AverageWindow, MarketDataGateway};
use crate::{PriceRecord, Symbol, UnderperformerRecord};

/// Liquidity gate: symbols must trade strictly more than this many shares.
pub const DEFAULT_VOLUME_THRESHOLD: u64 = 10_000;

/// Tunables for one screening run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScreenConfig {
    /// Volume at or below this value excludes the symbol before any
    /// further fetches are issued.
    pub volume_threshold: u64,
    pub window: AverageWindow,
    /// Upper bound on symbols screened concurrently; 1 keeps the run
    /// strictly sequential.
    pub concurrency: usize,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            volume_threshold: DEFAULT_VOLUME_THRESHOLD,
            window: AverageWindow::default(),
            concurrency: 1,
        }
    }
}

/// Why a symbol was excluded from the run's output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// Volume was present but at or below the threshold.
    IlliquidVolume { volume: u64 },
    VolumeUnavailable { detail: String },
    PriceUnavailable { detail: String },
    AverageUnavailable { detail: String },
    /// Provider returned values the record constructor rejected.
    InvalidQuote { detail: String },
}

/// One excluded symbol with its exclusion reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedSymbol {
    pub symbol: Symbol,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Result collections of one pipeline invocation.
///
/// Both collections are freshly built per run and returned to the caller;
/// nothing is held in shared state between runs or surfaces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenOutcome {
    /// Every fully resolved symbol, in watchlist input order.
    pub records: Vec<PriceRecord>,
    /// Unranked underperformer candidates, in emission (input) order.
    pub underperformers: Vec<UnderperformerRecord>,
    /// Excluded symbols with reasons, for diagnostics.
    pub skipped: Vec<SkippedSymbol>,
}

enum SymbolOutcome {
    Included(PriceRecord),
    Skipped(SkippedSymbol),
}

impl SymbolOutcome {
    fn skipped(symbol: Symbol, reason: SkipReason) -> Self {
        Self::Skipped(SkippedSymbol { symbol, reason })
    }
}

/// Screening pipeline over a market data gateway.
pub struct ScreenPipeline {
    gateway: Arc<dyn MarketDataGateway>,
    config: ScreenConfig,
}

impl ScreenPipeline {
    pub fn new(gateway: Arc<dyn MarketDataGateway>, config: ScreenConfig) -> Self {
        Self { gateway, config }
    }

    /// Run the screen over raw watchlist symbols.
    ///
    /// The full dataset preserves input order regardless of the concurrency
    /// bound, and each symbol is atomic: either all three fetches succeed
    /// and one record is emitted, or the symbol is excluded entirely.
    pub async fn run(&self, raw_symbols: &[String]) -> ScreenOutcome {
        let outcomes = if self.config.concurrency <= 1 {
            self.run_sequential(raw_symbols).await
        } else {
            self.run_bounded(raw_symbols).await
        };

        let mut records = Vec::new();
        let mut underperformers = Vec::new();
        let mut skipped = Vec::new();

        for outcome in outcomes {
            match outcome {
                SymbolOutcome::Included(record) => {
                    if let Some(under) = record.underperformer() {
                        underperformers.push(under);
                    }
                    records.push(record);
                }
                SymbolOutcome::Skipped(skip) => {
                    warn!(
                        symbol = %skip.symbol,
                        reason = ?skip.reason,
                        "symbol excluded from screen"
                    );
                    skipped.push(skip);
                }
            }
        }

        info!(
            screened = raw_symbols.len(),
            included = records.len(),
            underperforming = underperformers.len(),
            skipped = skipped.len(),
            "screen run completed"
        );

        ScreenOutcome {
            records,
            underperformers,
            skipped,
        }
    }

    async fn run_sequential(&self, raw_symbols: &[String]) -> Vec<SymbolOutcome> {
        let mut outcomes = Vec::with_capacity(raw_symbols.len());
        for raw in raw_symbols {
            outcomes.push(screen_one(self.gateway.as_ref(), &self.config, raw).await);
        }
        outcomes
    }

    /// Fan out per-symbol fetch chains under a semaphore bound, then stitch
    /// the outcomes back by original index so the output ordering is
    /// indistinguishable from the sequential run.
    async fn run_bounded(&self, raw_symbols: &[String]) -> Vec<SymbolOutcome> {
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency));
        let mut tasks: JoinSet<(usize, SymbolOutcome)> = JoinSet::new();

        for (index, raw) in raw_symbols.iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let gateway = Arc::clone(&self.gateway);
            let config = self.config;
            let raw = raw.clone();

            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("screen semaphore is never closed");
                let outcome = screen_one(gateway.as_ref(), &config, &raw).await;
                (index, outcome)
            });
        }

        let mut outcomes: Vec<Option<SymbolOutcome>> =
            (0..raw_symbols.len()).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => outcomes[index] = Some(outcome),
                Err(error) => warn!(%error, "screen task failed to join"),
            }
        }

        outcomes.into_iter().flatten().collect()
    }
}

async fn screen_one(
    gateway: &dyn MarketDataGateway,
    config: &ScreenConfig,
    raw: &str,
) -> SymbolOutcome {
    let symbol = Symbol::qualify(raw);

    let volume = match gateway.latest_volume(&symbol).await {
        Ok(volume) => volume,
        Err(error) => {
            return SymbolOutcome::skipped(
                symbol,
                SkipReason::VolumeUnavailable {
                    detail: error.to_string(),
                },
            );
        }
    };

    if volume <= config.volume_threshold {
        debug!(
            %symbol,
            volume,
            threshold = config.volume_threshold,
            "below liquidity threshold"
        );
        return SymbolOutcome::skipped(symbol, SkipReason::IlliquidVolume { volume });
    }

    let price = match gateway.current_price(&symbol).await {
        Ok(price) => price,
        Err(error) => {
            return SymbolOutcome::skipped(
                symbol,
                SkipReason::PriceUnavailable {
                    detail: error.to_string(),
                },
            );
        }
    };

    let average = match gateway.trailing_average(&symbol, config.window).await {
        Ok(average) => average,
        Err(error) => {
            return SymbolOutcome::skipped(
                symbol,
                SkipReason::AverageUnavailable {
                    detail: error.to_string(),
                },
            );
        }
    };

    match PriceRecord::new(symbol.clone(), price, average) {
        Ok(record) => SymbolOutcome::Included(record),
        Err(error) => SymbolOutcome::skipped(
            symbol,
            SkipReason::InvalidQuote {
                detail: error.to_string(),
            },
        ),
    }
}
