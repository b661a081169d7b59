//! Market data gateway contract and outcome types.
//!
//! The screening pipeline talks to its data provider exclusively through
//! [`MarketDataGateway`]. Each operation is independently fallible and
//! returns an explicit [`FetchError`] carrying the reason the value is
//! unavailable; implementations never panic on provider garbage, and the
//! pipeline treats every error as a skip for the affected symbol rather
//! than aborting the run.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::Symbol;

/// Trailing-average window parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AverageWindow {
    /// Number of most recent daily closes averaged.
    pub window_days: u16,
    /// History span (in days) the closes are drawn from.
    pub lookback_days: u16,
}

impl AverageWindow {
    pub const fn new(window_days: u16, lookback_days: u16) -> Self {
        Self {
            window_days,
            lookback_days,
        }
    }
}

impl Default for AverageWindow {
    fn default() -> Self {
        Self::new(20, 60)
    }
}

/// Gateway-level fetch failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Transport-level failure: timeout, connection refused, TLS error.
    Transport,
    /// Provider answered with a non-success status or an error payload.
    Upstream,
    /// Provider answered but the payload did not parse.
    Malformed,
    /// Provider answered but carried no observation for the symbol.
    NoData,
    /// Fewer closes than the average window requires.
    InsufficientHistory,
}

/// Structured fetch error returned by gateway operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    kind: FetchErrorKind,
    message: String,
}

impl FetchError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Transport,
            message: message.into(),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Upstream,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Malformed,
            message: message.into(),
        }
    }

    pub fn no_data(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::NoData,
            message: message.into(),
        }
    }

    pub fn insufficient_history(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::InsufficientHistory,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> FetchErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            FetchErrorKind::Transport => "fetch.transport",
            FetchErrorKind::Upstream => "fetch.upstream",
            FetchErrorKind::Malformed => "fetch.malformed",
            FetchErrorKind::NoData => "fetch.no_data",
            FetchErrorKind::InsufficientHistory => "fetch.insufficient_history",
        }
    }
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for FetchError {}

/// Read-only market data contract consumed by the screening pipeline.
///
/// # Required Methods
///
/// | Method | Description |
/// |--------|-------------|
/// | [`latest_volume`](MarketDataGateway::latest_volume) | Most recent traded volume |
/// | [`current_price`](MarketDataGateway::current_price) | Latest close, 2-dp rounded |
/// | [`trailing_average`](MarketDataGateway::trailing_average) | Windowed mean close, 3-dp rounded |
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the pipeline may share one
/// gateway across concurrently screened symbols.
pub trait MarketDataGateway: Send + Sync {
    /// Most recent traded volume for the symbol. Used as the liquidity
    /// pre-filter before the more expensive price and average fetches.
    fn latest_volume<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<u64, FetchError>> + Send + 'a>>;

    /// Latest close price, rounded to 2 decimal places.
    fn current_price<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<f64, FetchError>> + Send + 'a>>;

    /// Mean of the most recent `window.window_days` daily closes drawn from
    /// a `window.lookback_days` history, rounded to 3 decimal places.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] with kind
    /// [`InsufficientHistory`](FetchErrorKind::InsufficientHistory) when the
    /// history window holds fewer closes than `window.window_days`.
    fn trailing_average<'a>(
        &'a self,
        symbol: &'a Symbol,
        window: AverageWindow,
    ) -> Pin<Box<dyn Future<Output = Result<f64, FetchError>> + Send + 'a>>;
}
