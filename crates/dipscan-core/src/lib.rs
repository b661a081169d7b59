//! # Dipscan Core
//!
//! Core contracts and pipeline for the dipscan ETF screening toolkit.
//!
//! The crate screens a watchlist of exchange-traded funds against a market
//! data provider, flags instruments trading below their trailing moving
//! average, and serializes the result as a paired-table CSV report.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider gateway implementations (Yahoo Finance) |
//! | [`domain`] | Qualified symbols and screening records |
//! | [`envelope`] | Response envelope for machine-readable output |
//! | [`error`] | Core error types |
//! | [`export`] | Paired-table CSV report |
//! | [`gateway`] | Market data contract implemented by adapters |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`rank`] | Underperformer ranking |
//! | [`screen`] | The screening pipeline |
//! | [`watchlist`] | Delimited-text symbol input |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use dipscan_core::{rank, ReqwestHttpClient, ScreenConfig, ScreenPipeline, YahooGateway};
//!
//! #[tokio::main]
//! async fn main() {
//!     let gateway = Arc::new(YahooGateway::new(Arc::new(ReqwestHttpClient::new())));
//!     let pipeline = ScreenPipeline::new(gateway, ScreenConfig::default());
//!
//!     let outcome = pipeline.run(&[String::from("NIFTYBEES")]).await;
//!     let worst = rank::rank(outcome.underperformers.clone(), 10);
//!
//!     for record in &worst {
//!         println!("{}: {:.2}%", record.symbol, record.percent_change);
//!     }
//! }
//! ```

pub mod adapters;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod export;
pub mod gateway;
pub mod http_client;
pub mod rank;
pub mod screen;
pub mod watchlist;

// Re-export commonly used types at crate root for convenience

pub use adapters::YahooGateway;

pub use domain::{PriceRecord, Symbol, UnderperformerRecord, MARKET_SUFFIX};

pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};

pub use error::{CoreError, ValidationError};

pub use export::{write_report, ExportError};

pub use gateway::{AverageWindow, FetchError, FetchErrorKind, MarketDataGateway};

pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient};

pub use rank::DEFAULT_TOP_N;

pub use screen::{
    ScreenConfig, ScreenOutcome, ScreenPipeline, SkipReason, SkippedSymbol,
    DEFAULT_VOLUME_THRESHOLD,
};

pub use watchlist::{read_symbols, WatchlistError};
