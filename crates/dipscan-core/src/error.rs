use thiserror::Error;

/// Validation errors exposed by `dipscan-core` domain constructors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Watchlist(#[from] crate::watchlist::WatchlistError),

    #[error(transparent)]
    Export(#[from] crate::export::ExportError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
