use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Watchlist(#[from] dipscan_core::WatchlistError),

    #[error(transparent)]
    Export(#[from] dipscan_core::ExportError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Watchlist(_) => 2,
            Self::Export(_) | Self::Serialization(_) | Self::Io(_) => 10,
        }
    }
}
