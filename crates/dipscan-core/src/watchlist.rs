//! Delimited-text watchlist input.
//!
//! The watchlist is a CSV export from the exchange: first row is a header,
//! one column (matched case-insensitively as `SYMBOL`) carries the raw
//! ticker symbols, and every other column is ignored. A missing symbol
//! column or an unreadable file is fatal to the run before any fetch is
//! issued.

use std::fs::File;
use std::path::Path;

use thiserror::Error;

const SYMBOL_COLUMN: &str = "SYMBOL";

/// Fatal watchlist input errors.
#[derive(Debug, Error)]
pub enum WatchlistError {
    #[error("watchlist '{path}' has no SYMBOL column")]
    MissingSymbolColumn { path: String },

    #[error("failed to read watchlist '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("failed to open watchlist '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Read raw ticker symbols from a delimited watchlist file.
///
/// Blank cells and surrounding whitespace are dropped; symbol order is
/// preserved as read.
pub fn read_symbols(path: impl AsRef<Path>) -> Result<Vec<String>, WatchlistError> {
    let path = path.as_ref();
    let display = path.display().to_string();

    let file = File::open(path).map_err(|source| WatchlistError::Open {
        path: display.clone(),
        source,
    })?;

    // Exchange dumps are frequently ragged; tolerate uneven row widths.
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);

    let headers = reader.headers().map_err(|source| WatchlistError::Read {
        path: display.clone(),
        source,
    })?;
    let column = headers
        .iter()
        .position(|name| name.trim().eq_ignore_ascii_case(SYMBOL_COLUMN))
        .ok_or_else(|| WatchlistError::MissingSymbolColumn {
            path: display.clone(),
        })?;

    let mut symbols = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| WatchlistError::Read {
            path: display.clone(),
            source,
        })?;

        if let Some(value) = record.get(column) {
            let value = value.trim();
            if !value.is_empty() {
                symbols.push(value.to_owned());
            }
        }
    }

    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn watchlist_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write fixture");
        file
    }

    #[test]
    fn reads_symbol_column_in_order() {
        let file = watchlist_file("SYMBOL,SERIES,LTP\nNIFTYBEES,EQ,250\nGOLDBEES,EQ,60\n");

        let symbols = read_symbols(file.path()).expect("must read");
        assert_eq!(symbols, vec!["NIFTYBEES", "GOLDBEES"]);
    }

    #[test]
    fn locates_symbol_column_regardless_of_position_and_case() {
        let file = watchlist_file("series,symbol\nEQ,NIFTYBEES\n");

        let symbols = read_symbols(file.path()).expect("must read");
        assert_eq!(symbols, vec!["NIFTYBEES"]);
    }

    #[test]
    fn skips_blank_cells() {
        let file = watchlist_file("SYMBOL\nNIFTYBEES\n\nGOLDBEES\n");

        let symbols = read_symbols(file.path()).expect("must read");
        assert_eq!(symbols, vec!["NIFTYBEES", "GOLDBEES"]);
    }

    #[test]
    fn missing_symbol_column_is_fatal() {
        let file = watchlist_file("TICKER,SERIES\nNIFTYBEES,EQ\n");

        let error = read_symbols(file.path()).expect_err("must fail");
        assert!(matches!(error, WatchlistError::MissingSymbolColumn { .. }));
    }

    #[test]
    fn unreadable_file_is_fatal() {
        let error = read_symbols("/nonexistent/watchlist.csv").expect_err("must fail");
        assert!(matches!(error, WatchlistError::Open { .. }));
    }
}
