//! Paired-table CSV report.
//!
//! The report lays the full dataset and the ranked underperformers side by
//! side in one document: five columns for the full record, two spacer
//! columns, three columns for the ranked record. The full dataset drives
//! the row count; once the ranked list is exhausted the trailing columns
//! stay blank.

use thiserror::Error;

use crate::{PriceRecord, UnderperformerRecord};

const SPACER_COLUMNS: usize = 2;

/// Report serialization failures.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write report row: {0}")]
    Write(#[from] csv::Error),

    #[error("failed to flush report: {0}")]
    Flush(#[from] std::io::Error),

    #[error("report buffer was not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Serialize the full dataset and ranked underperformers into one CSV
/// document with a fixed 10-column layout.
///
/// Row `i` pairs `full[i]` with `ranked[i]`. Fields containing the
/// delimiter or quotes are quoted with doubled quotes (standard CSV).
pub fn write_report(
    full: &[PriceRecord],
    ranked: &[UnderperformerRecord],
    window_days: u16,
) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header: Vec<String> = vec![
        String::from("Ticker Symbol"),
        format!("{window_days}-Day Moving Average"),
        String::from("Current Market Price"),
        format!("CMP-{window_days}DMA"),
        String::from("%Change"),
    ];
    header.extend(std::iter::repeat(String::new()).take(SPACER_COLUMNS));
    header.extend([
        String::from("Ticker Symbol"),
        String::from("Current Market Price"),
        String::from("% Change"),
    ]);
    writer.write_record(&header)?;

    for (index, record) in full.iter().enumerate() {
        let mut row: Vec<String> = vec![
            record.symbol.as_str().to_owned(),
            record.moving_average.to_string(),
            record.price.to_string(),
            record.change.to_string(),
            record.percent_change.to_string(),
        ];
        row.extend(std::iter::repeat(String::new()).take(SPACER_COLUMNS));

        match ranked.get(index) {
            Some(under) => row.extend([
                under.symbol.as_str().to_owned(),
                under.price.to_string(),
                under.percent_change.to_string(),
            ]),
            None => row.extend(std::iter::repeat(String::new()).take(3)),
        }

        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| ExportError::Flush(error.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}
