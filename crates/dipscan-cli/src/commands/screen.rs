use serde::Serialize;

use dipscan_core::rank;
use dipscan_core::screen::SkippedSymbol;
use dipscan_core::{PriceRecord, UnderperformerRecord};

use crate::cli::ScreenArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct ScreenResponseData {
    records: Vec<PriceRecord>,
    underperformers: Vec<UnderperformerRecord>,
    skipped: Vec<SkippedSymbol>,
}

pub async fn run(args: &ScreenArgs, timeout_ms: u64) -> Result<CommandResult, CliError> {
    let outcome = super::run_screen(&args.run, timeout_ms).await?;
    let ranked = rank::rank(outcome.underperformers, args.run.top);

    let skipped_count = outcome.skipped.len();
    let data = serde_json::to_value(ScreenResponseData {
        records: outcome.records,
        underperformers: ranked,
        skipped: outcome.skipped,
    })?;

    let mut result = CommandResult::ok(data);
    if skipped_count > 0 {
        result = result.with_warning(format!(
            "{skipped_count} symbols were excluded; see data.skipped for reasons"
        ));
    }

    Ok(result)
}
