use std::fs;

use dipscan_core::{export, rank};

use crate::cli::ExportArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(args: &ExportArgs, timeout_ms: u64) -> Result<CommandResult, CliError> {
    let outcome = super::run_screen(&args.run, timeout_ms).await?;
    let ranked = rank::rank(outcome.underperformers, args.run.top);

    let report = export::write_report(&outcome.records, &ranked, args.run.window)?;
    fs::write(&args.output, &report)?;

    let skipped_count = outcome.skipped.len();
    let mut result = CommandResult::ok(serde_json::json!({
        "output": args.output.display().to_string(),
        "rows": outcome.records.len(),
        "ranked": ranked.len(),
    }));
    if skipped_count > 0 {
        result = result.with_warning(format!("{skipped_count} symbols were excluded from the report"));
    }

    Ok(result)
}
