mod export;
mod screen;

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use dipscan_core::envelope::{Envelope, EnvelopeMeta};
use dipscan_core::gateway::AverageWindow;
use dipscan_core::screen::{ScreenConfig, ScreenOutcome, ScreenPipeline};
use dipscan_core::{ReqwestHttpClient, YahooGateway};

use crate::cli::{Cli, Command, RunArgs};
use crate::error::CliError;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

pub async fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let started = Instant::now();

    let command_result = match &cli.command {
        Command::Screen(args) => screen::run(args, cli.timeout_ms).await?,
        Command::Export(args) => export::run(args, cli.timeout_ms).await?,
    };

    let mut meta = EnvelopeMeta::new(
        Uuid::new_v4().to_string(),
        started.elapsed().as_millis() as u64,
    );
    for warning in command_result.warnings {
        meta.push_warning(warning);
    }

    Ok(Envelope::success(meta, command_result.data))
}

/// Read the watchlist and run the pipeline for the shared `RunArgs`.
pub(crate) async fn run_screen(args: &RunArgs, timeout_ms: u64) -> Result<ScreenOutcome, CliError> {
    let raw_symbols = dipscan_core::read_symbols(&args.input)?;
    info!(
        watchlist = %args.input.display(),
        symbols = raw_symbols.len(),
        "watchlist loaded"
    );

    let gateway = Arc::new(
        YahooGateway::new(Arc::new(ReqwestHttpClient::new())).with_timeout_ms(timeout_ms),
    );
    let config = ScreenConfig {
        volume_threshold: args.min_volume,
        window: AverageWindow::new(args.window, args.lookback),
        concurrency: usize::from(args.concurrency),
    };

    Ok(ScreenPipeline::new(gateway, config).run(&raw_symbols).await)
}
