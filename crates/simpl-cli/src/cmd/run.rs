//! `simpl run`: execute a pipeline file.

use clap::Args;
use crossbeam_channel::RecvTimeoutError;
use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use simpl_filter::{CancelToken, TracingObserver};
use simpl_pipeline::{PipelineRunner, RunStatus};

use super::{load_data, load_pipeline, CmdResult, EXIT_CANCELLED, EXIT_FAILURE, EXIT_SUCCESS};

#[derive(Args)]
pub struct RunArgs {
    /// Pipeline file (JSON)
    pipeline: PathBuf,
    /// Data file to start from instead of an empty structure
    #[arg(long)]
    input: Option<PathBuf>,
    /// Write the resulting data structure here
    #[arg(long)]
    output: Option<PathBuf>,
    /// Cancel the run once this many milliseconds have passed
    #[arg(long, value_name = "MS")]
    time_limit_ms: Option<u64>,
}

/// Cancel `token` after `limit` unless the returned sender is dropped
/// first. A zero limit cancels before returning.
fn spawn_deadline(token: CancelToken, limit: Duration) -> crossbeam_channel::Sender<()> {
    let (done_tx, done_rx) = crossbeam_channel::bounded::<()>(0);
    if limit.is_zero() {
        token.cancel();
        return done_tx;
    }
    thread::spawn(move || {
        if let Err(RecvTimeoutError::Timeout) = done_rx.recv_timeout(limit) {
            tracing::warn!(limit_ms = limit.as_millis() as u64, "time limit reached, cancelling");
            token.cancel();
        }
    });
    done_tx
}

pub fn run(args: RunArgs) -> CmdResult {
    let mut pipeline = load_pipeline(&args.pipeline)?;
    let mut dca = load_data(args.input.as_deref())?;
    let mut runner = PipelineRunner::new().with_observer(TracingObserver);
    let deadline = args
        .time_limit_ms
        .map(|ms| spawn_deadline(runner.cancel_token(), Duration::from_millis(ms)));

    let result = runner.run(&mut pipeline, &mut dca);
    drop(deadline);
    let report = match result {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{e}");
            return Ok(EXIT_FAILURE);
        }
    };

    if let Some(output) = &args.output {
        fs::write(output, serde_json::to_string_pretty(&dca)?)
            .map_err(|e| format!("{}: {e}", output.display()))?;
    }

    match report.status {
        RunStatus::Completed => {
            println!(
                "{}: {} of {} filters executed in {} us",
                pipeline.name(),
                report.executed,
                report.total,
                report.metrics.total_us
            );
            Ok(EXIT_SUCCESS)
        }
        RunStatus::Cancelled { index, filter } => {
            eprintln!("cancelled at filter {index} ({filter})");
            Ok(EXIT_CANCELLED)
        }
    }
}
