//! `simpl preflight`: validate a pipeline file without running it.

use clap::Args;
use std::path::PathBuf;

use simpl_pipeline::PipelineRunner;

use super::{load_data, load_pipeline, CmdResult, EXIT_FAILURE, EXIT_SUCCESS};

#[derive(Args)]
pub struct PreflightArgs {
    /// Pipeline file (JSON)
    pipeline: PathBuf,
    /// Data file whose structure the pipeline starts from
    #[arg(long)]
    input: Option<PathBuf>,
    /// Print the structure as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: PreflightArgs) -> CmdResult {
    let mut pipeline = load_pipeline(&args.pipeline)?;
    let input = load_data(args.input.as_deref())?;
    let schema = match PipelineRunner::new().preflight(&mut pipeline, &input) {
        Ok(schema) => schema.schema(),
        Err(e) => {
            eprintln!("{e}");
            return Ok(EXIT_FAILURE);
        }
    };
    for (index, inst) in pipeline.filters().iter().enumerate() {
        for w in inst.warnings() {
            eprintln!("warning: filter {index} ({}): {} (code {})", inst.name(), w.message, w.code);
        }
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(&schema)?);
    } else {
        print!("{schema}");
    }
    Ok(EXIT_SUCCESS)
}
