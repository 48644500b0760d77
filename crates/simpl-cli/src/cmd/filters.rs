//! `simpl filters`: list registered filters and their parameters.

use clap::Args;

use simpl_filters::core_registry;

use super::{CmdResult, EXIT_SUCCESS};

#[derive(Args)]
pub struct FiltersArgs {
    /// Also list each filter's parameters
    #[arg(long, short)]
    verbose: bool,
}

pub fn run(args: FiltersArgs) -> CmdResult {
    let registry = core_registry();
    for name in registry.names() {
        let filter = registry.create(name)?;
        println!("{name:<24} {} [{}]", filter.human_label(), filter.group());
        if args.verbose {
            for spec in filter.parameter_specs() {
                println!("    {:<32} {:<12} {}", spec.key, spec.kind.name(), spec.label);
            }
        }
    }
    Ok(EXIT_SUCCESS)
}
