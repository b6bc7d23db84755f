use anyhow::Result;
use tracing::info_span;

use fieldmatch_cli::cli::{InspectArgs, MatchArgs, OutputFormatArg, RecommendArgs};
use fieldmatch_cli::workflow::{self, write_json};

use crate::summary::{print_inspection, print_match_summary, print_recommendations};

pub fn run_match(args: &MatchArgs) -> Result<i32> {
    let span = info_span!("match", profiles = %args.profiles.display());
    let _guard = span.enter();
    let outcome = workflow::run_match(
        &args.catalog,
        &args.profiles,
        args.config.as_deref(),
        &args.models,
    )?;
    match args.format {
        OutputFormatArg::Json => write_json(&outcome.sheet, args.output.as_deref())?,
        OutputFormatArg::Table => {
            print_match_summary(&outcome);
            if let Some(path) = args.output.as_deref() {
                write_json(&outcome.sheet, Some(path))?;
                println!("Result written to {}", path.display());
            }
        }
    }
    Ok(0)
}

pub fn run_recommend(args: &RecommendArgs) -> Result<i32> {
    let context = workflow::run_recommend(&args.profiles)?;
    match args.format {
        OutputFormatArg::Json => write_json(&context, None)?,
        OutputFormatArg::Table => print_recommendations(&context),
    }
    Ok(0)
}

/// Exits 1 when the catalog has integrity errors.
pub fn run_inspect(args: &InspectArgs) -> Result<i32> {
    let outcome = workflow::run_inspect(&args.catalog)?;
    match args.format {
        OutputFormatArg::Json => write_json(&outcome, None)?,
        OutputFormatArg::Table => print_inspection(&outcome),
    }
    Ok(i32::from(outcome.integrity.has_errors()))
}
