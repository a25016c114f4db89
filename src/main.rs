//! edaclf: feature engineering and classification report CLI

use anyhow::Result;
use clap::Parser;

use edaclf::cli::{figure_size, run_report, run_transform, Cli, Commands, ReportArgs};
use edaclf::utils::{init_logging, print_banner};

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    print_banner(env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Transform {
            input,
            pipeline,
            output,
            infer_schema_length,
        } => run_transform(&input, &pipeline, output.as_deref(), infer_schema_length),
        Commands::Report {
            input,
            target,
            pred,
            proba,
            nbin,
            classifier_name,
            width,
            height,
            figure,
            curve,
            infer_schema_length,
        } => run_report(&ReportArgs {
            input,
            target,
            pred,
            proba,
            nbin,
            classifier_name,
            figsize: figure_size(width, height),
            figure,
            curve,
            infer_schema_length,
        }),
    }
}
