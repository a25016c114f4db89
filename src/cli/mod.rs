//! CLI module - argument parsing and subcommand runners

mod args;
pub mod report;
pub mod transform;

pub use args::{figure_size, transformed_path, Cli, Commands};
pub use report::{run_report, ReportArgs};
pub use transform::run_transform;
