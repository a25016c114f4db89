//! `edaclf transform`: fit a configured pipeline and write the transformed dataset

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::dataset::{dataset_from_frame, load_dataset_with_stats, save_dataset};
use crate::transform::{PipelineConfig, TransformStage};
use crate::utils::{
    create_spinner, finish_with_success, print_completion, print_path, print_step_header,
    print_success, FOLDER, GEAR, SAVE,
};

use super::args::transformed_path;

pub fn run_transform(
    input: &Path,
    pipeline_path: &Path,
    output: Option<&Path>,
    infer_schema_length: usize,
) -> Result<()> {
    let output_path = transformed_path(input, output);

    print_path(&FOLDER, "Input:", input);
    print_path(&GEAR, "Pipeline:", pipeline_path);
    print_path(&SAVE, "Output:", &output_path);

    // Parse the configuration first so a bad file fails before any data is read
    let config = PipelineConfig::from_path(pipeline_path)
        .with_context(|| format!("Failed to read pipeline config: {}", pipeline_path.display()))?;
    let mut pipeline = config.build().context("Invalid pipeline configuration")?;

    print_step_header(1, "Load Dataset");
    let started = Instant::now();
    let spinner = create_spinner("Reading dataset...");
    let (df, rows, cols, memory_mb) = load_dataset_with_stats(input, infer_schema_length)?;
    let data = dataset_from_frame(&df).context("Failed to convert dataset")?;
    finish_with_success(&spinner, "Dataset loaded");
    println!(
        "      {} rows × {} columns ({:.2} MB)",
        style(rows).yellow(),
        style(cols).yellow(),
        memory_mb
    );

    print_step_header(2, "Fit Pipeline");
    let spinner = create_spinner(&format!("Fitting {} step(s)...", pipeline.len()));
    let transformed = pipeline
        .fit_transform(&data, None)
        .context("Pipeline failed")?;
    finish_with_success(&spinner, "Pipeline fitted");

    print_step_header(3, "Save Results");
    let spinner = create_spinner("Writing output file...");
    save_dataset(&transformed, &output_path)?;
    finish_with_success(&spinner, &format!("Saved to {}", output_path.display()));

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Metric").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![Cell::new("Steps"), Cell::new(pipeline.step_names().collect::<Vec<_>>().join(", "))]);
    table.add_row(vec![Cell::new("Input columns"), Cell::new(data.width())]);
    table.add_row(vec![
        Cell::new("Output columns"),
        Cell::new(pipeline.feature_names()?.len())
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("Elapsed"),
        Cell::new(format!("{:.2}s", started.elapsed().as_secs_f64())),
    ]);

    println!();
    for line in table.to_string().lines() {
        println!("    {}", line);
    }

    print_success("Transform finished");
    print_completion("Transform");
    Ok(())
}
