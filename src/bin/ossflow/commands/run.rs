// Run command implementation

use anyhow::{anyhow, Context, Result};
use bytes::Bytes;
use std::path::Path;

use crate::cli::RunArgs;
use ossflow::{Workflow, WorkflowReport};

/// Execute the run command
pub async fn execute_run(args: &RunArgs, workflow: &Workflow) -> Result<()> {
    let path = Path::new(&args.file);
    let object_name = match &args.object {
        Some(name) => name.clone(),
        None => default_object_name(path)?,
    };

    let content = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let report = workflow.run(&object_name, Bytes::from(content)).await?;
    print_report(&report);

    Ok(())
}

/// Object name defaults to the file name without directories
fn default_object_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.to_string())
        .ok_or_else(|| anyhow!("Cannot derive object name from path: {}", path.display()))
}

fn print_report(report: &WorkflowReport) {
    println!("Endpoint:  {}", report.endpoint);
    println!("Container: {}", report.container);
    println!("Object:    {} ({} bytes)", report.object, report.bytes);
    println!("Duplicate: {}", report.duplicate);
    println!();
    for record in &report.steps {
        let elapsed = format!("{:.3?}", record.elapsed);
        println!("  {:<24} {:>12}", record.step.to_string(), elapsed);
    }
    println!();
    println!(
        "All {} steps passed in {:.3?}",
        report.steps.len(),
        report.total_elapsed()
    );
}
