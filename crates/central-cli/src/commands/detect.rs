//! Detect command implementation.

use miette::Result;

use central_ops::ops_detect::detect_project;
use central_util::progress;

use crate::cli::OutputFormat;

pub fn exec(format: OutputFormat) -> Result<()> {
    let root = super::project_root()?;

    let step = progress::step("Inspected", "Inspecting project...");
    let report = match detect_project(&root) {
        Ok(report) => report,
        Err(e) => {
            step.abandon();
            return Err(e);
        }
    };
    step.finish(&format!(
        "{} with {} detector(s)",
        report.kind,
        report.detectors.len()
    ));

    if format == OutputFormat::Json {
        return super::print_json(&report);
    }

    println!("Project:    {}", root.display());
    println!("Kind:       {}", report.kind);
    println!("Detectors:  {}", report.detectors.join(", "));
    println!(
        "Group:      {}",
        report.group.as_deref().unwrap_or("(not detected)")
    );
    println!(
        "Version:    {}",
        report.version.as_deref().unwrap_or("(not detected)")
    );
    println!(
        "Modules:    {} ({} publishable)",
        report.module_count,
        report.publishable.len()
    );

    if report.detection.detected_values.is_empty() {
        println!("\nNothing detected.");
    } else {
        println!("\nDetected values:");
        for value in report.detection.detected_values.values() {
            println!(
                "  {:<34} {}  [{}, {}]",
                value.path, value.value, value.confidence, value.source
            );
        }
    }

    for warning in &report.detection.warnings {
        progress::status_warn("Warning", warning);
    }
    Ok(())
}
