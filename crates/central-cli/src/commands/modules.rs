//! Modules command implementation.

use miette::Result;

use central_ops::ops_modules::list_modules;
use central_ops::ops_resolve::resolve_project;
use central_util::progress;

use crate::cli::OutputFormat;

pub fn exec(format: OutputFormat) -> Result<()> {
    let root = super::project_root()?;
    let project = resolve_project(&root)?;
    let listing = list_modules(&project);

    if format == OutputFormat::Json {
        return super::print_json(&listing);
    }

    let layout = if listing.multi_module {
        "multi-module"
    } else {
        "single-module"
    };
    println!("{} ({layout}):", root.display());
    for module in &listing.modules {
        let marker = if module.selected { "*" } else { " " };
        let publishable = if module.publishable {
            "publishable"
        } else {
            "-"
        };
        print!("  {marker} {:<24} {:<28} {publishable}", module.name, module.gradle_path);
        if !module.dependencies.is_empty() {
            print!("  -> {}", module.dependencies.join(", "));
        }
        println!();
    }

    if listing.publish_order.is_empty() {
        println!("\nNo module selected for publishing.");
    } else {
        println!("\nPublish order: {}", listing.publish_order.join(", "));
    }

    for warning in &listing.warnings {
        progress::status_warn("Warning", warning);
    }
    for problem in &listing.problems {
        progress::status_error("Selection", problem);
    }
    Ok(())
}
