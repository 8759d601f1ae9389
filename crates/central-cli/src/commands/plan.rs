//! Plan command implementation.
//!
//! Validates first; an invalid configuration prints the report to stderr
//! and the plan is refused.

use miette::Result;

use central_ops::ops_modules::selection_for;
use central_ops::ops_publish::plan_publish;
use central_ops::ops_resolve::resolve_project;
use central_ops::ops_validate::validate_project;
use central_util::progress;

use crate::cli::OutputFormat;

pub fn exec(
    include: &[String],
    exclude: &[String],
    entries: bool,
    format: OutputFormat,
) -> Result<()> {
    let root = super::project_root()?;
    let project = resolve_project(&root)?;
    let outcome = validate_project(&project);
    if !outcome.result.is_valid() {
        eprint!("{}", outcome.report.render(console::colors_enabled_stderr()));
    }

    let mut selection = selection_for(&project);
    for pattern in include {
        selection = selection.include(pattern.as_str());
    }
    for pattern in exclude {
        selection = selection.exclude(pattern.as_str());
    }

    let plan = plan_publish(&project, &outcome.result, &selection)?;

    if format == OutputFormat::Json {
        return super::print_json(&plan);
    }

    println!("Deployment:  {}", plan.deployment_name);
    println!("Publishing:  {}", plan.publishing_type.as_str());
    println!("Endpoint:    {}", plan.endpoint);
    println!("Strategy:    {}", plan.strategy);
    println!("\nModules (publish order):");
    for module in &plan.modules {
        println!(
            "  {}:{}:{}",
            module.group_id, module.artifact_id, module.version
        );
    }
    println!("\nBundles:");
    for bundle in &plan.bundles {
        println!(
            "  {}  ({} module(s), {} file(s))",
            bundle.file_name,
            bundle.modules.len(),
            bundle.entries.len()
        );
        if entries {
            for entry in &bundle.entries {
                println!("    {entry}");
            }
        }
    }

    if plan.dry_run {
        progress::status_info("Dry run", "bundles would be built but not uploaded");
    }
    Ok(())
}
