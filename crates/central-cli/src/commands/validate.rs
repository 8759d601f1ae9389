//! Validate command implementation.

use miette::Result;

use central_ops::ops_resolve::resolve_project;
use central_ops::ops_validate::validate_project;
use central_util::errors::CentralError;
use central_validate::suggestions::{suggestions_for_violation, FixSuggestion};
use central_validate::ValidationResult;

use crate::cli::OutputFormat;

pub fn exec(format: OutputFormat) -> Result<()> {
    let root = super::project_root()?;
    let project = resolve_project(&root)?;
    let outcome = validate_project(&project);

    match format {
        OutputFormat::Json => super::print_json(&outcome.report)?,
        OutputFormat::Text => {
            print!("{}", outcome.report.render(console::colors_enabled()));
            print_fixes(&outcome.result);
        }
    }

    if !outcome.result.is_valid() {
        return Err(CentralError::Validation {
            errors: outcome.result.errors().len(),
            warnings: outcome.result.warnings().len(),
        }
        .into());
    }
    Ok(())
}

/// Ranked fixes for the blocking violations, each listed once.
fn print_fixes(result: &ValidationResult) {
    let mut fixes: Vec<&FixSuggestion> = Vec::new();
    for violation in result.errors() {
        for fix in suggestions_for_violation(violation) {
            if !fixes.iter().any(|f| f.description == fix.description) {
                fixes.push(fix);
            }
        }
    }
    if fixes.is_empty() {
        return;
    }

    println!("\nHow to fix:");
    for fix in fixes {
        println!("  - {}", fix.description);
        if let Some(command) = fix.command {
            println!("      run: {command}");
        }
        if let Some(url) = fix.documentation_url {
            println!("      see: {url}");
        }
    }
}
