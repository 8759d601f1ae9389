//! Operation: validate a resolved project.

use central_detect::modules::ModuleStructure;
use central_detect::selection::ModuleSelectionConfig;
use central_validate::report::ValidationReport;
use central_validate::{ValidationEngine, ValidationResult, ValidationViolation};

use crate::ops_modules;
use crate::ops_resolve::ResolvedProject;

pub struct ValidateOutcome {
    pub result: ValidationResult,
    pub report: ValidationReport,
}

/// Run the standard validator chain over the resolved config, then check
/// the manifest's module selection against the actual module layout.
pub fn validate_project(project: &ResolvedProject) -> ValidateOutcome {
    let mut result = ValidationEngine::standard().validate(project.config());

    let settings = project.selection_settings();
    let selection = ModuleSelectionConfig::from_settings(&settings, std::iter::empty::<&String>());
    if !selection.is_empty() {
        let structure = ops_modules::analyze(&project.root);
        for violation in selection_violations(&selection, &structure) {
            result.push(violation);
        }
    }

    tracing::info!(
        "Validation found {} error(s) and {} warning(s)",
        result.errors().len(),
        result.warnings().len()
    );
    let report = ValidationReport::from_result(&result);
    ValidateOutcome { result, report }
}

/// One `SEL-UNMATCHED` error per selection entry that matches nothing.
pub fn selection_violations(
    selection: &ModuleSelectionConfig,
    structure: &ModuleStructure,
) -> Vec<ValidationViolation> {
    selection
        .validate_selection(structure)
        .into_iter()
        .map(|message| {
            ValidationViolation::error("SEL-UNMATCHED", "selection", message)
                .with_suggestion("Run `central-publish modules` to list the available modules")
        })
        .collect()
}
