//! Operation: list the project's modules and apply module selection.

use std::path::Path;

use serde::Serialize;

use central_detect::modules::{ModuleInfo, ModuleStructure, ModuleStructureDetector};
use central_detect::selection::ModuleSelectionConfig;

use crate::ops_resolve::ResolvedProject;

#[derive(Debug, Clone, Serialize)]
pub struct ModuleRow {
    pub name: String,
    pub gradle_path: String,
    pub publishable: bool,
    pub selected: bool,
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleListing {
    pub multi_module: bool,
    pub modules: Vec<ModuleRow>,
    /// Gradle paths of the selected publishable modules, dependencies first.
    pub publish_order: Vec<String>,
    /// Selection patterns or groups that match nothing.
    pub problems: Vec<String>,
    pub warnings: Vec<String>,
}

/// Selection for `project`: the manifest's `[selection]` table plus
/// `publishing.excludeModules` as extra exclude patterns.
pub fn selection_for(project: &ResolvedProject) -> ModuleSelectionConfig {
    ModuleSelectionConfig::from_settings(
        &project.selection_settings(),
        &project.config().publishing.exclude_modules,
    )
}

pub fn analyze(project_root: &Path) -> ModuleStructure {
    ModuleStructureDetector::analyze(project_root)
}

/// The modules to publish, dependencies first.
pub fn publish_order<'s>(
    structure: &'s ModuleStructure,
    selection: &ModuleSelectionConfig,
) -> Vec<&'s ModuleInfo> {
    let selected: Vec<&str> = selection
        .select(structure)
        .into_iter()
        .map(|m| m.gradle_path.as_str())
        .collect();
    structure
        .publish_order()
        .into_iter()
        .filter(|m| selected.contains(&m.gradle_path.as_str()))
        .collect()
}

pub fn list_modules(project: &ResolvedProject) -> ModuleListing {
    let structure = analyze(&project.root);
    let selection = selection_for(project);
    let selected: Vec<&str> = selection
        .select(&structure)
        .into_iter()
        .map(|m| m.gradle_path.as_str())
        .collect();

    let modules = structure
        .modules()
        .into_iter()
        .map(|m| ModuleRow {
            name: m.name.clone(),
            gradle_path: m.gradle_path.clone(),
            publishable: m.publishable,
            selected: selected.contains(&m.gradle_path.as_str()),
            dependencies: m.dependencies.clone(),
        })
        .collect();

    ModuleListing {
        multi_module: structure.is_multi_module,
        modules,
        publish_order: publish_order(&structure, &selection)
            .into_iter()
            .map(|m| m.gradle_path.clone())
            .collect(),
        problems: selection.validate_selection(&structure),
        warnings: structure.warnings.clone(),
    }
}
