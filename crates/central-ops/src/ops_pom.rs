//! Operation: preview the POM metadata a module would be published with.

use central_detect::modules::{ModuleInfo, ModuleStructure};
use central_detect::project_info::detect_coordinates;
use central_maven::pom::{parse_pom_metadata, render_pom_metadata, PomCoordinates};
use central_util::errors::CentralError;

use crate::ops_modules;
use crate::ops_resolve::ResolvedProject;

/// Gradle's version for projects that never set one.
pub const UNSPECIFIED_VERSION: &str = "unspecified";

/// Coordinates of `module`: group and version from its own build, falling
/// back to the root build; artifact id from [`ModuleStructure::artifact_id`].
pub fn module_coordinates(
    project: &ResolvedProject,
    structure: &ModuleStructure,
    module: &ModuleInfo,
) -> PomCoordinates {
    let root = detect_coordinates(&project.root);
    let own = detect_coordinates(&module.directory);
    PomCoordinates {
        group_id: own.group.or(root.group).unwrap_or_default(),
        artifact_id: structure.artifact_id(module),
        version: own
            .version
            .or(root.version)
            .unwrap_or_else(|| UNSPECIFIED_VERSION.to_string()),
    }
}

/// Render the POM for `module` (the root module when `None`) and read it
/// back to make sure nothing was lost in rendering.
pub fn render_project_pom(
    project: &ResolvedProject,
    module: Option<&str>,
) -> miette::Result<String> {
    let structure = ops_modules::analyze(&project.root);
    let info = match module {
        Some(name) => structure.find(name).ok_or_else(|| {
            let named = structure.named(name);
            let message = if named.len() > 1 {
                let paths: Vec<&str> = named.iter().map(|m| m.gradle_path.as_str()).collect();
                format!(
                    "Module name '{name}' is ambiguous; use its Gradle path ({})",
                    paths.join(", ")
                )
            } else {
                format!("No module named '{name}'")
            };
            CentralError::Selection { message }
        })?,
        None => &structure.root_module,
    };
    let coordinates = module_coordinates(project, &structure, info);
    let xml = render_pom_metadata(project.config(), &coordinates)?;

    let parsed = parse_pom_metadata(&xml)?;
    if parsed.coordinates != coordinates {
        return Err(CentralError::Generic {
            message: format!("Rendered POM for '{}' lost its coordinates", info.name),
        }
        .into());
    }
    if parsed.info.name.trim() != project.config().project_info.name.trim() {
        return Err(CentralError::Generic {
            message: format!("Rendered POM for '{}' lost the project name", info.name),
        }
        .into());
    }
    Ok(xml)
}
