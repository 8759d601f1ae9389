//! Operation: plan a Central Portal deployment.
//!
//! Planning is the gate in front of the upload pipeline: it refuses an
//! invalid configuration and otherwise describes the bundles that would be
//! built and uploaded. Nothing is built, signed or sent here.

use serde::Serialize;

use central_detect::selection::ModuleSelectionConfig;
use central_maven::strategy::{select_strategy, Publication};
use central_util::errors::CentralError;
use central_validate::ValidationResult;

use crate::ops_modules;
use crate::ops_pom::module_coordinates;
use crate::ops_resolve::ResolvedProject;

pub const UPLOAD_ENDPOINT: &str = "https://central.sonatype.com/api/v1/publisher/upload";

/// Sidecar files Central requires next to every artifact.
const SIDECARS: &[&str] = &["asc", "md5", "sha1"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PublishingType {
    /// Released as soon as the portal validates the deployment.
    Automatic,
    /// Waits for a manual release in the portal.
    UserManaged,
}

impl PublishingType {
    pub fn as_str(self) -> &'static str {
        match self {
            PublishingType::Automatic => "AUTOMATIC",
            PublishingType::UserManaged => "USER_MANAGED",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedModule {
    pub name: String,
    pub gradle_path: String,
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub publications: Vec<Publication>,
}

impl PlannedModule {
    /// Repository-layout paths of every file this module adds to a bundle,
    /// including signatures and checksums.
    pub fn bundle_entries(&self) -> Vec<String> {
        let group_path = self.group_id.replace('.', "/");
        let mut entries = Vec::new();
        for publication in &self.publications {
            let dir = format!("{group_path}/{}/{}", publication.artifact_id, self.version);
            for file in &publication.files {
                entries.push(format!("{dir}/{file}"));
                for sidecar in SIDECARS {
                    entries.push(format!("{dir}/{file}.{sidecar}"));
                }
            }
        }
        entries
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub file_name: String,
    pub deployment_name: String,
    pub modules: Vec<String>,
    pub entries: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishPlan {
    pub deployment_name: String,
    pub publishing_type: PublishingType,
    pub endpoint: &'static str,
    pub strategy: &'static str,
    pub aggregated: bool,
    pub bundles: Vec<Bundle>,
    /// Modules in publish order, dependencies first.
    pub modules: Vec<PlannedModule>,
    pub dry_run: bool,
}

/// Plan the deployment of the modules `selection` picks out of `project`.
///
/// Fails with [`CentralError::Validation`] when `validation` has errors,
/// and with [`CentralError::Selection`] when nothing publishable is
/// selected.
pub fn plan_publish(
    project: &ResolvedProject,
    validation: &ValidationResult,
    selection: &ModuleSelectionConfig,
) -> miette::Result<PublishPlan> {
    if !validation.is_valid() {
        return Err(CentralError::Validation {
            errors: validation.errors().len(),
            warnings: validation.warnings().len(),
        }
        .into());
    }

    let config = project.config();
    let structure = ops_modules::analyze(&project.root);
    let order = ops_modules::publish_order(&structure, selection);
    if order.is_empty() {
        return Err(CentralError::Selection {
            message: "No publishable module selected; apply `maven-publish` or adjust [selection]"
                .to_string(),
        }
        .into());
    }

    let strategy = select_strategy(project.resolution.kind);
    let mut modules = Vec::new();
    for info in order {
        let coordinates = module_coordinates(project, &structure, info);
        if coordinates.group_id.trim().is_empty() {
            return Err(CentralError::Config {
                message: format!(
                    "Module '{}' has no group; set `group` in its build file or GROUP in gradle.properties",
                    info.gradle_path
                ),
            }
            .into());
        }
        modules.push(PlannedModule {
            name: info.name.clone(),
            gradle_path: info.gradle_path.clone(),
            publications: strategy.publications(&coordinates.artifact_id, &coordinates.version, &[]),
            group_id: coordinates.group_id,
            artifact_id: coordinates.artifact_id,
            version: coordinates.version,
        });
    }

    let Some(first) = modules.first() else {
        return Err(CentralError::Selection {
            message: "Selected modules are missing from the module structure".to_string(),
        }
        .into());
    };
    let root_name = structure.root_module.name.clone();
    let deployment_name = format!("{}:{root_name}:{}", first.group_id, first.version);
    let aggregated = structure.is_multi_module && config.publishing.aggregation.is_enabled();

    let bundles = if aggregated || modules.len() == 1 {
        let bundle_name = if aggregated { &root_name } else { &first.artifact_id };
        vec![Bundle {
            file_name: format!("{bundle_name}-{}-bundle.zip", first.version),
            deployment_name: deployment_name.clone(),
            modules: modules.iter().map(|m| m.gradle_path.clone()).collect(),
            entries: modules.iter().flat_map(PlannedModule::bundle_entries).collect(),
        }]
    } else {
        modules
            .iter()
            .map(|m| Bundle {
                file_name: format!("{}-{}-bundle.zip", m.artifact_id, m.version),
                deployment_name: format!("{}:{}:{}", m.group_id, m.artifact_id, m.version),
                modules: vec![m.gradle_path.clone()],
                entries: m.bundle_entries(),
            })
            .collect()
    };

    let publishing_type = if config.publishing.auto_publish.is_enabled() {
        PublishingType::Automatic
    } else {
        PublishingType::UserManaged
    };
    tracing::info!(
        "Planned {} bundle(s) for {} module(s), {}",
        bundles.len(),
        modules.len(),
        publishing_type.as_str()
    );

    Ok(PublishPlan {
        deployment_name,
        publishing_type,
        endpoint: UPLOAD_ENDPOINT,
        strategy: strategy.name,
        aggregated,
        bundles,
        modules,
        dry_run: config.publishing.dry_run.is_enabled(),
    })
}
