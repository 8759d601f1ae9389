//! Operation: show what auto-detection finds in a project, without
//! merging it with any other source.

use std::path::Path;
use std::time::Duration;

use serde::Serialize;

use central_core::manifest::{DetectionSettings, PublisherManifest};
use central_core::project_kind::ProjectKind;
use central_detect::modules::ModuleStructure;
use central_detect::project_info::detect_coordinates;
use central_detect::project_kind::detect_project_kind;
use central_detect::{DetectionOptions, DetectionResult, DetectorRegistry};

use crate::ops_modules;

#[derive(Debug, Clone, Serialize)]
pub struct DetectReport {
    pub kind: ProjectKind,
    pub detectors: Vec<&'static str>,
    pub detection: DetectionResult,
    pub group: Option<String>,
    pub version: Option<String>,
    pub module_count: usize,
    pub publishable: Vec<String>,
}

pub fn options_from(settings: &DetectionSettings) -> DetectionOptions {
    DetectionOptions {
        git_timeout: Duration::from_secs(settings.git_timeout_secs),
        global_git: settings.global_git,
    }
}

/// Run the standard detectors with the manifest's `[detection]` settings.
pub fn detect_project(project_root: &Path) -> miette::Result<DetectReport> {
    let settings = PublisherManifest::load(project_root)?
        .map(|m| m.detection)
        .unwrap_or_default();
    Ok(detect_with(project_root, &options_from(&settings)))
}

pub fn detect_with(project_root: &Path, options: &DetectionOptions) -> DetectReport {
    let registry = DetectorRegistry::standard(options, None);
    let detection = registry.detect_all(project_root);
    let structure: ModuleStructure = ops_modules::analyze(project_root);
    let coordinates = detect_coordinates(project_root);

    DetectReport {
        kind: detect_project_kind(project_root),
        detectors: registry.names(),
        detection,
        group: coordinates.group,
        version: coordinates.version,
        module_count: structure.modules().len(),
        publishable: structure
            .publishable_modules()
            .into_iter()
            .map(|m| m.name.clone())
            .collect(),
    }
}
