//! Operation: resolve the publisher configuration of a project.

use std::path::{Path, PathBuf};

use central_core::manifest::{PublisherManifest, SelectionSettings, MANIFEST_FILE};
use central_core::model::CentralPublisherConfig;
use central_resolve::{ConfigSourceManager, Resolution};

const ROOT_MARKERS: &[&str] = &[MANIFEST_FILE, "settings.gradle.kts", "settings.gradle"];

/// A project together with its resolved configuration.
#[derive(Debug)]
pub struct ResolvedProject {
    pub root: PathBuf,
    pub manifest: Option<PublisherManifest>,
    pub resolution: Resolution,
}

impl ResolvedProject {
    pub fn config(&self) -> &CentralPublisherConfig {
        &self.resolution.config
    }

    /// The manifest's `[selection]` table, empty without a manifest.
    pub fn selection_settings(&self) -> SelectionSettings {
        self.manifest
            .as_ref()
            .map(|m| m.selection.clone())
            .unwrap_or_default()
    }
}

/// The nearest ancestor of `start` holding a publisher manifest or a
/// Gradle settings file. Falls back to `start` itself.
pub fn find_project_root(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| ROOT_MARKERS.iter().any(|marker| dir.join(marker).is_file()))
        .map(Path::to_path_buf)
        .unwrap_or_else(|| start.to_path_buf())
}

/// Resolve `project_root` with the process environment, the user's
/// properties files and the detection settings of the manifest.
pub fn resolve_project(project_root: &Path) -> miette::Result<ResolvedProject> {
    let manifest = PublisherManifest::load(project_root)?;
    let settings = manifest
        .as_ref()
        .map(|m| m.detection.clone())
        .unwrap_or_default();
    let manager = ConfigSourceManager::standard(&settings);
    resolve_loaded(project_root, manifest, &manager)
}

/// Resolve `project_root` with a caller-supplied source manager.
pub fn resolve_with(
    project_root: &Path,
    manager: &ConfigSourceManager,
) -> miette::Result<ResolvedProject> {
    let manifest = PublisherManifest::load(project_root)?;
    resolve_loaded(project_root, manifest, manager)
}

fn resolve_loaded(
    project_root: &Path,
    manifest: Option<PublisherManifest>,
    manager: &ConfigSourceManager,
) -> miette::Result<ResolvedProject> {
    let dsl = manifest.as_ref().map(PublisherManifest::to_config);
    if dsl.is_none() {
        tracing::debug!("No {MANIFEST_FILE} in {}", project_root.display());
    }
    let resolution = manager.resolve(project_root, dsl.as_ref());
    for warning in &resolution.warnings {
        tracing::warn!("{warning}");
    }
    Ok(ResolvedProject {
        root: project_root.to_path_buf(),
        manifest,
        resolution,
    })
}
