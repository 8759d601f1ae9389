//! Best-effort project name, description and Maven coordinates from build
//! scripts and the README.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use central_core::properties::{load_properties, PROPERTIES_FILE};

use crate::{text, Confidence, DetectionResult, Detector};

static ROOT_PROJECT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"rootProject\.name\s*=\s*["']([^"'\n]+)["']"#).expect("valid regex")
});
static DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*(?:project\.)?description\s*=\s*["']([^"'\n]+)["']"#)
        .expect("valid regex")
});
static GROUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*(?:project\.)?group\s*=\s*["']([^"'\n]+)["']"#).expect("valid regex")
});
static VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*(?:project\.)?version\s*=\s*["']([^"'\n]+)["']"#).expect("valid regex")
});

const README_FILES: &[&str] = &["README.md", "README.adoc", "README.txt", "README", "readme.md"];

/// Read `rootProject.name` from the settings file in `dir`.
pub fn root_project_name(dir: &Path) -> Option<String> {
    let settings = text::settings_file(dir)?;
    let script = text::read_script(&settings)?;
    first_capture(&ROOT_PROJECT_NAME, &script)
}

/// First prose paragraph of a README, skipping headings, badges, HTML and
/// code fences. Lines of the paragraph are joined with spaces.
pub fn readme_summary(content: &str) -> Option<String> {
    let mut paragraph: Vec<&str> = Vec::new();
    let mut in_fence = false;

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        let skip = trimmed.starts_with('#')
            || trimmed.starts_with('=')
            || trimmed.starts_with("[![")
            || trimmed.starts_with("![")
            || trimmed.starts_with('<')
            || trimmed.starts_with("---")
            || trimmed.starts_with(":");
        if trimmed.is_empty() || skip {
            if !paragraph.is_empty() {
                break;
            }
            continue;
        }
        paragraph.push(trimmed);
    }

    let summary = paragraph.join(" ");
    (!summary.is_empty()).then_some(summary)
}

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .map(|c| c[1].trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Maven coordinates declared by the build, used when rendering POMs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildCoordinates {
    pub group: Option<String>,
    pub version: Option<String>,
}

/// Read `group`/`version` from the build file in `dir`, falling back to
/// `GROUP`/`VERSION_NAME` (or `group`/`version`) in `gradle.properties`.
pub fn detect_coordinates(dir: &Path) -> BuildCoordinates {
    let script = text::build_file(dir)
        .and_then(|p| text::read_script(&p))
        .unwrap_or_default();
    let props = load_properties(&dir.join(PROPERTIES_FILE));
    let prop = |keys: &[&str]| {
        keys.iter()
            .find_map(|k| props.get(*k).filter(|v| !v.trim().is_empty()).cloned())
    };

    BuildCoordinates {
        group: first_capture(&GROUP, &script).or_else(|| prop(&["GROUP", "group"])),
        version: first_capture(&VERSION, &script)
            .or_else(|| prop(&["VERSION_NAME", "version"])),
    }
}

/// Detects project name and description.
pub struct ProjectInfoDetector;

impl Detector for ProjectInfoDetector {
    fn name(&self) -> &'static str {
        "project-info"
    }

    fn detect(&self, project_root: &Path) -> Option<DetectionResult> {
        if !project_root.is_dir() {
            return None;
        }
        let mut result = DetectionResult::new();

        if let Some(settings) = text::settings_file(project_root) {
            match text::read_script(&settings) {
                Some(script) => {
                    if let Some(name) = first_capture(&ROOT_PROJECT_NAME, &script) {
                        result.record(
                            "projectInfo.name",
                            &name,
                            &text::label(&settings),
                            Confidence::High,
                        );
                    }
                }
                None => result.warn(format!("Could not read {}", settings.display())),
            }
        }

        if let Some(build) = text::build_file(project_root) {
            match text::read_script(&build) {
                Some(script) => {
                    if let Some(description) = first_capture(&DESCRIPTION, &script) {
                        result.record(
                            "projectInfo.description",
                            &description,
                            &text::label(&build),
                            Confidence::High,
                        );
                    }
                }
                None => result.warn(format!("Could not read {}", build.display())),
            }
        }

        if let Some(readme) = central_util::fs::first_existing(project_root, README_FILES) {
            if let Some(summary) =
                central_util::fs::read_optional(&readme).and_then(|c| readme_summary(&c))
            {
                result.record(
                    "projectInfo.description",
                    &summary,
                    &text::label(&readme),
                    Confidence::Medium,
                );
            }
        }

        if let Some(dir_name) = project_root
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        {
            result.record(
                "projectInfo.name",
                &dir_name,
                "directory name",
                Confidence::Low,
            );
        }

        Some(result)
    }
}
