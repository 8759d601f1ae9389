use central_detect::{
    Confidence, DetectionOptions, DetectionResult, Detector, DetectorRegistry,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

struct Fixed {
    name: &'static str,
    values: Vec<(&'static str, &'static str, Confidence)>,
}

impl Detector for Fixed {
    fn name(&self) -> &'static str {
        self.name
    }

    fn detect(&self, _project_root: &Path) -> Option<DetectionResult> {
        let mut result = DetectionResult::new();
        for (path, value, confidence) in &self.values {
            result.record(path, value, self.name, *confidence);
        }
        Some(result)
    }
}

struct Absent;

impl Detector for Absent {
    fn name(&self) -> &'static str {
        "absent"
    }

    fn detect(&self, _project_root: &Path) -> Option<DetectionResult> {
        None
    }
}

#[test]
fn test_earlier_detector_wins_conflicts() {
    let registry = DetectorRegistry::new()
        .register(Fixed {
            name: "first",
            values: vec![("projectInfo.name", "alpha", Confidence::Low)],
        })
        .register(Absent)
        .register(Fixed {
            name: "second",
            values: vec![
                ("projectInfo.name", "beta", Confidence::High),
                ("projectInfo.url", "https://example.com", Confidence::Medium),
            ],
        });

    assert_eq!(registry.names(), vec!["first", "absent", "second"]);

    let result = registry.detect_all(Path::new("."));
    assert_eq!(result.config.project_info.name, "alpha");
    assert_eq!(result.config.project_info.url, "https://example.com");
    assert_eq!(result.detected_values["projectInfo.name"].source, "first");
    assert_eq!(result.detected_values["projectInfo.url"].source, "second");
}

#[test]
fn test_record_keeps_higher_confidence() {
    let mut result = DetectionResult::new();
    result.record("projectInfo.name", "from-settings", "settings", Confidence::High);
    result.record("projectInfo.name", "from-dir", "directory", Confidence::Low);
    result.record("projectInfo.name", "   ", "blank", Confidence::High);
    result.record("no.such.path", "x", "nowhere", Confidence::High);

    assert_eq!(result.config.project_info.name, "from-settings");
    assert_eq!(result.detected_values.len(), 1);
}

#[test]
fn test_standard_registry_on_empty_directory() {
    let tmp = TempDir::new().unwrap();
    let options = DetectionOptions {
        global_git: false,
        ..Default::default()
    };
    let registry = DetectorRegistry::standard(&options, None);
    assert_eq!(registry.names(), vec!["git", "project-info", "module-structure"]);

    let result = registry.detect_all(tmp.path());
    assert!(result.config.project_info.url.is_empty());
    assert!(!result.config.project_info.name.is_empty(), "directory name fallback");
}

#[test]
fn test_standard_registry_on_multi_module_project() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join(".git")).unwrap();
    fs::write(
        root.join(".git/config"),
        "[remote \"origin\"]\n\turl = https://github.com/acme/widgets.git\n",
    )
    .unwrap();
    fs::write(
        root.join("settings.gradle.kts"),
        "rootProject.name = \"widgets\"\ninclude(\"core\")\n",
    )
    .unwrap();
    fs::create_dir_all(root.join("core")).unwrap();
    fs::write(root.join("core/build.gradle.kts"), "plugins { `maven-publish` }\n").unwrap();

    let result = DetectorRegistry::standard(&DetectionOptions::default(), None).detect_all(root);
    let config = &result.config;
    assert_eq!(config.project_info.name, "widgets");
    assert_eq!(config.project_info.url, "https://github.com/acme/widgets");
    assert!(config.publishing.aggregation.is_enabled());
    assert_eq!(
        result.detected_values["projectInfo.scm.url"].confidence,
        Confidence::High
    );
}
