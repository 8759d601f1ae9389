use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use central_core::environment::MapEnvironment;
use central_core::project_kind::ProjectKind;
use central_detect::{DetectionOptions, DetectorRegistry};
use central_ops::ops_detect::detect_with;
use central_ops::ops_modules::list_modules;
use central_ops::ops_pom::render_project_pom;
use central_ops::ops_resolve::{find_project_root, resolve_with, ResolvedProject};
use central_ops::ops_validate::validate_project;
use central_resolve::manager::{ConfigSourceManager, FilePropertiesReader};
use central_resolve::ConfigSource;
use tempfile::TempDir;

const MANIFEST: &str = r#"
[credentials]
username = "token-user"
password = "s3cr3t-t0ken"

[project]
name = "widgets"
url = "https://github.com/acme/widgets"

[project.license]
name = "MIT"
url = "https://opensource.org/licenses/MIT"

[[project.developers]]
id = "jdoe"
name = "Jane Doe"
email = "jane@example.com"
"#;

fn options() -> DetectionOptions {
    DetectionOptions {
        git_timeout: Duration::from_secs(1),
        global_git: false,
    }
}

fn write_project(root: &Path, manifest: &str) {
    fs::create_dir_all(root).unwrap();
    fs::write(
        root.join("settings.gradle.kts"),
        "rootProject.name = \"widgets\"\ninclude(\"api\", \"core\", \"samples\")\n",
    )
    .unwrap();
    fs::write(
        root.join("build.gradle.kts"),
        "plugins {\n    kotlin(\"jvm\") version \"2.0.0\"\n}\n\ngroup = \"com.acme\"\nversion = \"1.0.0\"\ndescription = \"Widgets for everyone\"\n",
    )
    .unwrap();
    for (module, script) in [
        (
            "api",
            "plugins {\n    `maven-publish`\n}\n\ndependencies {\n    implementation(project(\":core\"))\n}\n",
        ),
        ("core", "plugins {\n    `maven-publish`\n}\n"),
        ("samples", "plugins {\n    application\n}\n"),
    ] {
        fs::create_dir_all(root.join(module)).unwrap();
        fs::write(root.join(module).join("build.gradle.kts"), script).unwrap();
    }
    fs::write(root.join("central-publisher.toml"), manifest).unwrap();
}

fn resolve(root: &Path, home: &Path) -> ResolvedProject {
    let manager = ConfigSourceManager::new(MapEnvironment::new(), FilePropertiesReader)
        .with_detectors(DetectorRegistry::standard(&options(), None))
        .with_home(Some(home.to_path_buf()));
    resolve_with(root, &manager).unwrap()
}

fn setup(manifest: &str) -> (TempDir, PathBuf, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("widgets");
    let home = tmp.path().join("home");
    fs::create_dir_all(&home).unwrap();
    write_project(&root, manifest);
    (tmp, root, home)
}

#[test]
fn test_find_project_root_from_module_dir() {
    let (_tmp, root, _home) = setup(MANIFEST);
    assert_eq!(find_project_root(&root.join("api")), root);

    let lone = TempDir::new().unwrap();
    assert_eq!(find_project_root(lone.path()), lone.path());
}

#[test]
fn test_resolve_merges_manifest_and_detection() {
    let (_tmp, root, home) = setup(MANIFEST);
    let project = resolve(&root, &home);
    let config = project.config();

    assert_eq!(config.project_info.name, "widgets");
    assert_eq!(config.project_info.description, "Widgets for everyone");
    assert!(config.publishing.aggregation.is_enabled());
    assert_eq!(project.resolution.kind, ProjectKind::Jvm);

    let provenance = &project.resolution.provenance;
    assert_eq!(
        provenance.source_of("projectInfo.name").unwrap().source,
        ConfigSource::Dsl
    );
    assert_eq!(
        provenance.source_of("projectInfo.description").unwrap().source,
        ConfigSource::AutoDetected
    );
}

#[test]
fn test_resolve_rejects_broken_manifest() {
    let (_tmp, root, home) = setup("[project\nname = 1");
    let manager = ConfigSourceManager::new(MapEnvironment::new(), FilePropertiesReader)
        .with_home(Some(home));
    let err = resolve_with(&root, &manager).unwrap_err();
    assert!(err.to_string().contains("Manifest error"), "{err}");
}

#[test]
fn test_validate_project_reports_warnings_only() {
    let (_tmp, root, home) = setup(MANIFEST);
    let outcome = validate_project(&resolve(&root, &home));
    assert!(outcome.result.is_valid(), "{:?}", outcome.result.errors());
    assert!(outcome.result.has_code("SIG-KEY_MISSING"));
    assert!(outcome.report.valid);
}

#[test]
fn test_validate_project_flags_unmatched_selection() {
    let manifest = format!(
        "{MANIFEST}\n[selection]\ninclude = [\"nonexistent-module\"]\nselected-groups = [\"invalid-group\"]\n"
    );
    let (_tmp, root, home) = setup(&manifest);
    let outcome = validate_project(&resolve(&root, &home));

    let selection: Vec<_> = outcome
        .result
        .errors()
        .into_iter()
        .filter(|v| v.code == "SEL-UNMATCHED")
        .collect();
    assert_eq!(selection.len(), 2);
    assert!(selection[0].message.contains("nonexistent-module"));
    assert!(selection[1].message.contains("invalid-group"));
    assert!(!outcome.result.is_valid());
}

#[test]
fn test_list_modules_applies_selection() {
    let manifest = format!("{MANIFEST}\n[publishing]\nexclude-modules = [\"sam*\"]\n");
    let (_tmp, root, home) = setup(&manifest);
    let listing = list_modules(&resolve(&root, &home));

    assert!(listing.multi_module);
    let rows: Vec<(&str, bool, bool)> = listing
        .modules
        .iter()
        .map(|m| (m.name.as_str(), m.publishable, m.selected))
        .collect();
    assert_eq!(
        rows,
        vec![("api", true, true), ("core", true, true), ("samples", false, false)]
    );
    assert_eq!(listing.publish_order, vec![":core", ":api"]);
    assert!(listing.problems.is_empty());
}

#[test]
fn test_render_project_pom_for_module() {
    let (_tmp, root, home) = setup(MANIFEST);
    let project = resolve(&root, &home);

    let xml = render_project_pom(&project, Some("api")).unwrap();
    assert!(xml.contains("<groupId>com.acme</groupId>"));
    assert!(xml.contains("<artifactId>api</artifactId>"));
    assert!(xml.contains("<version>1.0.0</version>"));
    assert!(xml.contains("<name>widgets</name>"));
    assert!(!xml.contains("s3cr3t"));

    let err = render_project_pom(&project, Some("missing")).unwrap_err();
    assert!(err.to_string().contains("No module named 'missing'"));
}

#[test]
fn test_render_project_pom_ambiguous_name_needs_gradle_path() {
    let (_tmp, root, home) = setup(MANIFEST);
    fs::write(
        root.join("settings.gradle.kts"),
        "rootProject.name = \"widgets\"\ninclude(\":server:api\", \":client:api\")\n",
    )
    .unwrap();
    for dir in ["server/api", "client/api"] {
        fs::create_dir_all(root.join(dir)).unwrap();
        fs::write(root.join(dir).join("build.gradle.kts"), "plugins { `maven-publish` }\n").unwrap();
    }
    let project = resolve(&root, &home);

    let err = render_project_pom(&project, Some("api")).unwrap_err();
    assert!(err.to_string().contains("ambiguous"), "{err}");

    let xml = render_project_pom(&project, Some(":client:api")).unwrap();
    assert!(xml.contains("<artifactId>client-api</artifactId>"), "{xml}");
}

#[test]
fn test_detect_reports_kind_and_modules() {
    let (_tmp, root, _home) = setup(MANIFEST);
    let report = detect_with(&root, &options());

    assert_eq!(report.kind, ProjectKind::Jvm);
    assert_eq!(report.group.as_deref(), Some("com.acme"));
    assert_eq!(report.version.as_deref(), Some("1.0.0"));
    assert_eq!(report.module_count, 3);
    assert_eq!(report.publishable, vec!["api", "core"]);
    assert_eq!(
        report.detectors,
        vec!["git", "project-info", "module-structure"]
    );
    assert!(report
        .detection
        .detected_values
        .contains_key("projectInfo.description"));
}
