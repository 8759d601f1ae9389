use std::fs;
use std::time::Duration;

use central_core::environment::MapEnvironment;
use central_detect::selection::ModuleSelectionConfig;
use central_detect::{DetectionOptions, DetectorRegistry};
use central_ops::ops_modules::selection_for;
use central_ops::ops_publish::{plan_publish, PublishingType, UPLOAD_ENDPOINT};
use central_ops::ops_resolve::{resolve_with, ResolvedProject};
use central_ops::ops_validate::validate_project;
use central_resolve::manager::{ConfigSourceManager, FilePropertiesReader};
use central_validate::{ValidationResult, ValidationViolation};
use tempfile::TempDir;

const CREDENTIALS: &str = r#"
[credentials]
username = "token-user"
password = "s3cr3t-t0ken"

[project]
name = "widgets"
"#;

fn project(tmp: &TempDir, manifest: &str, modules: &[(&str, &str)]) -> ResolvedProject {
    let root = tmp.path().join("widgets");
    fs::create_dir_all(&root).unwrap();
    let includes: Vec<String> = modules.iter().map(|(m, _)| format!("\"{m}\"")).collect();
    if !modules.is_empty() {
        fs::write(
            root.join("settings.gradle.kts"),
            format!(
                "rootProject.name = \"widgets\"\ninclude({})\n",
                includes.join(", ")
            ),
        )
        .unwrap();
    }
    fs::write(
        root.join("build.gradle.kts"),
        "plugins {\n    `java-library`\n    `maven-publish`\n}\ngroup = \"com.acme\"\nversion = \"1.0.0\"\n",
    )
    .unwrap();
    for (module, script) in modules {
        fs::create_dir_all(root.join(module)).unwrap();
        fs::write(root.join(module).join("build.gradle.kts"), script).unwrap();
    }
    fs::write(root.join("central-publisher.toml"), manifest).unwrap();

    let manager = ConfigSourceManager::new(MapEnvironment::new(), FilePropertiesReader)
        .with_detectors(DetectorRegistry::standard(
            &DetectionOptions {
                git_timeout: Duration::from_secs(1),
                global_git: false,
            },
            None,
        ))
        .with_home(Some(tmp.path().join("home")));
    resolve_with(&root, &manager).unwrap()
}

const PUBLISHED: &str = "plugins {\n    `maven-publish`\n}\n";
const API: &str = "plugins {\n    `maven-publish`\n}\ndependencies {\n    api(project(\":core\"))\n}\n";

fn plan_for(project: &ResolvedProject) -> miette::Result<central_ops::ops_publish::PublishPlan> {
    let validation = validate_project(project).result;
    plan_publish(project, &validation, &selection_for(project))
}

#[test]
fn test_aggregated_plan_has_one_bundle_in_dependency_order() {
    let tmp = TempDir::new().unwrap();
    let project = project(&tmp, CREDENTIALS, &[("api", API), ("core", PUBLISHED)]);
    let plan = plan_for(&project).unwrap();

    assert!(plan.aggregated);
    assert_eq!(plan.endpoint, UPLOAD_ENDPOINT);
    assert_eq!(plan.publishing_type, PublishingType::UserManaged);
    assert!(!plan.dry_run);
    assert_eq!(plan.deployment_name, "com.acme:widgets:1.0.0");
    assert_eq!(plan.strategy, "jvm");

    let order: Vec<&str> = plan.modules.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(order, vec!["core", "api"]);

    assert_eq!(plan.bundles.len(), 1);
    let bundle = &plan.bundles[0];
    assert_eq!(bundle.file_name, "widgets-1.0.0-bundle.zip");
    assert_eq!(bundle.modules, vec![":core", ":api"]);
    for entry in [
        "com/acme/core/1.0.0/core-1.0.0.jar",
        "com/acme/core/1.0.0/core-1.0.0.jar.asc",
        "com/acme/api/1.0.0/api-1.0.0.pom.sha1",
        "com/acme/api/1.0.0/api-1.0.0-javadoc.jar.md5",
    ] {
        assert!(bundle.entries.iter().any(|e| e == entry), "missing {entry}");
    }
}

#[test]
fn test_plan_without_aggregation_has_bundle_per_module() {
    let tmp = TempDir::new().unwrap();
    let manifest = format!(
        "{CREDENTIALS}\n[publishing]\naggregation = false\nauto-publish = true\ndry-run = true\n"
    );
    let project = project(&tmp, &manifest, &[("api", API), ("core", PUBLISHED)]);
    let plan = plan_for(&project).unwrap();

    assert!(!plan.aggregated);
    assert_eq!(plan.publishing_type, PublishingType::Automatic);
    assert!(plan.dry_run);
    let files: Vec<&str> = plan.bundles.iter().map(|b| b.file_name.as_str()).collect();
    assert_eq!(files, vec!["core-1.0.0-bundle.zip", "api-1.0.0-bundle.zip"]);
    assert_eq!(plan.bundles[1].deployment_name, "com.acme:api:1.0.0");
}

#[test]
fn test_plan_single_module_project() {
    let tmp = TempDir::new().unwrap();
    let project = project(&tmp, CREDENTIALS, &[]);
    let plan = plan_for(&project).unwrap();

    assert!(!plan.aggregated);
    assert_eq!(plan.modules.len(), 1);
    assert_eq!(plan.modules[0].artifact_id, "widgets");
    assert_eq!(plan.bundles[0].file_name, "widgets-1.0.0-bundle.zip");
}

#[test]
fn test_plan_respects_selection() {
    let tmp = TempDir::new().unwrap();
    let project = project(&tmp, CREDENTIALS, &[("api", API), ("core", PUBLISHED)]);
    let validation = validate_project(&project).result;
    let selection = ModuleSelectionConfig::new().exclude("core");

    let plan = plan_publish(&project, &validation, &selection).unwrap();
    let order: Vec<&str> = plan.modules.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(order, vec!["api"]);
}

#[test]
fn test_plan_refuses_invalid_configuration() {
    let tmp = TempDir::new().unwrap();
    let project = project(&tmp, CREDENTIALS, &[("core", PUBLISHED)]);
    let validation = ValidationResult::from_violations(vec![
        ValidationViolation::error("REQ-CREDENTIALS_USERNAME", "credentials.username", "missing"),
        ValidationViolation::warning("SIG-KEY_MISSING", "signing.key", "missing"),
    ]);

    let err = plan_publish(&project, &validation, &ModuleSelectionConfig::new()).unwrap_err();
    assert!(
        err.to_string()
            .contains("Validation failed with 1 error(s) and 1 warning(s)"),
        "{err}"
    );
}

#[test]
fn test_plan_refuses_empty_selection() {
    let tmp = TempDir::new().unwrap();
    let project = project(&tmp, CREDENTIALS, &[("core", PUBLISHED)]);
    let validation = ValidationResult::new();
    let selection = ModuleSelectionConfig::new().include("nothing-*");

    let err = plan_publish(&project, &validation, &selection).unwrap_err();
    assert!(err.to_string().contains("No publishable module selected"));
}

#[test]
fn test_plan_requires_group() {
    let tmp = TempDir::new().unwrap();
    let project = project(&tmp, CREDENTIALS, &[("core", PUBLISHED)]);
    fs::write(
        project.root.join("build.gradle.kts"),
        "plugins {\n    `java-library`\n}\n",
    )
    .unwrap();

    let err = plan_publish(&project, &ValidationResult::new(), &ModuleSelectionConfig::new())
        .unwrap_err();
    assert!(err.to_string().contains("has no group"), "{err}");
}

#[test]
fn test_plan_keeps_same_name_modules_apart() {
    let tmp = TempDir::new().unwrap();
    let project = project(&tmp, CREDENTIALS, &[]);
    fs::write(
        project.root.join("settings.gradle.kts"),
        "rootProject.name = \"widgets\"\ninclude(\":server:api\", \":client:api\")\n",
    )
    .unwrap();
    for dir in ["server/api", "client/api"] {
        fs::create_dir_all(project.root.join(dir)).unwrap();
        fs::write(project.root.join(dir).join("build.gradle.kts"), PUBLISHED).unwrap();
    }

    let plan = plan_publish(&project, &ValidationResult::new(), &ModuleSelectionConfig::new())
        .unwrap();
    let paths: Vec<&str> = plan.modules.iter().map(|m| m.gradle_path.as_str()).collect();
    assert_eq!(paths, vec![":server:api", ":client:api"]);
    let artifacts: Vec<&str> = plan.modules.iter().map(|m| m.artifact_id.as_str()).collect();
    assert_eq!(artifacts, vec!["server-api", "client-api"]);

    let entries: Vec<&String> = plan.bundles.iter().flat_map(|b| &b.entries).collect();
    assert!(entries
        .iter()
        .any(|e| e.as_str() == "com/acme/server-api/1.0.0/server-api-1.0.0.pom"));
    assert!(entries
        .iter()
        .any(|e| e.as_str() == "com/acme/client-api/1.0.0/client-api-1.0.0.pom"));
}
