use assert_cmd::Command;
use central_core::keys::RECOGNIZED_KEYS;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
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

[detection]
global-git = false
"#;

#[allow(deprecated)]
fn central_cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("central-publish").unwrap();
    for (key, _) in RECOGNIZED_KEYS {
        cmd.env_remove(key);
    }
    cmd.env("HOME", home)
        .env("GRADLE_USER_HOME", home.join(".gradle"))
        .env_remove("RUST_LOG");
    cmd
}

/// A three-module project: `api` depends on `core`, `samples` is not
/// publishable.
fn multi_module(manifest: &str) -> (TempDir, PathBuf, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("widgets");
    let home = tmp.path().join("home");
    fs::create_dir_all(&root).unwrap();
    fs::create_dir_all(&home).unwrap();
    fs::write(
        root.join("settings.gradle.kts"),
        "rootProject.name = \"widgets\"\ninclude(\"api\", \"core\", \"samples\")\n",
    )
    .unwrap();
    fs::write(
        root.join("build.gradle.kts"),
        "plugins {\n    kotlin(\"jvm\") version \"2.0.0\"\n}\n\ngroup = \"com.acme\"\nversion = \"1.0.0\"\n",
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
    (tmp, root, home)
}

#[test]
fn test_modules_lists_publish_order() {
    let (_tmp, root, home) = multi_module(MANIFEST);

    central_cmd(&home)
        .current_dir(&root)
        .args(["modules"])
        .assert()
        .success()
        .stdout(predicate::str::contains("multi-module"))
        .stdout(predicate::str::contains(":samples"))
        .stdout(predicate::str::contains("Publish order: :core, :api"));
}

#[test]
fn test_modules_reports_unmatched_selection() {
    let manifest = format!("{MANIFEST}\n[selection]\ninclude = [\"nope-*\"]\n");
    let (_tmp, root, home) = multi_module(&manifest);

    central_cmd(&home)
        .current_dir(&root)
        .args(["modules"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No module selected"))
        .stderr(predicate::str::contains("nope-*"));
}

#[test]
fn test_validate_fails_on_unmatched_selection() {
    let manifest = format!("{MANIFEST}\n[selection]\ninclude = [\"nope-*\"]\n");
    let (_tmp, root, home) = multi_module(&manifest);

    central_cmd(&home)
        .current_dir(&root)
        .args(["validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("SEL-UNMATCHED"));
}

#[test]
fn test_pom_for_module() {
    let (_tmp, root, home) = multi_module(MANIFEST);

    central_cmd(&home)
        .current_dir(&root)
        .args(["pom", "--module", "core"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<groupId>com.acme</groupId>"))
        .stdout(predicate::str::contains("<artifactId>core</artifactId>"))
        .stdout(predicate::str::contains("<name>widgets</name>"))
        .stdout(predicate::str::contains("<id>jdoe</id>"));
}

#[test]
fn test_pom_writes_output_file() {
    let (_tmp, root, home) = multi_module(MANIFEST);
    let out = root.join("pom-preview.xml");

    central_cmd(&home)
        .current_dir(&root)
        .args(["pom", "--output", "pom-preview.xml"])
        .assert()
        .success();

    let xml = fs::read_to_string(&out).unwrap();
    assert!(xml.contains("<artifactId>widgets</artifactId>"), "{xml}");
}

#[test]
fn test_pom_unknown_module_fails() {
    let (_tmp, root, home) = multi_module(MANIFEST);

    central_cmd(&home)
        .current_dir(&root)
        .args(["pom", "--module", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No module named 'ghost'"));
}

#[test]
fn test_plan_aggregates_publishable_modules() {
    let (_tmp, root, home) = multi_module(MANIFEST);

    central_cmd(&home)
        .current_dir(&root)
        .args(["plan"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deployment:  com.acme:widgets:1.0.0"))
        .stdout(predicate::str::contains("widgets-1.0.0-bundle.zip"))
        .stdout(predicate::str::contains("com.acme:core:1.0.0"))
        .stdout(predicate::str::contains("com.acme:samples").not());
}

#[test]
fn test_plan_exclude_flag_narrows_modules() {
    let (_tmp, root, home) = multi_module(MANIFEST);

    central_cmd(&home)
        .current_dir(&root)
        .args(["plan", "--exclude", "api", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"artifactId\": \"core\""))
        .stdout(predicate::str::contains("\"artifactId\": \"api\"").not());
}

#[test]
fn test_plan_lists_entries_with_sidecars() {
    let (_tmp, root, home) = multi_module(MANIFEST);

    central_cmd(&home)
        .current_dir(&root)
        .args(["plan", "--entries"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "com/acme/core/1.0.0/core-1.0.0.pom.asc",
        ));
}

#[test]
fn test_plan_refused_when_invalid() {
    let (_tmp, root, home) = multi_module("[detection]\nglobal-git = false\n");

    central_cmd(&home)
        .current_dir(&root)
        .args(["plan"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("REQ-CREDENTIALS_USERNAME"))
        .stderr(predicate::str::contains("Validation failed"));
}

#[test]
fn test_setup_requires_interactive_terminal() {
    let (_tmp, root, home) = multi_module(MANIFEST);

    central_cmd(&home)
        .current_dir(&root)
        .args(["setup"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("setup requires an interactive terminal"));

    let manifest = fs::read_to_string(root.join("central-publisher.toml")).unwrap();
    assert_eq!(manifest, MANIFEST, "setup must not touch the manifest");
}
