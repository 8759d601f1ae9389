use central_core::environment::MapEnvironment;
use central_core::model::{CentralPublisherConfig, Flag};
use central_core::project_kind::ProjectKind;
use central_detect::{Confidence, DetectionResult, Detector, DetectorRegistry};
use central_resolve::manager::{ConfigSourceManager, FilePropertiesReader};
use central_resolve::{ConfigSource, SmartDefaults};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Stub(Vec<(&'static str, &'static str)>);

impl Detector for Stub {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn detect(&self, _project_root: &Path) -> Option<DetectionResult> {
        let mut result = DetectionResult::new();
        for (path, value) in &self.0 {
            result.record(path, value, ".git/config", Confidence::High);
        }
        Some(result)
    }
}

struct Fixture {
    _tmp: TempDir,
    root: PathBuf,
    home: PathBuf,
}

fn fixture() -> Fixture {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("project");
    let home = tmp.path().join("home");
    fs::create_dir_all(&root).unwrap();
    fs::create_dir_all(home.join(".gradle")).unwrap();
    Fixture {
        _tmp: tmp,
        root,
        home,
    }
}

fn manager(env: MapEnvironment, home: &Path) -> ConfigSourceManager {
    ConfigSourceManager::new(env, FilePropertiesReader).with_home(Some(home.to_path_buf()))
}

#[test]
fn test_precedence_dsl_env_local_global() {
    let fx = fixture();
    fs::write(
        fx.root.join("gradle.properties"),
        "SONATYPE_USERNAME=local-user\nSONATYPE_PASSWORD=local-pass\nPOM_DESCRIPTION=from local\n",
    )
    .unwrap();
    fs::write(
        fx.home.join(".gradle/gradle.properties"),
        "SONATYPE_PASSWORD=global-pass\nSIGNING_PASSWORD=global-signing\nPOM_URL=https://global.example.com\n",
    )
    .unwrap();
    let env = MapEnvironment::new().with("SONATYPE_USERNAME", "env-user");

    let mut dsl = CentralPublisherConfig::default();
    dsl.project_info.name = "from-dsl".into();

    let resolution = manager(env, &fx.home).resolve(&fx.root, Some(&dsl));
    let config = &resolution.config;
    assert_eq!(config.project_info.name, "from-dsl");
    assert_eq!(config.credentials.username, "env-user");
    assert_eq!(config.credentials.password, "local-pass");
    assert_eq!(config.signing.password, "global-signing");
    assert_eq!(config.project_info.description, "from local");
    assert_eq!(config.project_info.url, "https://global.example.com");

    let p = &resolution.provenance;
    assert_eq!(p.source_of("projectInfo.name").unwrap().source, ConfigSource::Dsl);
    let username = p.source_of("credentials.username").unwrap();
    assert_eq!(username.source, ConfigSource::Environment);
    assert!(username.detail.starts_with("SONATYPE_USERNAME"));
    assert_eq!(
        p.source_of("credentials.password").unwrap().source,
        ConfigSource::LocalProperties
    );
    assert_eq!(
        p.source_of("signing.password").unwrap().source,
        ConfigSource::GlobalProperties
    );
}

#[test]
fn test_gradle_user_home_overrides_home() {
    let fx = fixture();
    let gradle_home = fx.home.join("custom-gradle");
    fs::create_dir_all(&gradle_home).unwrap();
    fs::write(gradle_home.join("gradle.properties"), "SONATYPE_USERNAME=custom\n").unwrap();
    fs::write(
        fx.home.join(".gradle/gradle.properties"),
        "SONATYPE_USERNAME=default-home\n",
    )
    .unwrap();
    let env = MapEnvironment::new().with("GRADLE_USER_HOME", gradle_home.display().to_string());

    let resolution = manager(env, &fx.home).resolve(&fx.root, None);
    assert_eq!(resolution.config.credentials.username, "custom");
}

#[test]
fn test_gradle_signing_spellings_in_properties() {
    let fx = fixture();
    fs::write(
        fx.root.join("gradle.properties"),
        "signing.keyId=ABCDEF12\nsigning.secretKeyRingFile=/keys/ring.gpg\n",
    )
    .unwrap();
    let resolution = manager(MapEnvironment::new(), &fx.home).resolve(&fx.root, None);
    assert_eq!(resolution.config.signing.key_id, "ABCDEF12");
    assert_eq!(resolution.config.signing.secret_key_ring_file, "/keys/ring.gpg");
}

#[test]
fn test_detection_fills_gaps_but_never_overrides() {
    let fx = fixture();
    let env = MapEnvironment::new().with("POM_URL", "https://github.com/acme/explicit");
    let detectors = DetectorRegistry::new().register(Stub(vec![
        ("projectInfo.url", "https://github.com/acme/detected"),
        ("projectInfo.scm.url", "https://github.com/acme/detected"),
    ]));

    let resolution = manager(env, &fx.home)
        .with_detectors(detectors)
        .resolve(&fx.root, None);

    assert_eq!(resolution.config.project_info.url, "https://github.com/acme/explicit");
    assert_eq!(
        resolution.config.project_info.scm.url,
        "https://github.com/acme/detected"
    );
    let scm = resolution.provenance.source_of("projectInfo.scm.url").unwrap();
    assert_eq!(scm.source, ConfigSource::AutoDetected);
    assert!(scm.detail.contains(".git/config"));
    assert!(resolution.detection.is_some());
}

#[test]
fn test_detection_disabled() {
    let fx = fixture();
    let detectors =
        DetectorRegistry::new().register(Stub(vec![("projectInfo.name", "detected")]));
    let resolution = manager(MapEnvironment::new(), &fx.home)
        .with_detectors(detectors)
        .with_detection(false)
        .resolve(&fx.root, None);
    assert!(resolution.config.project_info.name.is_empty());
    assert!(resolution.detection.is_none());
}

#[test]
fn test_smart_defaults_are_the_last_layer() {
    let fx = fixture();
    fs::write(fx.root.join("build.gradle.kts"), "plugins { kotlin(\"jvm\") }\n").unwrap();
    let env = MapEnvironment::new()
        .with("CENTRAL_AUTO_PUBLISH", "true")
        .with("POM_LICENSE_NAME", "MIT");

    let resolution = manager(env, &fx.home).resolve(&fx.root, None);
    let config = &resolution.config;
    assert_eq!(resolution.kind, ProjectKind::Jvm);
    assert_eq!(config.publishing.auto_publish, Flag::set(true));
    assert_eq!(config.publishing.aggregation, Flag::set(true));
    assert_eq!(config.project_info.license.name, "MIT");
    assert_eq!(config.project_info.license.distribution, "repo");
    assert!(config.credentials.username.is_empty());

    let p = &resolution.provenance;
    let aggregation = p.source_of("publishing.aggregation").unwrap();
    assert_eq!(aggregation.source, ConfigSource::SmartDefault);
    assert_eq!(aggregation.detail, "generic");
    assert_eq!(
        p.source_of("projectInfo.license.distribution").unwrap().detail,
        "jvm"
    );
    assert!(resolution.defaults_applied.contains(&"jvm"));
}

#[test]
fn test_explicit_false_beats_default_true() {
    let fx = fixture();
    let mut dsl = CentralPublisherConfig::default();
    dsl.publishing.aggregation = Flag::set(false);

    let resolution = manager(MapEnvironment::new(), &fx.home).resolve(&fx.root, Some(&dsl));
    assert_eq!(resolution.config.publishing.aggregation, Flag::set(false));
}

#[test]
fn test_every_resolved_field_has_exactly_one_source() {
    let fx = fixture();
    fs::write(fx.root.join("gradle.properties"), "POM_DEVELOPER_ID=jdoe\n").unwrap();
    let env = MapEnvironment::new()
        .with("SONATYPE_USERNAME", "user")
        .with("POM_DEVELOPER_NAME", "Jane");

    let resolution = manager(env, &fx.home)
        .with_defaults(SmartDefaults::standard())
        .resolve(&fx.root, None);

    for (path, _) in resolution.config.leaves() {
        assert!(
            resolution.provenance.source_of(&path).is_some(),
            "{path} has no recorded source"
        );
    }
    // The developer list is taken whole from the environment.
    assert_eq!(resolution.config.project_info.developers[0].name, "Jane");
    assert!(resolution.config.project_info.developers[0].id.is_empty());
    assert_eq!(
        resolution
            .provenance
            .source_of("projectInfo.developers[0].name")
            .unwrap()
            .source,
        ConfigSource::Environment
    );
}

#[test]
fn test_unparseable_boolean_contributes_nothing() {
    let fx = fixture();
    let env = MapEnvironment::new().with("CENTRAL_DRY_RUN", "maybe");
    let resolution = manager(env, &fx.home).resolve(&fx.root, None);
    assert_eq!(resolution.config.publishing.dry_run, Flag::set(false));
    assert_eq!(
        resolution.provenance.source_of("publishing.dryRun").unwrap().source,
        ConfigSource::SmartDefault
    );
}
