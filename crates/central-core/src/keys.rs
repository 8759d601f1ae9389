//! Recognized property and environment keys.
//!
//! Properties files and the process environment share one naming
//! convention. Each recognized key maps to exactly one dotted config path.

use crate::model::CentralPublisherConfig;

/// Keys accepted in both properties files and the environment.
pub const RECOGNIZED_KEYS: &[(&str, &str)] = &[
    ("SONATYPE_USERNAME", "credentials.username"),
    ("SONATYPE_PASSWORD", "credentials.password"),
    ("SIGNING_KEY", "signing.key"),
    ("SIGNING_PASSWORD", "signing.password"),
    ("SIGNING_KEY_ID", "signing.keyId"),
    ("SIGNING_SECRET_KEY_RING_FILE", "signing.secretKeyRingFile"),
    ("POM_NAME", "projectInfo.name"),
    ("POM_DESCRIPTION", "projectInfo.description"),
    ("POM_URL", "projectInfo.url"),
    ("POM_LICENSE_NAME", "projectInfo.license.name"),
    ("POM_LICENSE_URL", "projectInfo.license.url"),
    ("POM_LICENSE_DIST", "projectInfo.license.distribution"),
    ("POM_SCM_URL", "projectInfo.scm.url"),
    ("POM_SCM_CONNECTION", "projectInfo.scm.connection"),
    ("POM_SCM_DEV_CONNECTION", "projectInfo.scm.developerConnection"),
    ("POM_DEVELOPER_ID", "projectInfo.developers[0].id"),
    ("POM_DEVELOPER_NAME", "projectInfo.developers[0].name"),
    ("POM_DEVELOPER_EMAIL", "projectInfo.developers[0].email"),
    ("CENTRAL_AUTO_PUBLISH", "publishing.autoPublish"),
    ("CENTRAL_AGGREGATION", "publishing.aggregation"),
    ("CENTRAL_DRY_RUN", "publishing.dryRun"),
    ("CENTRAL_EXCLUDE_MODULES", "publishing.excludeModules"),
];

/// Gradle signing-plugin spellings, accepted in properties files only.
pub const GRADLE_SIGNING_KEYS: &[(&str, &str)] = &[
    ("signing.keyId", "signing.keyId"),
    ("signing.password", "signing.password"),
    ("signing.secretKeyRingFile", "signing.secretKeyRingFile"),
];

/// A partial config built from key lookups, plus which key supplied each path.
#[derive(Debug, Clone, Default)]
pub struct KeyedConfig {
    pub config: CentralPublisherConfig,
    /// `(dotted path, key)` for every key that contributed a value.
    pub supplied: Vec<(String, String)>,
}

/// Build a partial config by looking up every key in `table`.
///
/// Blank values and unparseable booleans contribute nothing. When two keys
/// map to the same path the first one in `table` wins.
pub fn config_from_keys<F>(table: &[(&str, &str)], lookup: F) -> KeyedConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut keyed = KeyedConfig::default();
    for (key, path) in table {
        if keyed.supplied.iter().any(|(p, _)| p == path) {
            continue;
        }
        let Some(value) = lookup(key) else {
            continue;
        };
        if value.trim().is_empty() {
            continue;
        }
        if keyed.config.set_field(path, &value) {
            keyed.supplied.push((path.to_string(), key.to_string()));
        } else {
            tracing::warn!("Ignoring unparseable value for {key}");
        }
    }
    keyed
}
