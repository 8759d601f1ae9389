use central_core::keys::{config_from_keys, GRADLE_SIGNING_KEYS, RECOGNIZED_KEYS};
use std::collections::BTreeMap;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: BTreeMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_recognized_keys_map_to_paths() {
    let keyed = config_from_keys(
        RECOGNIZED_KEYS,
        lookup(&[
            ("SONATYPE_USERNAME", "user"),
            ("SONATYPE_PASSWORD", "pass"),
            ("SIGNING_KEY", "armored"),
            ("POM_DEVELOPER_NAME", "Jane"),
            ("CENTRAL_DRY_RUN", "yes"),
        ]),
    );
    let config = keyed.config;
    assert_eq!(config.credentials.username, "user");
    assert_eq!(config.credentials.password, "pass");
    assert_eq!(config.signing.key, "armored");
    assert_eq!(config.project_info.developers[0].name, "Jane");
    assert!(config.publishing.dry_run.is_enabled());
    assert_eq!(keyed.supplied.len(), 5);
    assert!(keyed
        .supplied
        .contains(&("credentials.username".to_string(), "SONATYPE_USERNAME".to_string())));
}

#[test]
fn test_blank_and_unparseable_values_contribute_nothing() {
    let keyed = config_from_keys(
        RECOGNIZED_KEYS,
        lookup(&[("SONATYPE_USERNAME", "   "), ("CENTRAL_AUTO_PUBLISH", "perhaps")]),
    );
    assert!(keyed.supplied.is_empty());
    assert!(!keyed.config.publishing.auto_publish.is_set());
}

#[test]
fn test_gradle_signing_keys() {
    let keyed = config_from_keys(
        GRADLE_SIGNING_KEYS,
        lookup(&[("signing.keyId", "ABCDEF12"), ("signing.password", "pw")]),
    );
    assert_eq!(keyed.config.signing.key_id, "ABCDEF12");
    assert_eq!(keyed.config.signing.password, "pw");
}

#[test]
fn test_first_key_for_a_path_wins() {
    let table = [
        ("PRIMARY", "credentials.username"),
        ("SECONDARY", "credentials.username"),
    ];
    let keyed = config_from_keys(&table, lookup(&[("PRIMARY", "a"), ("SECONDARY", "b")]));
    assert_eq!(keyed.config.credentials.username, "a");
    assert_eq!(keyed.supplied.len(), 1);
}
