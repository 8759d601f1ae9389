//! Per-field record of which source supplied each resolved value.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use central_core::model::provenance_key;

/// Configuration layers, highest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfigSource {
    /// `central-publisher.toml`.
    Dsl,
    Environment,
    /// `gradle.properties` in the project root.
    LocalProperties,
    /// The user-level `gradle.properties`.
    GlobalProperties,
    AutoDetected,
    SmartDefault,
}

impl ConfigSource {
    pub const ALL: [ConfigSource; 6] = [
        ConfigSource::Dsl,
        ConfigSource::Environment,
        ConfigSource::LocalProperties,
        ConfigSource::GlobalProperties,
        ConfigSource::AutoDetected,
        ConfigSource::SmartDefault,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigSource::Dsl => "dsl",
            ConfigSource::Environment => "environment",
            ConfigSource::LocalProperties => "local-properties",
            ConfigSource::GlobalProperties => "global-properties",
            ConfigSource::AutoDetected => "auto-detected",
            ConfigSource::SmartDefault => "smart-default",
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where one field's final value came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSource {
    pub source: ConfigSource,
    /// Finer-grained origin: the key name, file or provider.
    pub detail: String,
}

/// Field path to contributing source. Developer leaves share the single
/// key `projectInfo.developers`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Provenance {
    fields: BTreeMap<String, FieldSource>,
}

impl Provenance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path` unless it already has a source.
    pub fn record(&mut self, path: &str, source: ConfigSource, detail: impl Into<String>) {
        self.fields
            .entry(provenance_key(path).to_string())
            .or_insert_with(|| FieldSource {
                source,
                detail: detail.into(),
            });
    }

    /// Source of a field. Accepts leaf paths such as
    /// `projectInfo.developers[0].email`.
    pub fn source_of(&self, path: &str) -> Option<&FieldSource> {
        self.fields.get(provenance_key(path))
    }

    /// Fields supplied by `source`, sorted.
    pub fn fields_from(&self, source: ConfigSource) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(_, s)| s.source == source)
            .map(|(p, _)| p.as_str())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSource)> {
        self.fields.iter().map(|(p, s)| (p.as_str(), s))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
