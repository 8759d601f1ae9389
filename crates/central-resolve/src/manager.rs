//! The configuration source manager.
//!
//! Sources are layered in strict precedence order:
//!
//! 1. the DSL (`central-publisher.toml`),
//! 2. environment variables,
//! 3. the project's `gradle.properties`,
//! 4. the user-level `gradle.properties`,
//! 5. auto-detection,
//! 6. smart defaults.
//!
//! Each layer only fills fields left blank by the layers above it. The
//! manager records, for every resolved field, the one layer that supplied
//! its value.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use central_core::cache::FileCache;
use central_core::environment::{EnvironmentProvider, ProcessEnvironment};
use central_core::keys::{config_from_keys, KeyedConfig, GRADLE_SIGNING_KEYS, RECOGNIZED_KEYS};
use central_core::manifest::{DetectionSettings, MANIFEST_FILE};
use central_core::merge::merge_all;
use central_core::model::{provenance_key, CentralPublisherConfig};
use central_core::project_kind::ProjectKind;
use central_core::properties::{
    global_properties_path, load_properties, parse_properties, PROPERTIES_FILE,
};
use central_detect::{DetectionOptions, DetectionResult, DetectorRegistry};

use crate::defaults::{ProjectContext, SmartDefaults};
use crate::provenance::{ConfigSource, Provenance};

/// Reads `KEY=value` files.
pub trait PropertiesReader: Send + Sync {
    /// Missing or unreadable files yield an empty map.
    fn read(&self, path: &Path) -> BTreeMap<String, String>;
}

/// Reads straight from disk on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilePropertiesReader;

impl PropertiesReader for FilePropertiesReader {
    fn read(&self, path: &Path) -> BTreeMap<String, String> {
        load_properties(path)
    }
}

/// Reads through a shared [`FileCache`].
#[derive(Debug, Clone, Default)]
pub struct CachedPropertiesReader {
    cache: Arc<FileCache>,
}

impl CachedPropertiesReader {
    pub fn new(cache: Arc<FileCache>) -> Self {
        Self { cache }
    }
}

impl PropertiesReader for CachedPropertiesReader {
    fn read(&self, path: &Path) -> BTreeMap<String, String> {
        self.cache
            .read(path)
            .map(|content| parse_properties(&content))
            .unwrap_or_default()
    }
}

/// The outcome of one resolution pass.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub config: CentralPublisherConfig,
    pub provenance: Provenance,
    /// Combined auto-detection output, when detection ran.
    pub detection: Option<DetectionResult>,
    pub kind: ProjectKind,
    /// Smart default providers that applied, highest priority first.
    pub defaults_applied: Vec<&'static str>,
    pub warnings: Vec<String>,
}

/// One precedence layer and the origin of each of its fields.
struct Layer {
    source: ConfigSource,
    config: CentralPublisherConfig,
    /// Leaf path to origin detail. Falls back to `default_detail`.
    details: BTreeMap<String, String>,
    default_detail: String,
}

impl Layer {
    fn new(source: ConfigSource, config: CentralPublisherConfig, detail: impl Into<String>) -> Self {
        Self {
            source,
            config,
            details: BTreeMap::new(),
            default_detail: detail.into(),
        }
    }

    fn from_keys(source: ConfigSource, keyed: KeyedConfig, origin: &str) -> Self {
        let mut layer = Self::new(source, keyed.config, origin);
        for (path, key) in keyed.supplied {
            layer.details.insert(path, format!("{key} ({origin})"));
        }
        layer
    }

    fn detail(&self, path: &str) -> String {
        self.details
            .get(path)
            .cloned()
            .unwrap_or_else(|| self.default_detail.clone())
    }
}

/// Merges every configuration source into one resolved config.
pub struct ConfigSourceManager {
    environment: Box<dyn EnvironmentProvider>,
    properties: Box<dyn PropertiesReader>,
    detectors: DetectorRegistry,
    defaults: SmartDefaults,
    detection_enabled: bool,
    home: Option<PathBuf>,
}

impl ConfigSourceManager {
    /// A manager with the given environment and properties reader, no
    /// detectors and the standard smart defaults.
    pub fn new(
        environment: impl EnvironmentProvider + 'static,
        properties: impl PropertiesReader + 'static,
    ) -> Self {
        Self {
            environment: Box::new(environment),
            properties: Box::new(properties),
            detectors: DetectorRegistry::new(),
            defaults: SmartDefaults::standard(),
            detection_enabled: true,
            home: None,
        }
    }

    /// Process environment, cached properties files, the standard detectors
    /// configured by `settings`, and the user's home directory.
    pub fn standard(settings: &DetectionSettings) -> Self {
        let cache = Arc::new(FileCache::new());
        let options = DetectionOptions {
            git_timeout: Duration::from_secs(settings.git_timeout_secs),
            global_git: settings.global_git,
        };
        Self::new(ProcessEnvironment, CachedPropertiesReader::new(Arc::clone(&cache)))
            .with_detectors(DetectorRegistry::standard(&options, Some(cache)))
            .with_detection(settings.enabled)
            .with_home(central_util::fs::user_home())
    }

    pub fn with_detectors(mut self, detectors: DetectorRegistry) -> Self {
        self.detectors = detectors;
        self
    }

    pub fn with_defaults(mut self, defaults: SmartDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_detection(mut self, enabled: bool) -> Self {
        self.detection_enabled = enabled;
        self
    }

    /// Home directory used for the user-level properties file and the
    /// default keyring path.
    pub fn with_home(mut self, home: Option<PathBuf>) -> Self {
        self.home = home;
        self
    }

    /// The user-level properties file, honoring `GRADLE_USER_HOME`.
    pub fn global_properties_file(&self) -> Option<PathBuf> {
        let gradle_user_home = self.environment.var("GRADLE_USER_HOME");
        global_properties_path(gradle_user_home.as_deref(), self.home.as_deref())
    }

    /// Resolve the configuration for the project at `project_root`.
    pub fn resolve(
        &self,
        project_root: &Path,
        dsl: Option<&CentralPublisherConfig>,
    ) -> Resolution {
        let mut layers = Vec::new();
        let mut warnings = Vec::new();

        layers.push(Layer::new(
            ConfigSource::Dsl,
            dsl.cloned().unwrap_or_default(),
            MANIFEST_FILE,
        ));

        let env = config_from_keys(RECOGNIZED_KEYS, |key| self.environment.var(key));
        layers.push(Layer::from_keys(ConfigSource::Environment, env, "environment"));

        let property_keys: Vec<(&str, &str)> = RECOGNIZED_KEYS
            .iter()
            .chain(GRADLE_SIGNING_KEYS)
            .copied()
            .collect();

        let local_file = project_root.join(PROPERTIES_FILE);
        let local = self.properties.read(&local_file);
        let local = config_from_keys(&property_keys, |key| local.get(key).cloned());
        layers.push(Layer::from_keys(
            ConfigSource::LocalProperties,
            local,
            &local_file.display().to_string(),
        ));

        match self.global_properties_file() {
            Some(global_file) => {
                let global = self.properties.read(&global_file);
                let global = config_from_keys(&property_keys, |key| global.get(key).cloned());
                layers.push(Layer::from_keys(
                    ConfigSource::GlobalProperties,
                    global,
                    &global_file.display().to_string(),
                ));
            }
            None => tracing::debug!("No home directory; skipping global properties"),
        }

        let detection = if self.detection_enabled {
            let detected = self.detectors.detect_all(project_root);
            let mut layer = Layer::new(
                ConfigSource::AutoDetected,
                detected.config.clone(),
                "auto-detection",
            );
            for value in detected.detected_values.values() {
                layer.details.insert(
                    value.path.clone(),
                    format!("{} ({})", value.source, value.confidence),
                );
            }
            layers.push(layer);
            warnings.extend(detected.warnings.iter().cloned());
            Some(detected)
        } else {
            tracing::debug!("Auto-detection disabled");
            None
        };

        let upper: CentralPublisherConfig = merge_all(layers.iter().map(|l| &l.config));
        let project = ProjectContext::inspect(project_root, self.home.clone());
        let contributions = self.defaults.contributions(&project, &upper);
        let defaults_applied = contributions.iter().map(|c| c.provider).collect();
        for contribution in contributions {
            layers.push(Layer::new(
                ConfigSource::SmartDefault,
                contribution.config,
                contribution.provider,
            ));
        }

        let config: CentralPublisherConfig = merge_all(layers.iter().map(|l| &l.config));
        let provenance = trace(&config, &layers);

        for source in ConfigSource::ALL {
            let fields = provenance.fields_from(source);
            if !fields.is_empty() {
                tracing::debug!("{source} supplied {}", fields.join(", "));
            }
        }
        tracing::info!(
            "Resolved {} field(s) for {} project at {}",
            provenance.len(),
            project.kind,
            project_root.display()
        );

        Resolution {
            config,
            provenance,
            detection,
            kind: project.kind,
            defaults_applied,
            warnings,
        }
    }
}

/// Attribute every non-blank leaf of `config` to the first layer that has a
/// value for it.
fn trace(config: &CentralPublisherConfig, layers: &[Layer]) -> Provenance {
    let layer_keys: Vec<BTreeSet<String>> = layers
        .iter()
        .map(|l| {
            l.config
                .leaves()
                .into_iter()
                .map(|(path, _)| provenance_key(&path).to_string())
                .collect()
        })
        .collect();

    let mut provenance = Provenance::new();
    for (path, _) in config.leaves() {
        let key = provenance_key(&path);
        if provenance.source_of(key).is_some() {
            continue;
        }
        match layers
            .iter()
            .zip(&layer_keys)
            .find(|(_, keys)| keys.contains(key))
        {
            Some((layer, _)) => provenance.record(&path, layer.source, layer.detail(&path)),
            None => tracing::debug!("No source found for {path}"),
        }
    }
    provenance
}
