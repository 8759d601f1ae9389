//! Smart defaults: conservative values used only where every other source
//! left a field blank.
//!
//! Providers are ordered by priority. When two providers supply the same
//! field the higher-priority one wins; neither ever overwrites a value that
//! came from a real source. No provider may supply a secret.

use std::path::{Path, PathBuf};

use central_core::merge::FillBlanks;
use central_core::model::{
    CentralPublisherConfig, Flag, LicenseInfo, ProjectInfo, PublishingOptions, ScmInfo,
    SigningConfig,
};
use central_core::project_kind::ProjectKind;
use central_detect::git::normalize_remote_url;

pub const PRIORITY_GENERIC: u32 = 10;
pub const PRIORITY_DERIVED: u32 = 30;
pub const PRIORITY_LANGUAGE: u32 = 50;
pub const PRIORITY_FRAMEWORK: u32 = 100;

pub const APACHE_LICENSE_NAME: &str = "The Apache License, Version 2.0";
pub const APACHE_LICENSE_URL: &str = "https://www.apache.org/licenses/LICENSE-2.0.txt";
pub const LICENSE_DISTRIBUTION: &str = "repo";

/// Hosts whose project URLs double as git remotes.
const KNOWN_GIT_HOSTS: &[&str] = &["github.com", "gitlab.com", "bitbucket.org", "codeberg.org"];

/// What providers know about the project being resolved.
#[derive(Debug, Clone, Default)]
pub struct ProjectContext {
    pub root: PathBuf,
    pub kind: ProjectKind,
    pub is_multi_module: bool,
    pub home: Option<PathBuf>,
}

impl ProjectContext {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: ProjectKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_home(mut self, home: Option<PathBuf>) -> Self {
        self.home = home;
        self
    }

    pub fn multi_module(mut self, is_multi_module: bool) -> Self {
        self.is_multi_module = is_multi_module;
        self
    }

    /// Inspect the project on disk for its kind and module layout.
    pub fn inspect(root: &Path, home: Option<PathBuf>) -> Self {
        let structure = central_detect::modules::ModuleStructureDetector::analyze(root);
        Self::new(root)
            .with_kind(central_detect::project_kind::detect_project_kind(root))
            .multi_module(structure.is_multi_module)
            .with_home(home)
    }
}

pub trait SmartDefaultProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn priority(&self) -> u32;

    fn can_provide_defaults(&self, project: &ProjectContext) -> bool;

    /// A partial config of fallback values. `existing` is everything the
    /// higher-precedence sources resolved so far.
    fn provide_defaults(
        &self,
        project: &ProjectContext,
        existing: &CentralPublisherConfig,
    ) -> CentralPublisherConfig;
}

/// Apache-2.0 license, conservative publishing flags and the default GPG
/// keyring location.
pub struct GenericDefaultsProvider;

impl SmartDefaultProvider for GenericDefaultsProvider {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn priority(&self) -> u32 {
        PRIORITY_GENERIC
    }

    fn can_provide_defaults(&self, _project: &ProjectContext) -> bool {
        true
    }

    fn provide_defaults(
        &self,
        project: &ProjectContext,
        _existing: &CentralPublisherConfig,
    ) -> CentralPublisherConfig {
        let keyring = project
            .home
            .as_ref()
            .map(|h| h.join(".gnupg").join("secring.gpg").display().to_string())
            .unwrap_or_default();

        CentralPublisherConfig {
            project_info: ProjectInfo {
                license: LicenseInfo {
                    name: APACHE_LICENSE_NAME.to_string(),
                    url: APACHE_LICENSE_URL.to_string(),
                    distribution: LICENSE_DISTRIBUTION.to_string(),
                    comments: None,
                },
                ..ProjectInfo::default()
            },
            signing: SigningConfig {
                secret_key_ring_file: keyring,
                ..SigningConfig::default()
            },
            publishing: PublishingOptions {
                auto_publish: Flag::set(false),
                aggregation: Flag::set(true),
                dry_run: Flag::set(false),
                ..PublishingOptions::default()
            },
            ..CentralPublisherConfig::default()
        }
    }
}

/// Derives the SCM block from a project URL on a well-known git host.
pub struct ScmFromUrlDefaultsProvider;

impl SmartDefaultProvider for ScmFromUrlDefaultsProvider {
    fn name(&self) -> &'static str {
        "scm-from-url"
    }

    fn priority(&self) -> u32 {
        PRIORITY_DERIVED
    }

    fn can_provide_defaults(&self, _project: &ProjectContext) -> bool {
        true
    }

    fn provide_defaults(
        &self,
        _project: &ProjectContext,
        existing: &CentralPublisherConfig,
    ) -> CentralPublisherConfig {
        let info = &existing.project_info;
        if !info.scm.is_blank() {
            return CentralPublisherConfig::default();
        }
        let Some(urls) = normalize_remote_url(&info.url) else {
            return CentralPublisherConfig::default();
        };
        if !KNOWN_GIT_HOSTS.contains(&urls.host.as_str()) {
            return CentralPublisherConfig::default();
        }
        CentralPublisherConfig {
            project_info: ProjectInfo {
                scm: ScmInfo {
                    url: urls.project_url,
                    connection: urls.connection,
                    developer_connection: urls.developer_connection,
                },
                ..ProjectInfo::default()
            },
            ..CentralPublisherConfig::default()
        }
    }
}

/// Kotlin Multiplatform projects publish one aggregated deployment.
pub struct KotlinMultiplatformDefaultsProvider;

impl SmartDefaultProvider for KotlinMultiplatformDefaultsProvider {
    fn name(&self) -> &'static str {
        "kotlin-multiplatform"
    }

    fn priority(&self) -> u32 {
        PRIORITY_LANGUAGE
    }

    fn can_provide_defaults(&self, project: &ProjectContext) -> bool {
        project.kind == ProjectKind::KotlinMultiplatform
    }

    fn provide_defaults(
        &self,
        _project: &ProjectContext,
        _existing: &CentralPublisherConfig,
    ) -> CentralPublisherConfig {
        let mut config = distribution_only();
        config.publishing.aggregation = Flag::set(true);
        config
    }
}

pub struct JvmDefaultsProvider;

impl SmartDefaultProvider for JvmDefaultsProvider {
    fn name(&self) -> &'static str {
        "jvm"
    }

    fn priority(&self) -> u32 {
        PRIORITY_LANGUAGE
    }

    fn can_provide_defaults(&self, project: &ProjectContext) -> bool {
        project.kind == ProjectKind::Jvm
    }

    fn provide_defaults(
        &self,
        _project: &ProjectContext,
        _existing: &CentralPublisherConfig,
    ) -> CentralPublisherConfig {
        distribution_only()
    }
}

fn distribution_only() -> CentralPublisherConfig {
    let mut config = CentralPublisherConfig::default();
    config.project_info.license.distribution = LICENSE_DISTRIBUTION.to_string();
    config
}

/// The defaults one provider contributed.
#[derive(Debug, Clone)]
pub struct ProviderDefaults {
    pub provider: &'static str,
    pub priority: u32,
    pub config: CentralPublisherConfig,
}

/// Priority-ordered provider registry.
#[derive(Default)]
pub struct SmartDefaults {
    providers: Vec<Box<dyn SmartDefaultProvider>>,
}

impl SmartDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generic, SCM-from-URL, Kotlin Multiplatform and JVM providers.
    pub fn standard() -> Self {
        Self::new()
            .register(GenericDefaultsProvider)
            .register(ScmFromUrlDefaultsProvider)
            .register(KotlinMultiplatformDefaultsProvider)
            .register(JvmDefaultsProvider)
    }

    pub fn register(mut self, provider: impl SmartDefaultProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Provider names, highest priority first. Equal priorities keep
    /// registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.ordered().iter().map(|p| p.name()).collect()
    }

    fn ordered(&self) -> Vec<&dyn SmartDefaultProvider> {
        let mut providers: Vec<&dyn SmartDefaultProvider> =
            self.providers.iter().map(|p| p.as_ref()).collect();
        providers.sort_by(|a, b| b.priority().cmp(&a.priority()));
        providers
    }

    /// Run every applicable provider, highest priority first.
    pub fn contributions(
        &self,
        project: &ProjectContext,
        existing: &CentralPublisherConfig,
    ) -> Vec<ProviderDefaults> {
        self.ordered()
            .into_iter()
            .filter(|p| p.can_provide_defaults(project))
            .map(|p| {
                let mut config = p.provide_defaults(project, existing);
                strip_secrets(&mut config);
                tracing::debug!("Smart defaults from {} (priority {})", p.name(), p.priority());
                ProviderDefaults {
                    provider: p.name(),
                    priority: p.priority(),
                    config,
                }
            })
            .collect()
    }

    /// All applicable defaults merged into one partial config.
    pub fn provide(
        &self,
        project: &ProjectContext,
        existing: &CentralPublisherConfig,
    ) -> CentralPublisherConfig {
        self.contributions(project, existing)
            .iter()
            .fold(CentralPublisherConfig::default(), |acc, d| {
                acc.fill_blanks(&d.config)
            })
    }
}

fn strip_secrets(config: &mut CentralPublisherConfig) {
    let had_secret = !config.credentials.username.is_empty()
        || !config.credentials.password.is_empty()
        || !config.signing.key.is_empty()
        || !config.signing.key_id.is_empty()
        || !config.signing.password.is_empty();
    if had_secret {
        tracing::warn!("Discarding secret values supplied as smart defaults");
    }
    config.credentials = Default::default();
    config.signing.key.clear();
    config.signing.key_id.clear();
    config.signing.password.clear();
}
