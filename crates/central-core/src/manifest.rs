//! The `central-publisher.toml` manifest: explicit, highest-precedence
//! configuration plus tool settings.
//!
//! ```toml
//! [credentials]
//! username = "token-user"
//!
//! [project]
//! name = "my-library"
//! description = "Does things"
//! url = "https://github.com/acme/my-library"
//!
//! [project.license]
//! name = "MIT"
//! url = "https://opensource.org/licenses/MIT"
//!
//! [[project.developers]]
//! id = "jdoe"
//! name = "Jane Doe"
//! email = "jane@example.com"
//!
//! [publishing]
//! auto-publish = false
//! exclude-modules = ["*-sample"]
//!
//! [detection]
//! git-timeout-secs = 5
//!
//! [selection]
//! include = ["lib-*"]
//! groups = { core = ["lib-core", "lib-api"] }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use central_util::errors::CentralError;

use crate::model::{
    CentralPublisherConfig, Credentials, DeveloperInfo, Flag, LicenseInfo, ProjectInfo,
    PublishingOptions, ScmInfo, SigningConfig,
};

/// File name of the manifest at the project root.
pub const MANIFEST_FILE: &str = "central-publisher.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublisherManifest {
    #[serde(default)]
    pub credentials: Option<CredentialsSection>,

    #[serde(default)]
    pub project: Option<ProjectSection>,

    #[serde(default)]
    pub signing: Option<SigningSection>,

    #[serde(default)]
    pub publishing: Option<PublishingSection>,

    #[serde(default)]
    pub detection: DetectionSettings,

    #[serde(default)]
    pub selection: SelectionSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsSection {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Project metadata from `[project]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectSection {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub license: Option<LicenseSection>,
    #[serde(default)]
    pub developers: Vec<DeveloperSection>,
    #[serde(default)]
    pub scm: Option<ScmSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LicenseSection {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub distribution: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
}

/// One `[[project.developers]]` entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeveloperSection {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default, rename = "organization-url")]
    pub organization_url: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScmSection {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub connection: Option<String>,
    #[serde(default, rename = "developer-connection")]
    pub developer_connection: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SigningSection {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default, rename = "key-id")]
    pub key_id: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default, rename = "secret-key-ring-file")]
    pub secret_key_ring_file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublishingSection {
    #[serde(default, rename = "auto-publish")]
    pub auto_publish: Option<bool>,
    #[serde(default)]
    pub aggregation: Option<bool>,
    #[serde(default, rename = "dry-run")]
    pub dry_run: Option<bool>,
    #[serde(default, rename = "exclude-modules")]
    pub exclude_modules: Vec<String>,
}

/// Auto-detection settings from `[detection]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_git_timeout", rename = "git-timeout-secs")]
    pub git_timeout_secs: u64,
    /// Fall back to `git config --global` for the developer identity.
    #[serde(default = "default_true", rename = "global-git")]
    pub global_git: bool,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            git_timeout_secs: default_git_timeout(),
            global_git: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_git_timeout() -> u64 {
    3
}

/// Module selection from `[selection]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionSettings {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub groups: BTreeMap<String, Vec<String>>,
    #[serde(default, rename = "selected-groups")]
    pub selected_groups: Vec<String>,
    #[serde(default, rename = "publishable-only")]
    pub publishable_only: Option<bool>,
}

impl PublisherManifest {
    /// Load and parse a manifest file.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CentralError::Manifest {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::parse_toml(&content)
    }

    /// Load `central-publisher.toml` from `project_root` if it exists.
    pub fn load(project_root: &Path) -> miette::Result<Option<Self>> {
        let path = project_root.join(MANIFEST_FILE);
        if path.is_file() {
            Self::from_path(&path).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Parse manifest TOML from a string.
    pub fn parse_toml(content: &str) -> miette::Result<Self> {
        toml::from_str(content).map_err(|e| {
            CentralError::Manifest {
                message: format!("Failed to parse {MANIFEST_FILE}: {e}"),
            }
            .into()
        })
    }

    /// The publisher configuration declared by this manifest.
    pub fn to_config(&self) -> CentralPublisherConfig {
        let credentials = self
            .credentials
            .as_ref()
            .map(|c| Credentials {
                username: text(&c.username),
                password: text(&c.password),
            })
            .unwrap_or_default();

        let project_info = self
            .project
            .as_ref()
            .map(ProjectSection::to_info)
            .unwrap_or_default();

        let signing = self
            .signing
            .as_ref()
            .map(|s| SigningConfig {
                key: text(&s.key),
                key_id: text(&s.key_id),
                password: text(&s.password),
                secret_key_ring_file: text(&s.secret_key_ring_file),
            })
            .unwrap_or_default();

        let publishing = self
            .publishing
            .as_ref()
            .map(|p| PublishingOptions {
                auto_publish: Flag::from(p.auto_publish),
                aggregation: Flag::from(p.aggregation),
                dry_run: Flag::from(p.dry_run),
                exclude_modules: p.exclude_modules.iter().cloned().collect(),
            })
            .unwrap_or_default();

        CentralPublisherConfig {
            credentials,
            project_info,
            signing,
            publishing,
        }
    }
}

impl ProjectSection {
    fn to_info(&self) -> ProjectInfo {
        ProjectInfo {
            name: text(&self.name),
            description: text(&self.description),
            url: text(&self.url),
            license: self
                .license
                .as_ref()
                .map(|l| LicenseInfo {
                    name: text(&l.name),
                    url: text(&l.url),
                    distribution: text(&l.distribution),
                    comments: l.comments.clone(),
                })
                .unwrap_or_default(),
            developers: self
                .developers
                .iter()
                .map(|d| DeveloperInfo {
                    id: text(&d.id),
                    name: text(&d.name),
                    email: text(&d.email),
                    organization: d.organization.clone(),
                    organization_url: d.organization_url.clone(),
                    roles: d.roles.clone(),
                    timezone: d.timezone.clone(),
                })
                .collect(),
            scm: self
                .scm
                .as_ref()
                .map(|s| ScmInfo {
                    url: text(&s.url),
                    connection: text(&s.connection),
                    developer_connection: text(&s.developer_connection),
                })
                .unwrap_or_default(),
        }
    }
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}
