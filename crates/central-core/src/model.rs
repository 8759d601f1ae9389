//! The publisher configuration model.
//!
//! Every type here is a plain value: a resolution pass constructs each
//! config once and never mutates it afterwards. Merges (see [`crate::merge`])
//! always return new instances.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Dotted paths whose values are secrets and must never be displayed in full.
pub const SECRET_PATHS: &[&str] = &[
    "credentials.username",
    "credentials.password",
    "signing.key",
    "signing.password",
];

/// Root aggregate: everything needed to publish to the Central Portal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CentralPublisherConfig {
    #[serde(default)]
    pub credentials: Credentials,
    #[serde(default)]
    pub project_info: ProjectInfo,
    #[serde(default)]
    pub signing: SigningConfig,
    #[serde(default)]
    pub publishing: PublishingOptions,
}

/// Portal user token.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &mask_secret(&self.username))
            .field("password", &mask_secret(&self.password))
            .finish()
    }
}

/// POM project metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub license: LicenseInfo,
    #[serde(default)]
    pub developers: Vec<DeveloperInfo>,
    #[serde(default)]
    pub scm: ScmInfo,
}

/// License block. A set `name` should come with a `url`; that is checked by
/// validation, not enforced here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub distribution: String,
    #[serde(default)]
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub organization_url: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}

/// Source control block. Connections follow `scm:git:<transport>://...`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScmInfo {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub connection: String,
    #[serde(default)]
    pub developer_connection: String,
}

impl ScmInfo {
    pub fn is_blank(&self) -> bool {
        is_blank(&self.url) && is_blank(&self.connection) && is_blank(&self.developer_connection)
    }
}

/// Signing material.
///
/// Either the ASCII-armored `key` or the `key_id` + `secret_key_ring_file`
/// pair is consumed downstream; both may be populated.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningConfig {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub key_id: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub secret_key_ring_file: String,
}

impl SigningConfig {
    /// Returns `true` when an in-memory armored key is configured.
    pub fn has_armored_key(&self) -> bool {
        !is_blank(&self.key)
    }

    /// Returns `true` when keyring-based signing is configured.
    pub fn has_key_id(&self) -> bool {
        !is_blank(&self.key_id)
    }
}

impl fmt::Debug for SigningConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningConfig")
            .field("key", &mask_secret(&self.key))
            .field("key_id", &self.key_id)
            .field("password", &mask_secret(&self.password))
            .field("secret_key_ring_file", &self.secret_key_ring_file)
            .finish()
    }
}

/// Publishing behaviour switches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishingOptions {
    #[serde(default)]
    pub auto_publish: Flag,
    #[serde(default)]
    pub aggregation: Flag,
    #[serde(default)]
    pub dry_run: Flag,
    #[serde(default)]
    pub exclude_modules: BTreeSet<String>,
}

/// A boolean that remembers whether any source actually set it.
///
/// Plain booleans cannot tell "explicitly false" from "never set", which
/// made lower-precedence `true` values impossible to override. Merging a
/// `Flag` keeps the first explicitly set value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Flag(Option<bool>);

impl Flag {
    pub const UNSET: Flag = Flag(None);

    pub const fn set(value: bool) -> Self {
        Flag(Some(value))
    }

    pub const fn value(self) -> Option<bool> {
        self.0
    }

    pub const fn is_set(self) -> bool {
        self.0.is_some()
    }

    /// The effective value, treating unset as `false`.
    pub fn is_enabled(self) -> bool {
        self.0.unwrap_or(false)
    }

    /// Keep `self` if set, otherwise take `other`.
    pub fn or(self, other: Flag) -> Flag {
        Flag(self.0.or(other.0))
    }

    /// Parse the boolean spellings accepted in properties files and the
    /// environment. Unrecognized text yields `None`.
    pub fn parse(text: &str) -> Option<Flag> {
        match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" | "on" => Some(Flag::set(true)),
            "false" | "no" | "0" | "off" => Some(Flag::set(false)),
            _ => None,
        }
    }
}

impl From<bool> for Flag {
    fn from(value: bool) -> Self {
        Flag::set(value)
    }
}

impl From<Option<bool>> for Flag {
    fn from(value: Option<bool>) -> Self {
        Flag(value)
    }
}

/// Returns `true` for empty or whitespace-only strings.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Mask a secret for display: keep the first two characters of values at
/// least four characters long, hide everything else.
pub fn mask_secret(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    let chars: Vec<char> = value.chars().collect();
    if chars.len() < 4 {
        return "****".to_string();
    }
    let prefix: String = chars[..2].iter().collect();
    format!("{prefix}****")
}

/// Returns `true` if the dotted path names a secret field.
pub fn is_secret_path(path: &str) -> bool {
    SECRET_PATHS.contains(&path)
}

/// Collapse a leaf path to the field whose provenance it shares.
///
/// The developers list is merged as a whole, so every
/// `projectInfo.developers[N].x` leaf maps to `projectInfo.developers`.
pub fn provenance_key(path: &str) -> &str {
    match path.find('[') {
        Some(idx) => &path[..idx],
        None => path,
    }
}

impl CentralPublisherConfig {
    /// Shorthand for a config carrying only credentials and a project name.
    pub fn with_required(username: &str, password: &str, project_name: &str) -> Self {
        Self {
            credentials: Credentials {
                username: username.to_string(),
                password: password.to_string(),
            },
            project_info: ProjectInfo {
                name: project_name.to_string(),
                ..ProjectInfo::default()
            },
            ..Self::default()
        }
    }

    /// Flatten the config into `(dotted path, value)` pairs for every
    /// non-blank leaf, in declaration order. Unset flags are omitted.
    pub fn leaves(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        let mut push = |path: String, value: &str| {
            if !is_blank(value) {
                out.push((path, value.to_string()));
            }
        };

        push("credentials.username".into(), &self.credentials.username);
        push("credentials.password".into(), &self.credentials.password);

        let info = &self.project_info;
        push("projectInfo.name".into(), &info.name);
        push("projectInfo.description".into(), &info.description);
        push("projectInfo.url".into(), &info.url);
        push("projectInfo.license.name".into(), &info.license.name);
        push("projectInfo.license.url".into(), &info.license.url);
        push(
            "projectInfo.license.distribution".into(),
            &info.license.distribution,
        );
        push(
            "projectInfo.license.comments".into(),
            info.license.comments.as_deref().unwrap_or_default(),
        );
        for (i, dev) in info.developers.iter().enumerate() {
            let base = format!("projectInfo.developers[{i}]");
            push(format!("{base}.id"), &dev.id);
            push(format!("{base}.name"), &dev.name);
            push(format!("{base}.email"), &dev.email);
            push(
                format!("{base}.organization"),
                dev.organization.as_deref().unwrap_or_default(),
            );
            push(
                format!("{base}.organizationUrl"),
                dev.organization_url.as_deref().unwrap_or_default(),
            );
            push(format!("{base}.roles"), &dev.roles.join(", "));
            push(
                format!("{base}.timezone"),
                dev.timezone.as_deref().unwrap_or_default(),
            );
        }
        push("projectInfo.scm.url".into(), &info.scm.url);
        push("projectInfo.scm.connection".into(), &info.scm.connection);
        push(
            "projectInfo.scm.developerConnection".into(),
            &info.scm.developer_connection,
        );

        push("signing.key".into(), &self.signing.key);
        push("signing.keyId".into(), &self.signing.key_id);
        push("signing.password".into(), &self.signing.password);
        push(
            "signing.secretKeyRingFile".into(),
            &self.signing.secret_key_ring_file,
        );

        let publishing = &self.publishing;
        for (path, flag) in [
            ("publishing.autoPublish", publishing.auto_publish),
            ("publishing.aggregation", publishing.aggregation),
            ("publishing.dryRun", publishing.dry_run),
        ] {
            if let Some(value) = flag.value() {
                push(path.into(), &value.to_string());
            }
        }
        let excludes: Vec<&str> = publishing
            .exclude_modules
            .iter()
            .map(String::as_str)
            .collect();
        push("publishing.excludeModules".into(), &excludes.join(", "));

        out
    }

    /// A copy with every secret replaced by its masked form.
    pub fn mask_secrets(&self) -> Self {
        let mut masked = self.clone();
        masked.credentials.username = mask_secret(&self.credentials.username);
        masked.credentials.password = mask_secret(&self.credentials.password);
        masked.signing.key = mask_secret(&self.signing.key);
        masked.signing.password = mask_secret(&self.signing.password);
        masked
    }

    /// Assign a value by dotted path while a partial config is being built.
    ///
    /// Supports every leaf produced by [`leaves`](Self::leaves). Flags accept
    /// the spellings of [`Flag::parse`]; `publishing.excludeModules` takes a
    /// comma-separated list; `projectInfo.developers[N].roles` a
    /// comma-separated list. Returns `false` for unknown paths or
    /// unparseable flag values.
    pub fn set_field(&mut self, path: &str, value: &str) -> bool {
        let value = value.trim();
        if let Some(rest) = path.strip_prefix("projectInfo.developers[") {
            return self.set_developer_field(rest, value);
        }
        let slot: &mut String = match path {
            "credentials.username" => &mut self.credentials.username,
            "credentials.password" => &mut self.credentials.password,
            "projectInfo.name" => &mut self.project_info.name,
            "projectInfo.description" => &mut self.project_info.description,
            "projectInfo.url" => &mut self.project_info.url,
            "projectInfo.license.name" => &mut self.project_info.license.name,
            "projectInfo.license.url" => &mut self.project_info.license.url,
            "projectInfo.license.distribution" => &mut self.project_info.license.distribution,
            "projectInfo.license.comments" => {
                self.project_info.license.comments = Some(value.to_string());
                return true;
            }
            "projectInfo.scm.url" => &mut self.project_info.scm.url,
            "projectInfo.scm.connection" => &mut self.project_info.scm.connection,
            "projectInfo.scm.developerConnection" => {
                &mut self.project_info.scm.developer_connection
            }
            "signing.key" => &mut self.signing.key,
            "signing.keyId" => &mut self.signing.key_id,
            "signing.password" => &mut self.signing.password,
            "signing.secretKeyRingFile" => &mut self.signing.secret_key_ring_file,
            "publishing.autoPublish" => {
                return set_flag(&mut self.publishing.auto_publish, value);
            }
            "publishing.aggregation" => {
                return set_flag(&mut self.publishing.aggregation, value);
            }
            "publishing.dryRun" => return set_flag(&mut self.publishing.dry_run, value),
            "publishing.excludeModules" => {
                self.publishing.exclude_modules = split_list(value).into_iter().collect();
                return true;
            }
            _ => return false,
        };
        *slot = value.to_string();
        true
    }

    fn set_developer_field(&mut self, rest: &str, value: &str) -> bool {
        let Some((index, field)) = rest.split_once("].") else {
            return false;
        };
        let Ok(index) = index.parse::<usize>() else {
            return false;
        };
        const FIELDS: &[&str] = &[
            "id",
            "name",
            "email",
            "organization",
            "organizationUrl",
            "roles",
            "timezone",
        ];
        // Guard against absurd indices from hand-written keys.
        if index > 64 || !FIELDS.contains(&field) {
            return false;
        }
        let developers = &mut self.project_info.developers;
        if developers.len() <= index {
            developers.resize_with(index + 1, DeveloperInfo::default);
        }
        let dev = &mut developers[index];
        match field {
            "id" => dev.id = value.to_string(),
            "name" => dev.name = value.to_string(),
            "email" => dev.email = value.to_string(),
            "organization" => dev.organization = Some(value.to_string()),
            "organizationUrl" => dev.organization_url = Some(value.to_string()),
            "roles" => dev.roles = split_list(value),
            "timezone" => dev.timezone = Some(value.to_string()),
            _ => return false,
        }
        true
    }
}

fn set_flag(flag: &mut Flag, value: &str) -> bool {
    match Flag::parse(value) {
        Some(parsed) => {
            *flag = parsed;
            true
        }
        None => false,
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
