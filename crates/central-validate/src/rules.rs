//! The standard validators.

use std::path::Path;
use std::sync::LazyLock;

use globset::Glob;
use regex::Regex;

use central_core::model::{is_blank, CentralPublisherConfig};

use crate::engine::Validator;
use crate::violation::ValidationViolation;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex"));

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Fields the portal cannot do without.
pub struct RequiredFieldValidator;

impl Validator for RequiredFieldValidator {
    fn name(&self) -> &'static str {
        "required-fields"
    }

    fn validate(&self, config: &CentralPublisherConfig) -> Vec<ValidationViolation> {
        let mut out = Vec::new();

        let username = config.credentials.username.trim();
        if username.is_empty() {
            out.push(
                ValidationViolation::error(
                    "REQ-CREDENTIALS_USERNAME",
                    "credentials.username",
                    "Central Portal username is required",
                )
                .with_suggestion(
                    "Set SONATYPE_USERNAME in ~/.gradle/gradle.properties or the environment",
                ),
            );
        } else if username.chars().count() < MIN_USERNAME_LENGTH {
            out.push(
                ValidationViolation::warning(
                    "REQ-USERNAME_SHORT",
                    "credentials.username",
                    format!("Username is shorter than {MIN_USERNAME_LENGTH} characters"),
                )
                .with_suggestion("Use the user token name generated by the Central Portal"),
            );
        }

        let password = config.credentials.password.trim();
        if password.is_empty() {
            out.push(
                ValidationViolation::error(
                    "REQ-CREDENTIALS_PASSWORD",
                    "credentials.password",
                    "Central Portal password is required",
                )
                .with_suggestion(
                    "Set SONATYPE_PASSWORD in ~/.gradle/gradle.properties or the environment",
                ),
            );
        } else if password == "password" || password.chars().count() < MIN_PASSWORD_LENGTH {
            out.push(
                ValidationViolation::warning(
                    "REQ-WEAK_PASSWORD",
                    "credentials.password",
                    "Password looks weak; the portal expects a generated user token",
                )
                .with_suggestion("Generate a user token at https://central.sonatype.com/account"),
            );
        }

        if is_blank(&config.project_info.name) {
            out.push(
                ValidationViolation::error(
                    "REQ-PROJECT_NAME",
                    "projectInfo.name",
                    "Project name is required",
                )
                .with_suggestion("Set name under [project] in central-publisher.toml"),
            );
        }

        out
    }
}

/// Description and URL for the POM.
pub struct ProjectMetadataValidator;

impl Validator for ProjectMetadataValidator {
    fn name(&self) -> &'static str {
        "project-metadata"
    }

    fn validate(&self, config: &CentralPublisherConfig) -> Vec<ValidationViolation> {
        let info = &config.project_info;
        let mut out = Vec::new();

        if is_blank(&info.description) {
            out.push(
                ValidationViolation::warning(
                    "POM-DESCRIPTION_MISSING",
                    "projectInfo.description",
                    "Project description is missing; Central requires one in the POM",
                )
                .with_suggestion("Set description under [project] or POM_DESCRIPTION"),
            );
        }

        let url = info.url.trim();
        if url.is_empty() {
            out.push(
                ValidationViolation::warning(
                    "POM-URL_MISSING",
                    "projectInfo.url",
                    "Project URL is missing; Central requires one in the POM",
                )
                .with_suggestion("Set url under [project] or POM_URL"),
            );
        } else if !is_http_url(url) {
            out.push(ValidationViolation::warning(
                "POM-URL_INVALID",
                "projectInfo.url",
                format!("Project URL '{url}' is not an http(s) URL"),
            ));
        }

        out
    }
}

pub struct LicenseValidator;

impl Validator for LicenseValidator {
    fn name(&self) -> &'static str {
        "license"
    }

    fn validate(&self, config: &CentralPublisherConfig) -> Vec<ValidationViolation> {
        let license = &config.project_info.license;
        if is_blank(&license.name) {
            return vec![ValidationViolation::warning(
                "LIC-MISSING",
                "projectInfo.license.name",
                "No license declared",
            )
            .with_suggestion("Set [project.license] name and url in central-publisher.toml")];
        }
        if is_blank(&license.url) {
            return vec![ValidationViolation::warning(
                "LIC-URL_MISSING",
                "projectInfo.license.url",
                format!("License '{}' has no URL", license.name.trim()),
            )];
        }
        Vec::new()
    }
}

pub struct DeveloperValidator;

impl Validator for DeveloperValidator {
    fn name(&self) -> &'static str {
        "developers"
    }

    fn validate(&self, config: &CentralPublisherConfig) -> Vec<ValidationViolation> {
        let developers = &config.project_info.developers;
        if developers.is_empty() {
            return vec![ValidationViolation::warning(
                "POM-DEVELOPERS_MISSING",
                "projectInfo.developers",
                "No developers declared; Central requires at least one",
            )
            .with_suggestion("Add a [[project.developers]] entry or set POM_DEVELOPER_ID")];
        }

        let mut out = Vec::new();
        for (i, dev) in developers.iter().enumerate() {
            if is_blank(&dev.id) && is_blank(&dev.name) {
                out.push(ValidationViolation::warning(
                    "DEV-IDENTITY_MISSING",
                    &format!("projectInfo.developers[{i}]"),
                    format!("Developer #{} has neither an id nor a name", i + 1),
                ));
            }
            let email = dev.email.trim();
            if !email.is_empty() && !EMAIL.is_match(email) {
                out.push(ValidationViolation::warning(
                    "DEV-EMAIL_INVALID",
                    &format!("projectInfo.developers[{i}].email"),
                    format!("'{email}' is not a valid email address"),
                ));
            }
        }
        out
    }
}

pub struct ScmValidator;

impl Validator for ScmValidator {
    fn name(&self) -> &'static str {
        "scm"
    }

    fn validate(&self, config: &CentralPublisherConfig) -> Vec<ValidationViolation> {
        let scm = &config.project_info.scm;
        if scm.is_blank() {
            return vec![ValidationViolation::warning(
                "POM-SCM_MISSING",
                "projectInfo.scm",
                "No SCM information; Central requires it in the POM",
            )
            .with_suggestion("Add a git remote or set [project.scm] in central-publisher.toml")];
        }

        let mut out = Vec::new();
        for (field, value) in [
            ("projectInfo.scm.connection", &scm.connection),
            ("projectInfo.scm.developerConnection", &scm.developer_connection),
        ] {
            let value = value.trim();
            if !value.is_empty() && !value.starts_with("scm:") {
                out.push(
                    ValidationViolation::warning(
                        "SCM-CONNECTION_FORMAT",
                        field,
                        format!("'{value}' does not follow the scm:<provider>:<url> format"),
                    )
                    .with_suggestion(format!("Use scm:git:{value}")),
                );
            }
        }
        out
    }
}

pub struct SigningValidator;

impl Validator for SigningValidator {
    fn name(&self) -> &'static str {
        "signing"
    }

    fn validate(&self, config: &CentralPublisherConfig) -> Vec<ValidationViolation> {
        let signing = &config.signing;
        let mut out = Vec::new();

        if !signing.has_armored_key() && !signing.has_key_id() {
            out.push(
                ValidationViolation::warning(
                    "SIG-KEY_MISSING",
                    "signing.key",
                    "No signing key configured; Central rejects unsigned artifacts",
                )
                .with_suggestion("Set SIGNING_KEY to an ASCII-armored private key"),
            );
            return out;
        }

        if is_blank(&signing.password) {
            out.push(ValidationViolation::warning(
                "SIG-PASSWORD_MISSING",
                "signing.password",
                "Signing key has no passphrase configured",
            ));
        }

        let key_id = signing.key_id.trim();
        if !key_id.is_empty() && !is_key_id(key_id) {
            out.push(
                ValidationViolation::warning(
                    "SIG-KEY_ID_FORMAT",
                    "signing.keyId",
                    format!("Key id '{key_id}' is not 8, 16 or 40 hexadecimal characters"),
                )
                .with_suggestion("Use the short or long id shown by `gpg --list-secret-keys`"),
            );
        }

        let keyring = signing.secret_key_ring_file.trim();
        if signing.has_key_id()
            && !signing.has_armored_key()
            && !keyring.is_empty()
            && !keyring.starts_with('~')
            && !Path::new(keyring).exists()
        {
            out.push(ValidationViolation::warning(
                "SIG-KEYRING_NOT_FOUND",
                "signing.secretKeyRingFile",
                format!("Secret keyring '{keyring}' does not exist"),
            ));
        }

        out
    }
}

pub struct PublishingValidator;

impl Validator for PublishingValidator {
    fn name(&self) -> &'static str {
        "publishing"
    }

    fn validate(&self, config: &CentralPublisherConfig) -> Vec<ValidationViolation> {
        let publishing = &config.publishing;
        let mut out = Vec::new();

        if publishing.auto_publish.is_enabled() {
            out.push(ValidationViolation::info(
                "PUB-AUTO_PUBLISH",
                "publishing.autoPublish",
                "Deployments are released automatically once validated by the portal",
            ));
        }
        if publishing.dry_run.is_enabled() {
            out.push(ValidationViolation::info(
                "PUB-DRY_RUN",
                "publishing.dryRun",
                "Dry run: nothing will be uploaded",
            ));
        }
        for pattern in &publishing.exclude_modules {
            if is_blank(pattern) || Glob::new(pattern).is_err() {
                out.push(ValidationViolation::warning(
                    "PUB-EXCLUDE_PATTERN_INVALID",
                    "publishing.excludeModules",
                    format!("Exclude pattern '{pattern}' is not a valid glob"),
                ));
            }
        }
        out
    }
}

fn is_http_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    ["https://", "http://"]
        .iter()
        .any(|scheme| lower.strip_prefix(scheme).is_some_and(|rest| !rest.is_empty()))
}

fn is_key_id(key_id: &str) -> bool {
    let hex = key_id
        .strip_prefix("0x")
        .or_else(|| key_id.strip_prefix("0X"))
        .unwrap_or(key_id);
    matches!(hex.len(), 8 | 16 | 40) && hex.chars().all(|c| c.is_ascii_hexdigit())
}
