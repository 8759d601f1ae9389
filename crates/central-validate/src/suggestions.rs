//! Static mapping from known failure conditions to ranked fix suggestions.

use std::fmt;

use serde::Serialize;

use crate::violation::ValidationViolation;

/// Known classes of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCondition {
    MissingCredentials,
    MissingSigningKey,
    InvalidPomFields,
    UploadFailure,
    MissingDescription,
    Unknown,
}

impl ErrorCondition {
    /// Condition for a violation code.
    pub fn from_code(code: &str) -> ErrorCondition {
        match code {
            "REQ-CREDENTIALS_USERNAME" | "REQ-CREDENTIALS_PASSWORD" => {
                ErrorCondition::MissingCredentials
            }
            "SIG-KEY_MISSING" => ErrorCondition::MissingSigningKey,
            "POM-DESCRIPTION_MISSING" => ErrorCondition::MissingDescription,
            _ if ["POM-", "LIC-", "DEV-", "SCM-", "REQ-PROJECT"]
                .iter()
                .any(|p| code.starts_with(p)) =>
            {
                ErrorCondition::InvalidPomFields
            }
            _ => ErrorCondition::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SuggestionType {
    Command,
    Configuration,
    Documentation,
    Validation,
    Retry,
    Generic,
}

impl fmt::Display for SuggestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SuggestionType::Command => "COMMAND",
            SuggestionType::Configuration => "CONFIGURATION",
            SuggestionType::Documentation => "DOCUMENTATION",
            SuggestionType::Validation => "VALIDATION",
            SuggestionType::Retry => "RETRY",
            SuggestionType::Generic => "GENERIC",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FixSuggestion {
    /// 1 is the most relevant.
    pub rank: u8,
    pub kind: SuggestionType,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<&'static str>,
}

const fn fix(
    rank: u8,
    kind: SuggestionType,
    description: &'static str,
    command: Option<&'static str>,
    documentation_url: Option<&'static str>,
) -> FixSuggestion {
    FixSuggestion {
        rank,
        kind,
        description,
        command,
        documentation_url,
    }
}

use SuggestionType::*;

const MISSING_CREDENTIALS: &[FixSuggestion] = &[
    fix(
        1,
        Configuration,
        "Add SONATYPE_USERNAME and SONATYPE_PASSWORD to ~/.gradle/gradle.properties",
        None,
        None,
    ),
    fix(
        2,
        Command,
        "Run the interactive setup to store credentials",
        Some("central-publish setup"),
        None,
    ),
    fix(
        3,
        Documentation,
        "Generate a user token on the Central Portal",
        None,
        Some("https://central.sonatype.org/publish/generate-portal-token/"),
    ),
];

const MISSING_SIGNING_KEY: &[FixSuggestion] = &[
    fix(
        1,
        Configuration,
        "Set SIGNING_KEY and SIGNING_PASSWORD in ~/.gradle/gradle.properties",
        None,
        None,
    ),
    fix(
        2,
        Command,
        "Export your private key in ASCII-armored form",
        Some("gpg --armor --export-secret-keys <KEY_ID>"),
        None,
    ),
    fix(
        3,
        Documentation,
        "Central's GPG signing requirements",
        None,
        Some("https://central.sonatype.org/publish/requirements/gpg/"),
    ),
];

const INVALID_POM_FIELDS: &[FixSuggestion] = &[
    fix(
        1,
        Validation,
        "Re-run validation to list every missing or invalid POM field",
        Some("central-publish validate"),
        None,
    ),
    fix(
        2,
        Configuration,
        "Fill in the [project] section of central-publisher.toml",
        None,
        None,
    ),
    fix(
        3,
        Documentation,
        "Central's POM metadata requirements",
        None,
        Some("https://central.sonatype.org/publish/requirements/"),
    ),
];

const UPLOAD_FAILURE: &[FixSuggestion] = &[
    fix(
        1,
        Retry,
        "Retry the upload; the portal may be temporarily unavailable",
        None,
        None,
    ),
    fix(
        2,
        Validation,
        "Check the configuration before uploading again",
        Some("central-publish validate"),
        None,
    ),
    fix(
        3,
        Documentation,
        "Central Portal publishing API",
        None,
        Some("https://central.sonatype.org/publish/publish-portal-api/"),
    ),
];

const MISSING_DESCRIPTION: &[FixSuggestion] = &[
    fix(
        1,
        Configuration,
        "Add description under [project] in central-publisher.toml",
        None,
        None,
    ),
    fix(
        2,
        Configuration,
        "Or set POM_DESCRIPTION in gradle.properties",
        None,
        None,
    ),
];

const UNKNOWN: &[FixSuggestion] = &[
    fix(
        1,
        Generic,
        "Re-run with --verbose for more detail",
        Some("central-publish --verbose validate"),
        None,
    ),
    fix(
        2,
        Documentation,
        "Central Portal documentation",
        None,
        Some("https://central.sonatype.org/"),
    ),
];

/// Ranked suggestions for `condition`, most relevant first.
pub fn suggestions_for(condition: ErrorCondition) -> &'static [FixSuggestion] {
    match condition {
        ErrorCondition::MissingCredentials => MISSING_CREDENTIALS,
        ErrorCondition::MissingSigningKey => MISSING_SIGNING_KEY,
        ErrorCondition::InvalidPomFields => INVALID_POM_FIELDS,
        ErrorCondition::UploadFailure => UPLOAD_FAILURE,
        ErrorCondition::MissingDescription => MISSING_DESCRIPTION,
        ErrorCondition::Unknown => UNKNOWN,
    }
}

/// Ranked suggestions for a violation, by its code.
pub fn suggestions_for_violation(violation: &ValidationViolation) -> &'static [FixSuggestion] {
    suggestions_for(ErrorCondition::from_code(&violation.code))
}
