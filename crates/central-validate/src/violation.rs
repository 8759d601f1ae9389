use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
        })
    }
}

/// Report grouping, derived from a violation's code prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Category {
    Credentials,
    Project,
    License,
    Developers,
    Scm,
    Signing,
    Publishing,
    Selection,
    Other,
}

impl Category {
    /// Category for a violation code such as `REQ-CREDENTIALS_USERNAME`.
    pub fn of(code: &str) -> Category {
        let (prefix, rest) = code.split_once('-').unwrap_or((code, ""));
        match prefix {
            "REQ" if rest.starts_with("PROJECT") => Category::Project,
            "REQ" => Category::Credentials,
            "POM" if rest.starts_with("DEVELOPERS") => Category::Developers,
            "POM" if rest.starts_with("SCM") => Category::Scm,
            "POM" => Category::Project,
            "LIC" => Category::License,
            "DEV" => Category::Developers,
            "SCM" => Category::Scm,
            "SIG" => Category::Signing,
            "PUB" => Category::Publishing,
            "SEL" => Category::Selection,
            _ => Category::Other,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Category::Credentials => "Credentials",
            Category::Project => "Project",
            Category::License => "License",
            Category::Developers => "Developers",
            Category::Scm => "SCM",
            Category::Signing => "Signing",
            Category::Publishing => "Publishing",
            Category::Selection => "Selection",
            Category::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationViolation {
    /// Dotted config path, e.g. `credentials.username`.
    pub field: String,
    pub message: String,
    pub severity: Severity,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ValidationViolation {
    pub fn new(
        severity: Severity,
        code: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity,
            code: code.into(),
            suggestion: None,
        }
    }

    pub fn error(code: &str, field: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, field, message)
    }

    pub fn warning(code: &str, field: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, field, message)
    }

    pub fn info(code: &str, field: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, code, field, message)
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn category(&self) -> Category {
        Category::of(&self.code)
    }
}

/// Every violation found, in validator order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub violations: Vec<ValidationViolation>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_violations(violations: Vec<ValidationViolation>) -> Self {
        Self { violations }
    }

    /// `true` iff no violation has ERROR severity.
    pub fn is_valid(&self) -> bool {
        !self.violations.iter().any(|v| v.severity == Severity::Error)
    }

    pub fn push(&mut self, violation: ValidationViolation) {
        self.violations.push(violation);
    }

    pub fn extend(&mut self, other: ValidationResult) {
        self.violations.extend(other.violations);
    }

    pub fn with_severity(&self, severity: Severity) -> Vec<&ValidationViolation> {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .collect()
    }

    pub fn errors(&self) -> Vec<&ValidationViolation> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> Vec<&ValidationViolation> {
        self.with_severity(Severity::Warning)
    }

    pub fn infos(&self) -> Vec<&ValidationViolation> {
        self.with_severity(Severity::Info)
    }

    pub fn find(&self, code: &str) -> Option<&ValidationViolation> {
        self.violations.iter().find(|v| v.code == code)
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.find(code).is_some()
    }

    pub fn for_field(&self, field: &str) -> Vec<&ValidationViolation> {
        self.violations.iter().filter(|v| v.field == field).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }
}
