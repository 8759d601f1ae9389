//! Human-readable validation reports, grouped by category.

use std::collections::BTreeMap;
use std::fmt::Write;

use console::Style;
use serde::Serialize;

use crate::violation::{Category, Severity, ValidationResult, ValidationViolation};

#[derive(Debug, Clone, Serialize)]
pub struct CategoryGroup {
    pub category: Category,
    pub violations: Vec<ValidationViolation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
    pub groups: Vec<CategoryGroup>,
}

impl ValidationReport {
    pub fn from_result(result: &ValidationResult) -> Self {
        let mut grouped: BTreeMap<Category, Vec<ValidationViolation>> = BTreeMap::new();
        for violation in &result.violations {
            grouped
                .entry(violation.category())
                .or_default()
                .push(violation.clone());
        }
        let groups = grouped
            .into_iter()
            .map(|(category, mut violations)| {
                violations.sort_by_key(|v| v.severity);
                CategoryGroup {
                    category,
                    violations,
                }
            })
            .collect();

        Self {
            valid: result.is_valid(),
            errors: result.errors().len(),
            warnings: result.warnings().len(),
            infos: result.infos().len(),
            groups,
        }
    }

    /// One-line summary, e.g. `2 error(s), 1 warning(s), 0 info`.
    pub fn summary(&self) -> String {
        format!(
            "{} error(s), {} warning(s), {} info",
            self.errors, self.warnings, self.infos
        )
    }

    /// Render the report. `styled` enables terminal colors.
    pub fn render(&self, styled: bool) -> String {
        let mut out = String::new();
        if self.groups.is_empty() {
            out.push_str("No problems found.\n");
            return out;
        }

        let heading = Style::new().bold().force_styling(styled);
        let dim = Style::new().dim().force_styling(styled);
        for group in &self.groups {
            let _ = writeln!(out, "{}", heading.apply_to(group.category.title()));
            for v in &group.violations {
                let label = severity_style(v.severity, styled).apply_to(format!("{:<7}", v.severity));
                let _ = writeln!(out, "  {label} [{}] {}: {}", v.code, v.field, v.message);
                if let Some(suggestion) = &v.suggestion {
                    let _ = writeln!(out, "          {}", dim.apply_to(format!("help: {suggestion}")));
                }
            }
        }
        let _ = writeln!(out);
        let verdict = if self.valid {
            Style::new().green().bold().force_styling(styled).apply_to("Valid")
        } else {
            Style::new().red().bold().force_styling(styled).apply_to("Invalid")
        };
        let _ = writeln!(out, "{verdict}: {}", self.summary());
        out
    }
}

fn severity_style(severity: Severity, styled: bool) -> Style {
    let style = match severity {
        Severity::Error => Style::new().red().bold(),
        Severity::Warning => Style::new().yellow(),
        Severity::Info => Style::new().cyan(),
    };
    style.force_styling(styled)
}
