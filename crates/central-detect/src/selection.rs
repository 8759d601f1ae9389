//! Selective publishing: narrowing a [`ModuleStructure`] to the modules a
//! run should publish.

use std::collections::BTreeMap;

use globset::{Glob, GlobMatcher};

use central_core::manifest::SelectionSettings;

use crate::modules::{ModuleInfo, ModuleStructure};

/// A predicate every selected module must satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleFilter {
    /// `true` keeps only publishable modules; `false` applies no restriction.
    PublishableOnly(bool),
    /// Keep modules whose intra-project dependency list is non-empty (`true`)
    /// or empty (`false`).
    HasDependencies(bool),
    /// Keep modules whose gradle path matches any of the patterns.
    PathPattern(Vec<String>),
}

impl ModuleFilter {
    pub fn accepts(&self, module: &ModuleInfo) -> bool {
        match self {
            ModuleFilter::PublishableOnly(true) => module.publishable,
            ModuleFilter::PublishableOnly(false) => true,
            ModuleFilter::HasDependencies(wanted) => module.has_dependencies() == *wanted,
            ModuleFilter::PathPattern(patterns) => patterns.iter().any(|p| {
                let pattern = Pattern::new(p);
                pattern.matches(&module.gradle_path)
                    || pattern.matches(module.gradle_path.trim_start_matches(':'))
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleSelectionConfig {
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub filters: Vec<ModuleFilter>,
    pub groups: BTreeMap<String, Vec<String>>,
    pub selected_groups: Vec<String>,
}

/// A `*`-wildcard pattern. Patterns that are not valid globs match by
/// exact name.
struct Pattern<'a> {
    raw: &'a str,
    glob: Option<GlobMatcher>,
}

impl<'a> Pattern<'a> {
    fn new(raw: &'a str) -> Self {
        let glob = match Glob::new(raw) {
            Ok(glob) => Some(glob.compile_matcher()),
            Err(e) => {
                tracing::debug!("Pattern '{raw}' is not a glob ({e}); matching exactly");
                None
            }
        };
        Self { raw, glob }
    }

    fn matches(&self, name: &str) -> bool {
        match &self.glob {
            Some(glob) => glob.is_match(name),
            None => self.raw == name,
        }
    }
}

/// Whether `pattern` is accepted by the glob syntax.
pub fn is_valid_pattern(pattern: &str) -> bool {
    !pattern.trim().is_empty() && Glob::new(pattern).is_ok()
}

impl ModuleSelectionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include_patterns.push(pattern.into());
        self
    }

    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    pub fn filter(mut self, filter: ModuleFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn group(mut self, name: impl Into<String>, modules: &[&str]) -> Self {
        self.groups
            .insert(name.into(), modules.iter().map(|m| m.to_string()).collect());
        self
    }

    pub fn select_group(mut self, name: impl Into<String>) -> Self {
        self.selected_groups.push(name.into());
        self
    }

    /// Build from the manifest's `[selection]` table. `extra_excludes`
    /// (typically `publishing.excludeModules`) are appended to the exclude
    /// patterns.
    pub fn from_settings<'a>(
        settings: &SelectionSettings,
        extra_excludes: impl IntoIterator<Item = &'a String>,
    ) -> Self {
        let mut exclude_patterns = settings.exclude.clone();
        for pattern in extra_excludes {
            if !exclude_patterns.contains(pattern) {
                exclude_patterns.push(pattern.clone());
            }
        }
        let mut filters = Vec::new();
        if let Some(publishable_only) = settings.publishable_only {
            filters.push(ModuleFilter::PublishableOnly(publishable_only));
        }
        Self {
            include_patterns: settings.include.clone(),
            exclude_patterns,
            filters,
            groups: settings.groups.clone(),
            selected_groups: settings.selected_groups.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.include_patterns.is_empty()
            && self.exclude_patterns.is_empty()
            && self.filters.is_empty()
            && self.selected_groups.is_empty()
    }

    /// Compute the selected modules, preserving structure order.
    pub fn select<'s>(&self, structure: &'s ModuleStructure) -> Vec<&'s ModuleInfo> {
        let includes: Vec<Pattern> = self.include_patterns.iter().map(|p| Pattern::new(p)).collect();
        let excludes: Vec<Pattern> = self.exclude_patterns.iter().map(|p| Pattern::new(p)).collect();

        let mut selected: Vec<&ModuleInfo> = structure
            .modules()
            .into_iter()
            .filter(|m| includes.is_empty() || includes.iter().any(|p| p.matches(&m.name)))
            .filter(|m| !excludes.iter().any(|p| p.matches(&m.name)))
            .filter(|m| self.filters.iter().all(|f| f.accepts(m)))
            .collect();

        if !self.selected_groups.is_empty() {
            let members: Vec<&String> = self
                .selected_groups
                .iter()
                .filter_map(|g| self.groups.get(g))
                .flatten()
                .collect();
            selected.retain(|m| members.iter().any(|name| **name == m.name));
        }

        tracing::debug!(
            "Selected {} of {} module(s)",
            selected.len(),
            structure.modules().len()
        );
        selected
    }

    /// Report every include pattern, exclude pattern and selected group that
    /// matches nothing in `structure`.
    pub fn validate_selection(&self, structure: &ModuleStructure) -> Vec<String> {
        let names: Vec<&str> = structure
            .modules()
            .into_iter()
            .map(|m| m.name.as_str())
            .collect();
        let matches_any = |raw: &str| {
            let pattern = Pattern::new(raw);
            names.iter().any(|n| pattern.matches(n))
        };

        let mut errors = Vec::new();
        for pattern in &self.include_patterns {
            if !matches_any(pattern) {
                errors.push(format!("Include pattern '{pattern}' matches no module"));
            }
        }
        for pattern in &self.exclude_patterns {
            if !matches_any(pattern) {
                errors.push(format!("Exclude pattern '{pattern}' matches no module"));
            }
        }
        for group in &self.selected_groups {
            match self.groups.get(group) {
                None => errors.push(format!("Module group '{group}' is not defined")),
                Some(members) if !members.iter().any(|m| names.contains(&m.as_str())) => {
                    errors.push(format!("Module group '{group}' contains no existing module"))
                }
                Some(_) => {}
            }
        }
        errors
    }
}
