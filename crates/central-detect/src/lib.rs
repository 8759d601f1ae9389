//! Auto-detection of publishing configuration from a project on disk.
//!
//! Every [`Detector`] inspects the project directory and returns a partial
//! [`CentralPublisherConfig`] together with an audit map of
//! [`DetectedValue`]s. Detectors never fail: a missing prerequisite (no
//! `.git`, no settings file) yields `None`, and unreadable or malformed
//! inputs degrade to "no contribution" plus a warning string.

pub mod git;
pub mod modules;
pub mod project_info;
pub mod project_kind;
pub mod selection;
mod text;

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use central_core::cache::FileCache;
use central_core::merge::FillBlanks;
use central_core::model::CentralPublisherConfig;

/// How trustworthy a detected value's source is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Confidence::Low => "LOW",
            Confidence::Medium => "MEDIUM",
            Confidence::High => "HIGH",
        })
    }
}

/// One auto-detected value, kept for review and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedValue {
    /// Dotted config path, e.g. `projectInfo.scm.url`.
    pub path: String,
    pub value: String,
    /// Where the value came from, e.g. `.git/config`.
    pub source: String,
    pub confidence: Confidence,
}

/// Output of a detector: a partial config plus its audit trail.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DetectionResult {
    pub config: CentralPublisherConfig,
    pub detected_values: BTreeMap<String, DetectedValue>,
    pub warnings: Vec<String>,
}

impl DetectionResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `path` in the partial config and record where it came from.
    /// Blank values and unknown paths are ignored, and a value already
    /// recorded with equal or higher confidence is kept.
    pub fn record(&mut self, path: &str, value: &str, source: &str, confidence: Confidence) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        if self
            .detected_values
            .get(path)
            .is_some_and(|existing| existing.confidence >= confidence)
        {
            return;
        }
        if !self.config.set_field(path, value) {
            tracing::debug!("Detector produced unknown path {path}");
            return;
        }
        self.detected_values.insert(
            path.to_string(),
            DetectedValue {
                path: path.to_string(),
                value: value.to_string(),
                source: source.to_string(),
                confidence,
            },
        );
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{message}");
        self.warnings.push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.detected_values.is_empty() && self.warnings.is_empty()
    }

    /// Combine with a later (lower-precedence) result using fill-blanks
    /// semantics. Only detected values that survived into the merged config
    /// are kept, so the audit map always describes the final partial config.
    pub fn combine(&self, lower: &DetectionResult) -> DetectionResult {
        let config = self.config.fill_blanks(&lower.config);
        let leaves: BTreeMap<String, String> = config.leaves().into_iter().collect();

        let mut detected_values = BTreeMap::new();
        for candidate in self
            .detected_values
            .values()
            .chain(lower.detected_values.values())
        {
            if detected_values.contains_key(&candidate.path) {
                continue;
            }
            if leaves.get(&candidate.path) == Some(&candidate.value) {
                detected_values.insert(candidate.path.clone(), candidate.clone());
            }
        }

        let mut warnings = self.warnings.clone();
        warnings.extend(lower.warnings.iter().cloned());

        DetectionResult {
            config,
            detected_values,
            warnings,
        }
    }
}

/// A pluggable inspector of the project directory.
pub trait Detector: Send + Sync {
    fn name(&self) -> &'static str;

    /// Inspect `project_root`. Returns `None` when the detector's
    /// prerequisite is absent.
    fn detect(&self, project_root: &Path) -> Option<DetectionResult>;
}

/// Detector settings shared by the standard registry.
#[derive(Debug, Clone)]
pub struct DetectionOptions {
    pub git_timeout: Duration,
    pub global_git: bool,
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            git_timeout: Duration::from_secs(3),
            global_git: true,
        }
    }
}

/// Ordered collection of detectors. Earlier detectors win on conflicts.
#[derive(Default)]
pub struct DetectorRegistry {
    detectors: Vec<Box<dyn Detector>>,
}

impl DetectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Git, project-info and module-structure detectors, in that order.
    pub fn standard(options: &DetectionOptions, cache: Option<Arc<FileCache>>) -> Self {
        let mut git = git::GitDetector::new()
            .with_timeout(options.git_timeout)
            .with_global_fallback(options.global_git);
        if let Some(cache) = cache {
            git = git.with_cache(cache);
        }
        Self::new()
            .register(git)
            .register(project_info::ProjectInfoDetector)
            .register(modules::ModuleStructureDetector)
    }

    pub fn register(mut self, detector: impl Detector + 'static) -> Self {
        self.detectors.push(Box::new(detector));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Run every detector and combine the results.
    pub fn detect_all(&self, project_root: &Path) -> DetectionResult {
        self.detectors
            .iter()
            .fold(DetectionResult::new(), |acc, detector| {
                match detector.detect(project_root) {
                    Some(result) => {
                        tracing::debug!(
                            "{} detected {} value(s)",
                            detector.name(),
                            result.detected_values.len()
                        );
                        acc.combine(&result)
                    }
                    None => {
                        tracing::debug!("{} not applicable", detector.name());
                        acc
                    }
                }
            })
    }
}
