use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of build a project uses, which decides how its publications
/// are laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectKind {
    /// Plain JVM library (`java`, `java-library` or `kotlin("jvm")`).
    Jvm,
    /// Kotlin Multiplatform (`kotlin("multiplatform")`).
    KotlinMultiplatform,
    #[default]
    Unknown,
}

impl ProjectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectKind::Jvm => "jvm",
            ProjectKind::KotlinMultiplatform => "kotlin-multiplatform",
            ProjectKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
