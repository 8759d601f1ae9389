//! How a project's artifacts are laid out as Maven publications.
//!
//! Strategies are kept in a priority-ordered table; the first one that
//! applies to the project's [`ProjectKind`] wins. The catch-all JVM layout
//! sits at the bottom so every project gets a strategy.

use std::cmp::Reverse;

use serde::Serialize;

use central_core::project_kind::ProjectKind;

/// What goes into the `-javadoc.jar` classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum JavadocJar {
    /// Generated from the main sources.
    Generated,
    /// Placeholder jar; Central requires one even without Java sources.
    Empty,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicationStrategy {
    pub name: &'static str,
    pub priority: u32,
    /// Software component published as the main artifact, if any.
    pub component: Option<&'static str>,
    pub sources_jar: bool,
    pub javadoc_jar: JavadocJar,
    /// One publication per compilation target plus a root publication.
    pub per_target: bool,
    #[serde(skip)]
    applies: fn(ProjectKind) -> bool,
}

/// One Maven publication and the files it contributes to a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Publication {
    pub name: String,
    pub artifact_id: String,
    pub files: Vec<String>,
}

pub const KOTLIN_MULTIPLATFORM: PublicationStrategy = PublicationStrategy {
    name: "kotlin-multiplatform",
    priority: 100,
    component: None,
    sources_jar: true,
    javadoc_jar: JavadocJar::Empty,
    per_target: true,
    applies: is_multiplatform,
};

pub const JVM: PublicationStrategy = PublicationStrategy {
    name: "jvm",
    priority: 50,
    component: Some("java"),
    sources_jar: true,
    javadoc_jar: JavadocJar::Generated,
    per_target: false,
    applies: is_jvm,
};

/// Used when the build plugins say nothing useful.
pub const FALLBACK: PublicationStrategy = PublicationStrategy {
    name: "jvm-fallback",
    priority: 0,
    applies: any_kind,
    ..JVM
};

fn is_multiplatform(kind: ProjectKind) -> bool {
    kind == ProjectKind::KotlinMultiplatform
}

fn is_jvm(kind: ProjectKind) -> bool {
    kind == ProjectKind::Jvm
}

fn any_kind(_: ProjectKind) -> bool {
    true
}

pub const STRATEGIES: &[PublicationStrategy] = &[JVM, FALLBACK, KOTLIN_MULTIPLATFORM];

/// Strategy for `kind`: highest priority first, first applicable wins.
pub fn select_strategy(kind: ProjectKind) -> &'static PublicationStrategy {
    let mut ordered: Vec<&'static PublicationStrategy> = STRATEGIES.iter().collect();
    ordered.sort_by_key(|s| Reverse(s.priority));
    let strategy = ordered
        .into_iter()
        .find(|s| s.applies_to(kind))
        .unwrap_or(&FALLBACK);
    tracing::debug!("Publication strategy for {kind}: {}", strategy.name);
    strategy
}

impl PublicationStrategy {
    pub fn applies_to(&self, kind: ProjectKind) -> bool {
        (self.applies)(kind)
    }

    /// Publications for one module. `targets` only matters for per-target
    /// strategies; without targets only the root publication is listed.
    pub fn publications(
        &self,
        artifact_id: &str,
        version: &str,
        targets: &[String],
    ) -> Vec<Publication> {
        if !self.per_target {
            return vec![Publication {
                name: "maven".to_string(),
                artifact_id: artifact_id.to_string(),
                files: self.files(artifact_id, version, Some("jar")),
            }];
        }

        let mut publications = vec![Publication {
            name: "kotlinMultiplatform".to_string(),
            artifact_id: artifact_id.to_string(),
            // The root publication carries Gradle metadata only.
            files: self.files(artifact_id, version, None),
        }];
        for target in targets {
            let target_artifact = format!("{artifact_id}-{}", target.to_ascii_lowercase());
            let extension = if target.eq_ignore_ascii_case("jvm") || target.starts_with("android")
            {
                "jar"
            } else {
                "klib"
            };
            publications.push(Publication {
                name: target.clone(),
                files: self.files(&target_artifact, version, Some(extension)),
                artifact_id: target_artifact,
            });
        }
        publications
    }

    fn files(&self, artifact_id: &str, version: &str, main: Option<&str>) -> Vec<String> {
        let base = format!("{artifact_id}-{version}");
        let mut files = vec![format!("{base}.pom"), format!("{base}.module")];
        if let Some(extension) = main {
            files.push(format!("{base}.{extension}"));
        }
        if self.sources_jar {
            files.push(format!("{base}-sources.jar"));
        }
        files.push(format!("{base}-javadoc.jar"));
        files
    }
}
