//! Project kind classification from declared plugin ids.
//!
//! The root build file's plugin declarations are reduced to a list of ids
//! (`kotlin("jvm")` becomes `org.jetbrains.kotlin.jvm`, version-catalog
//! aliases become `alias:<name>`), then a priority-ordered rule table picks
//! the first applicable kind.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use central_core::project_kind::ProjectKind;

use crate::text;

static KOTLIN_SHORTHAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bkotlin\s*\(\s*"([\w.\-]+)"\s*\)"#).expect("valid regex"));
static PLUGIN_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bid\s*\(?\s*["']([\w.\-]+)["']"#).expect("valid regex")
});
static APPLY_PLUGIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bapply\s*\(?\s*plugin\s*[:=]\s*["']([\w.\-]+)["']"#).expect("valid regex")
});
static BACKTICK_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([\w.\-]+)`").expect("valid regex"));
static BARE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(java|application|java-library)\s*$").expect("valid regex")
});
static CATALOG_ALIAS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\balias\s*\(\s*libs\.plugins\.([\w.]+)\s*\)").expect("valid regex")
});

/// Extract plugin ids declared in a build script, in order of appearance
/// within each spelling, without duplicates.
pub fn declared_plugins(script: &str) -> Vec<String> {
    let script = text::strip_comments(script);
    let mut ids: Vec<String> = Vec::new();
    let mut push = |id: String| {
        if !ids.contains(&id) {
            ids.push(id);
        }
    };

    for cap in KOTLIN_SHORTHAND.captures_iter(&script) {
        push(format!("org.jetbrains.kotlin.{}", &cap[1]));
    }
    for re in [&*PLUGIN_ID, &*APPLY_PLUGIN, &*BACKTICK_ID, &*BARE_ID] {
        for cap in re.captures_iter(&script) {
            push(cap[1].to_string());
        }
    }
    for cap in CATALOG_ALIAS.captures_iter(&script) {
        push(format!("alias:{}", &cap[1]));
    }
    ids
}

/// One entry of the classification table.
pub struct KindRule {
    pub kind: ProjectKind,
    pub priority: u32,
    matches: fn(&str) -> bool,
}

impl KindRule {
    pub fn applies(&self, plugins: &[String]) -> bool {
        plugins.iter().any(|p| (self.matches)(p))
    }
}

fn is_multiplatform(id: &str) -> bool {
    id == "org.jetbrains.kotlin.multiplatform"
        || (id.starts_with("alias:") && id.contains("multiplatform"))
}

fn is_jvm(id: &str) -> bool {
    matches!(
        id,
        "org.jetbrains.kotlin.jvm" | "java" | "java-library" | "application"
    ) || (id.starts_with("alias:")
        && (id.ends_with("kotlin.jvm") || id.ends_with("kotlinJvm") || id.ends_with("kotlin-jvm")))
}

/// Classification rules, highest priority first.
pub static KIND_RULES: &[KindRule] = &[
    KindRule {
        kind: ProjectKind::KotlinMultiplatform,
        priority: 100,
        matches: is_multiplatform,
    },
    KindRule {
        kind: ProjectKind::Jvm,
        priority: 50,
        matches: is_jvm,
    },
];

/// Pick the kind of the highest-priority applicable rule.
pub fn classify(plugins: &[String]) -> ProjectKind {
    let mut rules: Vec<&KindRule> = KIND_RULES.iter().collect();
    rules.sort_by(|a, b| b.priority.cmp(&a.priority));
    rules
        .into_iter()
        .find(|r| r.applies(plugins))
        .map(|r| r.kind)
        .unwrap_or(ProjectKind::Unknown)
}

/// Classify the project at `project_root` from its root build file.
pub fn detect_project_kind(project_root: &Path) -> ProjectKind {
    let Some(build_file) = text::build_file(project_root) else {
        return ProjectKind::Unknown;
    };
    match central_util::fs::read_optional(&build_file) {
        Some(script) => classify(&declared_plugins(&script)),
        None => ProjectKind::Unknown,
    }
}
