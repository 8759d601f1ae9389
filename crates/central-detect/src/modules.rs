//! Module layout of a Gradle build, read from the settings file.
//!
//! Each `include` entry is resolved to a directory (`:libs:core` becomes
//! `libs/core`), classified as publishable by scanning its build file for a
//! maven-publish plugin, and scanned for `project(":x")` dependency edges.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use regex::Regex;
use serde::Serialize;

use crate::{text, Confidence, DetectionResult, Detector};

static INCLUDE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)\binclude\b\s*(?:\(([^)]*)\)|([^\n]*))").expect("valid regex")
});
static MAVEN_PUBLISH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\bid\s*\(?\s*["']maven-publish["']|`maven-publish`|\bapply\s*\(?\s*plugin\s*[:=]\s*["']maven-publish["']|com\.vanniktech\.maven\.publish|\bmaven-publish\b\s*$"#,
    )
    .expect("valid regex")
});
static PROJECT_DEPENDENCY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bproject\s*\(\s*(?:path\s*[:=]\s*)?["']:?([^"']+)["']"#).expect("valid regex")
});

/// How submodules relate to the root configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InheritanceStrategy {
    #[default]
    NoInheritance,
    RootOverrides,
    RootDefaults,
    Custom,
}

/// One Gradle project in the build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleInfo {
    /// Last path segment, e.g. `core` for `:libs:core`.
    pub name: String,
    /// Gradle path, e.g. `:libs:core`. The root module uses `:`.
    pub gradle_path: String,
    pub directory: PathBuf,
    pub build_file: Option<PathBuf>,
    pub publishable: bool,
    /// Gradle paths of other modules in this build that this one depends on.
    pub dependencies: Vec<String>,
}

impl ModuleInfo {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            gradle_path: format!(":{name}"),
            directory: PathBuf::from(&name),
            name,
            build_file: None,
            publishable: false,
            dependencies: Vec::new(),
        }
    }

    pub fn publishable(mut self, publishable: bool) -> Self {
        self.publishable = publishable;
        self
    }

    /// Add a dependency by name or Gradle path; `core` means `:core`.
    pub fn depends_on(mut self, dependency: impl AsRef<str>) -> Self {
        self.dependencies.push(absolute_path(dependency.as_ref()));
        self
    }

    pub fn has_dependencies(&self) -> bool {
        !self.dependencies.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleStructure {
    pub is_multi_module: bool,
    pub root_module: ModuleInfo,
    pub sub_modules: Vec<ModuleInfo>,
    pub inheritance_strategy: InheritanceStrategy,
    /// Declared modules that were dropped, with the reason.
    pub warnings: Vec<String>,
}

impl ModuleStructure {
    /// A single-module structure around `root`.
    pub fn single(root: ModuleInfo) -> Self {
        Self {
            is_multi_module: false,
            root_module: root,
            sub_modules: Vec::new(),
            inheritance_strategy: InheritanceStrategy::NoInheritance,
            warnings: Vec::new(),
        }
    }

    /// A multi-module structure with the default `RootOverrides` strategy.
    pub fn multi(root: ModuleInfo, sub_modules: Vec<ModuleInfo>) -> Self {
        Self {
            is_multi_module: true,
            root_module: root,
            sub_modules,
            inheritance_strategy: InheritanceStrategy::RootOverrides,
            warnings: Vec::new(),
        }
    }

    /// Modules subject to selection: the submodules of a multi-module build,
    /// or the root module otherwise.
    pub fn modules(&self) -> Vec<&ModuleInfo> {
        if self.is_multi_module {
            self.sub_modules.iter().collect()
        } else {
            vec![&self.root_module]
        }
    }

    pub fn publishable_modules(&self) -> Vec<&ModuleInfo> {
        self.modules().into_iter().filter(|m| m.publishable).collect()
    }

    pub fn non_publishable_modules(&self) -> Vec<&ModuleInfo> {
        self.modules().into_iter().filter(|m| !m.publishable).collect()
    }

    /// Look a module up by Gradle path, or by name when exactly one module
    /// carries that name.
    pub fn find(&self, key: &str) -> Option<&ModuleInfo> {
        let modules = self.modules();
        if let Some(module) = modules.iter().find(|m| m.gradle_path == key) {
            return Some(*module);
        }
        let mut named = modules.into_iter().filter(|m| m.name == key);
        match (named.next(), named.next()) {
            (Some(module), None) => Some(module),
            _ => None,
        }
    }

    /// Modules named `name`. More than one means the name is ambiguous.
    pub fn named(&self, name: &str) -> Vec<&ModuleInfo> {
        self.modules().into_iter().filter(|m| m.name == name).collect()
    }

    /// Artifact id for `module`: its name, or its path segments joined with
    /// `-` when another module shares the name (`:server:api` becomes
    /// `server-api`).
    pub fn artifact_id(&self, module: &ModuleInfo) -> String {
        if module.gradle_path == ":" || self.named(&module.name).len() <= 1 {
            return module.name.clone();
        }
        module
            .gradle_path
            .split(':')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }

    /// Publishable modules ordered so dependencies come before dependents.
    /// Falls back to declaration order when the dependency graph has a cycle.
    pub fn publish_order(&self) -> Vec<&ModuleInfo> {
        let publishable = self.publishable_modules();

        let mut graph: DiGraph<usize, ()> = DiGraph::new();
        let mut indices: HashMap<&str, NodeIndex> = HashMap::new();
        for (i, module) in publishable.iter().enumerate() {
            indices.insert(module.gradle_path.as_str(), graph.add_node(i));
        }
        for module in &publishable {
            let to = indices[module.gradle_path.as_str()];
            for dependency in &module.dependencies {
                if let Some(&from) = indices.get(dependency.as_str()) {
                    graph.add_edge(from, to, ());
                }
            }
        }

        match toposort(&graph, None) {
            Ok(order) => order.into_iter().map(|idx| publishable[graph[idx]]).collect(),
            Err(cycle) => {
                tracing::warn!(
                    "Dependency cycle involving module '{}'; using declaration order",
                    publishable[graph[cycle.node_id()]].gradle_path
                );
                publishable
            }
        }
    }
}

/// Gradle paths declared by `include` statements, in order.
///
/// Both `include("a", ":b")` and `include 'a', ':b'` spellings are
/// recognized. Leading colons are normalized away.
pub fn parse_includes(settings: &str) -> Vec<String> {
    let settings = text::strip_comments(settings);
    let mut paths = Vec::new();
    for cap in INCLUDE.captures_iter(&settings) {
        let args = cap.get(1).or_else(|| cap.get(2)).map_or("", |m| m.as_str());
        for path in text::quoted_strings(args) {
            let path = path.trim_start_matches(':').to_string();
            if !path.is_empty() && !paths.contains(&path) {
                paths.push(path);
            }
        }
    }
    paths
}

/// Whether a build script applies a maven-publish capability.
pub fn declares_maven_publish(script: &str) -> bool {
    let script = text::strip_comments(script);
    script.lines().any(|line| MAVEN_PUBLISH.is_match(line.trim()))
}

/// Gradle paths of modules referenced through `project(":x")`.
pub fn project_dependencies(script: &str) -> Vec<String> {
    let script = text::strip_comments(script);
    let mut paths: Vec<String> = Vec::new();
    for cap in PROJECT_DEPENDENCY.captures_iter(&script) {
        let path = absolute_path(&cap[1]);
        if !paths.contains(&path) {
            paths.push(path);
        }
    }
    paths
}

fn absolute_path(path: &str) -> String {
    format!(":{}", path.trim_matches(':'))
}

fn module_name(gradle_path: &str) -> &str {
    gradle_path
        .trim_matches(':')
        .rsplit(':')
        .next()
        .unwrap_or(gradle_path)
}

fn module_from_build(name: &str, gradle_path: String, directory: PathBuf) -> ModuleInfo {
    let build_file = text::build_file(&directory);
    let script = build_file
        .as_deref()
        .and_then(central_util::fs::read_optional)
        .unwrap_or_default();
    ModuleInfo {
        name: name.to_string(),
        gradle_path,
        directory,
        publishable: declares_maven_publish(&script),
        dependencies: project_dependencies(&script),
        build_file,
    }
}

/// Analyzes the module layout of a Gradle build.
pub struct ModuleStructureDetector;

impl ModuleStructureDetector {
    /// Read the settings file at `project_root` and classify every declared
    /// module. A missing or unreadable settings file means single-module.
    pub fn analyze(project_root: &Path) -> ModuleStructure {
        let root_name = crate::project_info::root_project_name(project_root)
            .or_else(|| {
                project_root
                    .canonicalize()
                    .ok()
                    .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            })
            .unwrap_or_else(|| "root".to_string());
        let root = module_from_build(&root_name, ":".to_string(), project_root.to_path_buf());

        let Some(settings) = text::settings_file(project_root) else {
            return ModuleStructure::single(root);
        };
        let Some(content) = central_util::fs::read_optional(&settings) else {
            return ModuleStructure::single(root);
        };

        let includes = parse_includes(&content);
        if includes.is_empty() {
            return ModuleStructure::single(root);
        }

        let mut sub_modules = Vec::new();
        let mut warnings = Vec::new();
        for path in includes {
            let directory = path
                .split(':')
                .filter(|s| !s.is_empty())
                .fold(project_root.to_path_buf(), |dir, segment| dir.join(segment));
            let name = module_name(&path);
            let module = module_from_build(name, format!(":{path}"), directory);
            if module.build_file.is_none() {
                let message = format!(
                    "Module ':{path}' declared in {} has no build file in {}",
                    text::label(&settings),
                    module.directory.display()
                );
                tracing::warn!("{message}");
                warnings.push(message);
                continue;
            }
            sub_modules.push(module);
        }

        let mut structure = ModuleStructure::multi(root, sub_modules);
        structure.warnings = warnings;
        structure
    }
}

impl Detector for ModuleStructureDetector {
    fn name(&self) -> &'static str {
        "module-structure"
    }

    fn detect(&self, project_root: &Path) -> Option<DetectionResult> {
        let structure = Self::analyze(project_root);
        if !structure.is_multi_module {
            return None;
        }
        let mut result = DetectionResult::new();
        let source = text::settings_file(project_root)
            .map(|p| text::label(&p))
            .unwrap_or_else(|| "settings".to_string());
        result.record(
            "publishing.aggregation",
            "true",
            &source,
            Confidence::Medium,
        );
        for warning in structure.warnings {
            result.warnings.push(warning);
        }
        Some(result)
    }
}
