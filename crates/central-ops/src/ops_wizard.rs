//! Operation: the interactive setup wizard, as a state machine.
//!
//! [`advance`] is pure: it takes the current state, the collected context
//! and one input, and returns the next state, the updated context and the
//! validation result of the step. Prompting lives in the CLI; writing the
//! answers to disk lives in [`persist`].

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use toml_edit::{Array, ArrayOfTables, DocumentMut, Item, Table, Value};

use central_core::manifest::MANIFEST_FILE;
use central_core::model::{
    is_blank, mask_secret, provenance_key, CentralPublisherConfig, DeveloperInfo, Flag,
};
use central_core::properties::upsert_properties;
use central_resolve::{ConfigSource, Provenance};
use central_util::errors::CentralError;
use central_validate::{ValidationEngine, ValidationResult, ValidationViolation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WizardState {
    Welcome,
    ProjectInfo,
    Credentials,
    Signing,
    Review,
    Test,
}

impl WizardState {
    pub const ALL: [WizardState; 6] = [
        WizardState::Welcome,
        WizardState::ProjectInfo,
        WizardState::Credentials,
        WizardState::Signing,
        WizardState::Review,
        WizardState::Test,
    ];

    fn position(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn next(self) -> Option<WizardState> {
        Self::ALL.get(self.position() + 1).copied()
    }

    pub fn previous(self) -> Option<WizardState> {
        self.position().checked_sub(1).map(|i| Self::ALL[i])
    }

    /// 1-based step number.
    pub fn step(self) -> usize {
        self.position() + 1
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardState::Welcome => "Welcome",
            WizardState::ProjectInfo => "Project information",
            WizardState::Credentials => "Portal credentials",
            WizardState::Signing => "Artifact signing",
            WizardState::Review => "Review",
            WizardState::Test => "Test",
        }
    }

    /// Config subtree this step is responsible for.
    fn field_prefix(self) -> Option<&'static str> {
        match self {
            WizardState::ProjectInfo => Some("projectInfo"),
            WizardState::Credentials => Some("credentials"),
            WizardState::Signing => Some("signing"),
            _ => None,
        }
    }
}

impl fmt::Display for WizardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}/{}] {}", self.step(), Self::ALL.len(), self.title())
    }
}

/// Answers for the project-info step. Blank answers keep the current value.
#[derive(Debug, Clone, Default)]
pub struct ProjectAnswers {
    pub name: String,
    pub description: String,
    pub url: String,
    pub license_name: String,
    pub license_url: String,
    pub developer_id: String,
    pub developer_name: String,
    pub developer_email: String,
}

/// Answers for the signing step. Blank answers keep the current value.
#[derive(Clone, Default)]
pub struct SigningAnswers {
    pub key: String,
    pub key_id: String,
    pub password: String,
    pub secret_key_ring_file: String,
}

impl fmt::Debug for SigningAnswers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningAnswers")
            .field("key", &mask_secret(&self.key))
            .field("key_id", &self.key_id)
            .field("password", &mask_secret(&self.password))
            .field("secret_key_ring_file", &self.secret_key_ring_file)
            .finish()
    }
}

#[derive(Clone)]
pub enum WizardInput {
    Continue,
    Back,
    ProjectInfo(ProjectAnswers),
    Credentials { username: String, password: String },
    Signing(SigningAnswers),
}

impl WizardInput {
    /// Variant name, safe to show: never includes the answers.
    pub fn label(&self) -> &'static str {
        match self {
            WizardInput::Continue => "Continue",
            WizardInput::Back => "Back",
            WizardInput::ProjectInfo(_) => "Project answers",
            WizardInput::Credentials { .. } => "Credentials",
            WizardInput::Signing(_) => "Signing answers",
        }
    }
}

impl fmt::Debug for WizardInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything collected so far.
#[derive(Debug, Clone, Default)]
pub struct WizardContext {
    pub config: CentralPublisherConfig,
    /// Where each starting value came from.
    pub provenance: Provenance,
    /// Provenance keys of the fields the user typed an answer for.
    pub answered: BTreeSet<String>,
    /// Set once the test step passed.
    pub completed: bool,
}

impl WizardContext {
    /// Start from an already resolved config so detected values become the
    /// suggested answers.
    pub fn new(config: CentralPublisherConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Like [`new`](Self::new), remembering the source of every value.
    pub fn with_provenance(config: CentralPublisherConfig, provenance: Provenance) -> Self {
        Self {
            config,
            provenance,
            ..Self::default()
        }
    }

    /// Whether [`persist`] writes the field at `path`: the user answered it,
    /// or it already lives in the manifest. Values from the environment,
    /// properties files, detection and smart defaults stay where they are.
    pub fn should_persist(&self, path: &str) -> bool {
        self.answered.contains(provenance_key(path))
            || self
                .provenance
                .source_of(path)
                .is_some_and(|s| s.source == ConfigSource::Dsl)
    }
}

#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub state: WizardState,
    pub context: WizardContext,
    pub validation: ValidationResult,
}

/// Apply `input` in `state`. A step whose validation reports an error stays
/// on the same state.
pub fn advance(state: WizardState, context: WizardContext, input: WizardInput) -> StepOutcome {
    let mut context = context;
    match (state, input) {
        (_, WizardInput::Back) => StepOutcome {
            state: state.previous().unwrap_or(state),
            context,
            validation: ValidationResult::new(),
        },
        (WizardState::Welcome, WizardInput::Continue) => {
            step_result(state, context, ValidationResult::new())
        }
        (WizardState::ProjectInfo, WizardInput::ProjectInfo(answers)) => {
            apply_project(&mut context, answers);
            let validation = validate_step(state, &context.config);
            step_result(state, context, validation)
        }
        (WizardState::Credentials, WizardInput::Credentials { username, password }) => {
            let credentials = &mut context.config.credentials;
            let answered = &mut context.answered;
            answer(answered, "credentials.username", &mut credentials.username, username);
            answer(answered, "credentials.password", &mut credentials.password, password);
            let validation = validate_step(state, &context.config);
            step_result(state, context, validation)
        }
        (WizardState::Signing, WizardInput::Signing(answers)) => {
            let signing = &mut context.config.signing;
            let answered = &mut context.answered;
            answer(answered, "signing.key", &mut signing.key, answers.key);
            answer(answered, "signing.keyId", &mut signing.key_id, answers.key_id);
            answer(answered, "signing.password", &mut signing.password, answers.password);
            answer(
                answered,
                "signing.secretKeyRingFile",
                &mut signing.secret_key_ring_file,
                answers.secret_key_ring_file,
            );
            let validation = validate_step(state, &context.config);
            step_result(state, context, validation)
        }
        (WizardState::Signing, WizardInput::Continue) => {
            let validation = validate_step(state, &context.config);
            step_result(state, context, validation)
        }
        (WizardState::Review, WizardInput::Continue) => {
            let validation = ValidationEngine::standard().validate(&context.config);
            step_result(state, context, validation)
        }
        (WizardState::Test, WizardInput::Continue) => {
            let validation = ValidationEngine::standard().validate(&context.config);
            context.completed = validation.is_valid();
            StepOutcome {
                state,
                context,
                validation,
            }
        }
        (state, input) => {
            let mut validation = ValidationResult::new();
            validation.push(ValidationViolation::error(
                "WIZ-UNEXPECTED_INPUT",
                "wizard",
                format!(
                    "{} is not an answer to the '{}' step",
                    input.label(),
                    state.title()
                ),
            ));
            StepOutcome {
                state,
                context,
                validation,
            }
        }
    }
}

fn step_result(
    state: WizardState,
    context: WizardContext,
    validation: ValidationResult,
) -> StepOutcome {
    let state = if validation.is_valid() {
        state.next().unwrap_or(state)
    } else {
        state
    };
    StepOutcome {
        state,
        context,
        validation,
    }
}

/// Standard validation narrowed to the fields `state` collects.
pub fn validate_step(state: WizardState, config: &CentralPublisherConfig) -> ValidationResult {
    let full = ValidationEngine::standard().validate(config);
    match state.field_prefix() {
        Some(prefix) => ValidationResult::from_violations(
            full.violations
                .into_iter()
                .filter(|v| v.field.starts_with(prefix))
                .collect(),
        ),
        None => full,
    }
}

/// Store a non-blank answer in `slot` and mark `path` as answered. A blank
/// answer keeps the current value.
fn answer(answered: &mut BTreeSet<String>, path: &str, slot: &mut String, value: String) {
    if !is_blank(&value) {
        *slot = value.trim().to_string();
        answered.insert(provenance_key(path).to_string());
    }
}

fn apply_project(context: &mut WizardContext, answers: ProjectAnswers) {
    let info = &mut context.config.project_info;
    let answered = &mut context.answered;
    answer(answered, "projectInfo.name", &mut info.name, answers.name);
    answer(
        answered,
        "projectInfo.description",
        &mut info.description,
        answers.description,
    );
    answer(answered, "projectInfo.url", &mut info.url, answers.url);
    answer(
        answered,
        "projectInfo.license.name",
        &mut info.license.name,
        answers.license_name,
    );
    answer(
        answered,
        "projectInfo.license.url",
        &mut info.license.url,
        answers.license_url,
    );

    let has_developer = !is_blank(&answers.developer_id)
        || !is_blank(&answers.developer_name)
        || !is_blank(&answers.developer_email);
    if has_developer {
        if info.developers.is_empty() {
            info.developers.push(DeveloperInfo::default());
        }
        let dev = &mut info.developers[0];
        let base = "projectInfo.developers[0]";
        answer(answered, &format!("{base}.id"), &mut dev.id, answers.developer_id);
        answer(answered, &format!("{base}.name"), &mut dev.name, answers.developer_name);
        answer(
            answered,
            &format!("{base}.email"),
            &mut dev.email,
            answers.developer_email,
        );
    }
}

/// Where [`persist`] wrote the wizard's answers.
#[derive(Debug, Clone, Serialize)]
pub struct PersistSummary {
    pub manifest: PathBuf,
    pub properties: Option<PathBuf>,
    /// Property keys written, never their values.
    pub secret_keys: Vec<&'static str>,
}

/// Write non-secret answers to the project's `central-publisher.toml`
/// (format-preserving) and secrets to `properties_file`. Secrets already
/// present in the manifest are moved out of it. Only fields accepted by
/// [`WizardContext::should_persist`] are written.
pub fn persist(
    project_root: &Path,
    context: &WizardContext,
    properties_file: &Path,
) -> miette::Result<PersistSummary> {
    let config = &context.config;
    let manifest = project_root.join(MANIFEST_FILE);
    let content = central_util::fs::read_optional(&manifest).unwrap_or_default();
    let mut doc: DocumentMut = content.parse().map_err(|e| CentralError::Manifest {
        message: format!("Failed to parse {MANIFEST_FILE}: {e}"),
    })?;

    write_manifest_fields(&mut doc, context);
    std::fs::write(&manifest, doc.to_string()).map_err(|e| CentralError::Manifest {
        message: format!("Failed to write {}: {e}", manifest.display()),
    })?;

    let secrets: Vec<(&'static str, &str)> = [
        ("SONATYPE_USERNAME", "credentials.username", &config.credentials.username),
        ("SONATYPE_PASSWORD", "credentials.password", &config.credentials.password),
        ("SIGNING_KEY", "signing.key", &config.signing.key),
        ("SIGNING_PASSWORD", "signing.password", &config.signing.password),
    ]
    .into_iter()
    .filter(|(_, path, value)| !is_blank(value) && context.should_persist(path))
    .map(|(key, _, value)| (key, value.as_str()))
    .collect();

    let properties = if secrets.is_empty() {
        None
    } else {
        upsert_properties(properties_file, &secrets)?;
        Some(properties_file.to_path_buf())
    };
    tracing::info!(
        "Saved setup to {} ({} secret(s) stored separately)",
        manifest.display(),
        secrets.len()
    );

    Ok(PersistSummary {
        manifest,
        properties,
        secret_keys: secrets.iter().map(|(key, _)| *key).collect(),
    })
}

fn write_manifest_fields(doc: &mut DocumentMut, context: &WizardContext) {
    let config = &context.config;
    let info = &config.project_info;
    let strings: [(&[&str], &str, &str, &String); 11] = [
        (&["project"], "name", "projectInfo.name", &info.name),
        (&["project"], "description", "projectInfo.description", &info.description),
        (&["project"], "url", "projectInfo.url", &info.url),
        (&["project", "license"], "name", "projectInfo.license.name", &info.license.name),
        (&["project", "license"], "url", "projectInfo.license.url", &info.license.url),
        (
            &["project", "license"],
            "distribution",
            "projectInfo.license.distribution",
            &info.license.distribution,
        ),
        (&["project", "scm"], "url", "projectInfo.scm.url", &info.scm.url),
        (
            &["project", "scm"],
            "connection",
            "projectInfo.scm.connection",
            &info.scm.connection,
        ),
        (
            &["project", "scm"],
            "developer-connection",
            "projectInfo.scm.developerConnection",
            &info.scm.developer_connection,
        ),
        (&["signing"], "key-id", "signing.keyId", &config.signing.key_id),
        (
            &["signing"],
            "secret-key-ring-file",
            "signing.secretKeyRingFile",
            &config.signing.secret_key_ring_file,
        ),
    ];
    for (tables, key, path, value) in strings {
        if context.should_persist(path) {
            set_string(doc, tables, key, value);
        }
    }

    if !info.developers.is_empty() && context.should_persist("projectInfo.developers") {
        let mut developers = ArrayOfTables::new();
        for dev in &info.developers {
            developers.push(developer_table(dev));
        }
        if let Some(project) = ensure_table(doc, &["project"]) {
            project.insert("developers", Item::ArrayOfTables(developers));
        }
    }

    let publishing = &config.publishing;
    for (key, path, flag) in [
        ("auto-publish", "publishing.autoPublish", publishing.auto_publish),
        ("aggregation", "publishing.aggregation", publishing.aggregation),
        ("dry-run", "publishing.dryRun", publishing.dry_run),
    ] {
        if context.should_persist(path) {
            set_flag(doc, key, flag);
        }
    }
    if !publishing.exclude_modules.is_empty()
        && context.should_persist("publishing.excludeModules")
    {
        let excludes: Array = publishing.exclude_modules.iter().map(String::as_str).collect();
        if let Some(table) = ensure_table(doc, &["publishing"]) {
            table.insert("exclude-modules", Item::Value(Value::Array(excludes)));
        }
    }

    doc.remove("credentials");
    if let Some(signing) = doc.get_mut("signing").and_then(Item::as_table_mut) {
        signing.remove("key");
        signing.remove("password");
    }
}

fn developer_table(dev: &DeveloperInfo) -> Table {
    let mut table = Table::new();
    let optional = [
        ("id", Some(dev.id.as_str())),
        ("name", Some(dev.name.as_str())),
        ("email", Some(dev.email.as_str())),
        ("organization", dev.organization.as_deref()),
        ("organization-url", dev.organization_url.as_deref()),
        ("timezone", dev.timezone.as_deref()),
    ];
    for (key, value) in optional {
        if let Some(value) = value.filter(|v| !is_blank(v)) {
            table.insert(key, Item::Value(Value::from(value)));
        }
    }
    if !dev.roles.is_empty() {
        let roles: Array = dev.roles.iter().map(String::as_str).collect();
        table.insert("roles", Item::Value(Value::Array(roles)));
    }
    table
}

fn set_string(doc: &mut DocumentMut, tables: &[&str], key: &str, value: &str) {
    if is_blank(value) {
        return;
    }
    if let Some(table) = ensure_table(doc, tables) {
        table.insert(key, Item::Value(Value::from(value.trim())));
    }
}

fn set_flag(doc: &mut DocumentMut, key: &str, flag: Flag) {
    if let Some(value) = flag.value() {
        if let Some(table) = ensure_table(doc, &["publishing"]) {
            table.insert(key, Item::Value(Value::from(value)));
        }
    }
}

/// Ensure a nested table path exists in the document and return it.
fn ensure_table<'d>(doc: &'d mut DocumentMut, keys: &[&str]) -> Option<&'d mut Table> {
    let mut current: &mut Table = doc.as_table_mut();
    for &key in keys {
        if !current.contains_key(key) {
            current.insert(key, Item::Table(Table::new()));
        }
        current = match current.get_mut(key) {
            Some(Item::Table(t)) => t,
            _ => return None,
        };
    }
    Some(current)
}
