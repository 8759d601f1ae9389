use central_core::model::CentralPublisherConfig;

use crate::rules::{
    DeveloperValidator, LicenseValidator, ProjectMetadataValidator, PublishingValidator,
    RequiredFieldValidator, ScmValidator, SigningValidator,
};
use crate::violation::{ValidationResult, ValidationViolation};

/// One rule set in the validation chain.
pub trait Validator: Send + Sync {
    fn name(&self) -> &'static str;

    fn validate(&self, config: &CentralPublisherConfig) -> Vec<ValidationViolation>;
}

/// Runs every registered validator and collects all violations.
#[derive(Default)]
pub struct ValidationEngine {
    validators: Vec<Box<dyn Validator>>,
}

impl ValidationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Required fields first, then project metadata, license, developers,
    /// SCM, signing and publishing rules.
    pub fn standard() -> Self {
        Self::new()
            .register(RequiredFieldValidator)
            .register(ProjectMetadataValidator)
            .register(LicenseValidator)
            .register(DeveloperValidator)
            .register(ScmValidator)
            .register(SigningValidator)
            .register(PublishingValidator)
    }

    pub fn register(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.validators.iter().map(|v| v.name()).collect()
    }

    pub fn validate(&self, config: &CentralPublisherConfig) -> ValidationResult {
        let mut result = ValidationResult::new();
        for validator in &self.validators {
            let violations = validator.validate(config);
            tracing::debug!("{}: {} violation(s)", validator.name(), violations.len());
            result.violations.extend(violations);
        }
        tracing::info!(
            "Validation finished: {} error(s), {} warning(s), {} info",
            result.errors().len(),
            result.warnings().len(),
            result.infos().len()
        );
        result
    }
}
