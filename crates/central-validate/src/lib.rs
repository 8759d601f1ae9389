//! Validation of a resolved publisher configuration.
//!
//! Validators never stop at the first problem: the engine runs the whole
//! chain and returns every violation, so a user can fix everything in one
//! edit cycle. Only [`Severity::Error`] violations make a result invalid.

pub mod engine;
pub mod report;
pub mod rules;
pub mod suggestions;
pub mod violation;

pub use engine::{ValidationEngine, Validator};
pub use violation::{Category, Severity, ValidationResult, ValidationViolation};
