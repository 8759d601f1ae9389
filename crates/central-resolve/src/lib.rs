//! Configuration resolution: layered sources, smart defaults, provenance.

pub mod defaults;
pub mod manager;
pub mod provenance;

pub use defaults::{ProjectContext, SmartDefaultProvider, SmartDefaults};
pub use manager::{ConfigSourceManager, Resolution};
pub use provenance::{ConfigSource, FieldSource, Provenance};
