use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all central-publisher operations.
#[derive(Debug, Error, Diagnostic)]
pub enum CentralError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value or unreadable configuration source.
    #[error("Configuration error: {message}")]
    #[diagnostic(help("Check central-publisher.toml and your gradle.properties files"))]
    Config { message: String },

    /// Malformed `central-publisher.toml`.
    #[error("Manifest error: {message}")]
    #[diagnostic(help("Check central-publisher.toml for syntax errors"))]
    Manifest { message: String },

    /// Project inspection failed in a way that cannot be degraded.
    #[error("Detection failed: {message}")]
    Detection { message: String },

    /// Module selection references modules or groups that do not exist.
    #[error("Module selection error: {message}")]
    Selection { message: String },

    /// Validation reported blocking errors.
    #[error("Validation failed with {errors} error(s) and {warnings} warning(s)")]
    #[diagnostic(help("Run `central-publish validate` to see every violation"))]
    Validation { errors: usize, warnings: usize },

    /// External process could not be spawned or polled.
    #[error("Process error: {message}")]
    Process { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type CentralResult<T> = miette::Result<T>;
