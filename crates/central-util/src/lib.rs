//! Shared utilities for central-publisher.
//!
//! Cross-cutting concerns used by every other crate in the workspace:
//! the unified error type, filesystem helpers, subprocess spawning with
//! timeouts, and terminal status output.

pub mod errors;
pub mod fs;
pub mod process;
pub mod progress;
