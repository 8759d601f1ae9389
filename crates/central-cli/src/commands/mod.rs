//! Command dispatch and handler modules.

mod config;
mod detect;
mod modules;
mod plan;
mod pom;
mod setup;
mod validate;

use std::path::PathBuf;

use miette::Result;
use serde::Serialize;

use central_util::errors::CentralError;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Validate { format } => validate::exec(format),
        Command::Detect { format } => detect::exec(format),
        Command::Config { reveal, format } => config::exec(reveal, format),
        Command::Modules { format } => modules::exec(format),
        Command::Pom { module, output } => pom::exec(module.as_deref(), output.as_deref()),
        Command::Plan {
            include,
            exclude,
            entries,
            format,
        } => plan::exec(&include, &exclude, entries, format),
        Command::Setup => setup::exec(),
    }
}

/// The project containing the working directory.
fn project_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir().map_err(CentralError::Io)?;
    let root = central_ops::ops_resolve::find_project_root(&cwd);
    tracing::debug!("Project root: {}", root.display());
    Ok(root)
}

fn print_json(value: &impl Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CentralError::Generic {
        message: format!("Failed to serialize output: {e}"),
    })?;
    println!("{json}");
    Ok(())
}
