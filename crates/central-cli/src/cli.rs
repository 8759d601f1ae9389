//! CLI argument definitions for central-publish.
//!
//! Uses `clap` derive macros to define the command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "central-publish",
    version,
    about = "Resolve, validate and plan Maven Central publishing for Gradle projects",
    long_about = "central-publish merges central-publisher.toml, the environment, \
                  gradle.properties files, auto-detected project facts and smart defaults \
                  into one publishing configuration, validates it against the Central \
                  Portal's requirements and plans the deployment bundles."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate the resolved publishing configuration
    Validate {
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Show what auto-detection finds in the project
    Detect {
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Show the resolved configuration and where each value came from
    Config {
        /// Print secrets unmasked
        #[arg(long)]
        reveal: bool,
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// List modules and which of them would be published
    Modules {
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Preview the POM metadata of a module
    Pom {
        /// Module name (defaults to the root project)
        #[arg(short, long)]
        module: Option<String>,
        /// Write the POM to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Plan a Central Portal deployment without uploading anything
    Plan {
        /// Only publish modules matching these patterns
        #[arg(long)]
        include: Vec<String>,
        /// Skip modules matching these patterns
        #[arg(long)]
        exclude: Vec<String>,
        /// List every bundle entry
        #[arg(long)]
        entries: bool,
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Interactive setup wizard
    Setup,
}

pub fn parse() -> Cli {
    Cli::parse()
}
