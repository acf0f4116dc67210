//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// sonar-env - SonarQube environment injection for CI build steps.
#[derive(Debug, Parser)]
#[command(name = "sonar-env")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides the merged .sonar-env/config.yml layers)
    #[arg(short, long, global = true, env = "SONAR_ENV_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the SONAR_* variables of an installation
    Env(EnvArgs),

    /// Run a build step with the variables injected and its output masked
    Run(RunArgs),

    /// Mask an installation's secrets in stdin, writing to stdout
    Mask(MaskArgs),

    /// List configured installations (default if no command specified)
    List(ListArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Output format of the `env` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum EnvFormat {
    /// `export NAME='value'` lines for `eval`
    #[default]
    Shell,
    /// `NAME="value"` lines
    Dotenv,
    /// A JSON object
    Json,
}

/// Arguments for the `env` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct EnvArgs {
    /// Installation to use (defaults to the only configured one)
    #[arg(short, long)]
    pub installation: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = EnvFormat::Shell)]
    pub format: EnvFormat,

    /// Replace secret values with ******
    #[arg(long)]
    pub mask: bool,
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RunArgs {
    /// Installation to use (defaults to the only configured one)
    #[arg(short, long)]
    pub installation: Option<String>,

    /// Build step command and its arguments
    #[arg(last = true, required = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

/// Arguments for the `mask` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct MaskArgs {
    /// Installation whose secrets are masked (defaults to the only configured one)
    #[arg(short, long)]
    pub installation: Option<String>,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
