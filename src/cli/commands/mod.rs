//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. Configuration loading and
//! installation selection are shared through [`context`].

pub mod completions;
pub mod context;
pub mod dispatcher;
pub mod env;
pub mod list;
pub mod mask;
pub mod run;

pub use context::CommandContext;
pub use dispatcher::{Command, CommandDispatcher, CommandResult};
