//! Build step process execution.

pub mod command;

pub use command::{execute_masked, CommandOptions, CommandResult};
