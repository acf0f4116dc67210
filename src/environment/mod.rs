//! SonarQube environment variables.
//!
//! [`vars`] names every variable injected into a build step and
//! [`resolver`] computes their values for one installation.

pub mod resolver;
pub mod vars;

pub use resolver::{
    assemble, expand, extra_properties, inject, maven_goal, resolve, resolve_installation,
    DEBUG_FLAG, DEFAULT_MAVEN_GOAL,
};
