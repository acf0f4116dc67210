//! Build step orchestration.
//!
//! A [`BuildWrapper`] prepares a build step: it injects the `SONAR_*`
//! variables of one installation and wraps the step's output in a
//! secret-masking filter.

pub mod wrapper;

pub use wrapper::{step_secrets, BuildWrapper, SonarEnvironment};
