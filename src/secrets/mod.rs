//! Secret collection and output masking.
//!
//! - [`SecretSet`] - The secret values of one build step
//! - [`SecretMatcher`] - Classifies host environment variable names as secret
//! - [`Masker`] - Replaces secret occurrences with [`MASK`]
//! - [`MaskingWriter`] - Line-buffered masking `Write` decorator
//!
//! # Example
//!
//! ```
//! use sonar_env::config::SonarInstallation;
//! use sonar_env::secrets::{decorate, SecretSet};
//! use std::io::Write;
//!
//! let mut installation = SonarInstallation::new("local", "http://localhost:9001");
//! installation.password = Some("password".to_string());
//!
//! let mut log = Vec::new();
//! {
//!     let mut out = decorate(Some(&mut log), &SecretSet::for_installation(&installation)).unwrap();
//!     out.write_all(b"test sonar\ntest something\n").unwrap();
//! }
//! assert_eq!(log, b"test ******\ntest something\n");
//! ```

pub mod mask;
pub mod pattern;
pub mod set;

pub use mask::{decorate, Masker, MaskingWriter, MASK};
pub use pattern::{SecretMatcher, SecretPattern, BUILTIN_PATTERNS};
pub use set::SecretSet;
