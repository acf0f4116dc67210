//! Variable interpolation for configuration values.
//!
//! Installation values may reference environment variables the way a CI
//! host expands them.
//!
//! # Syntax
//!
//! - `$NAME` and `${NAME}` - replaced with the variable's value
//! - `$$` - produces a literal `$`
//!
//! Names follow shell rules: a letter or underscore, then letters, digits
//! or underscores. References to unknown variables are kept verbatim.
//!
//! # Example
//!
//! ```
//! use sonar_env::config::{resolve_string, InterpolationContext};
//!
//! let mut ctx = InterpolationContext::new();
//! ctx.defined.insert("SONAR_CONFIG_NAME".to_string(), "local".to_string());
//!
//! assert_eq!(resolve_string("$SONAR_CONFIG_NAME", &ctx), "local");
//! assert_eq!(resolve_string("${UNKNOWN}", &ctx), "${UNKNOWN}");
//! ```

use std::collections::HashMap;

/// A segment of an interpolated string.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text
    Literal(String),
    /// Variable reference: `$name` or `${name}`
    Variable {
        /// Variable name
        name: String,
        /// Whether the reference was written with braces
        braced: bool,
    },
}

impl Segment {
    /// Reproduce the original source text of this segment.
    pub fn source_text(&self) -> String {
        match self {
            Self::Literal(text) => text.clone(),
            Self::Variable { name, braced: true } => format!("${{{}}}", name),
            Self::Variable {
                name,
                braced: false,
            } => format!("${}", name),
        }
    }
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Parse a string containing `$var` / `${var}` interpolations.
///
/// Malformed references (a lone `$`, an unterminated `${`, an empty `${}`)
/// are kept as literal text.
pub fn parse_interpolation(input: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut chars = input.chars().peekable();
    let mut current_literal = String::new();

    while let Some(c) = chars.next() {
        if c != '$' {
            current_literal.push(c);
            continue;
        }

        match chars.peek().copied() {
            Some('$') => {
                // Escaped: $$ becomes $
                chars.next();
                current_literal.push('$');
            }
            Some('{') => {
                chars.next(); // consume {
                let mut var_name = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    var_name.push(c);
                }

                if closed && !var_name.is_empty() {
                    if !current_literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut current_literal)));
                    }
                    segments.push(Segment::Variable {
                        name: var_name,
                        braced: true,
                    });
                } else {
                    current_literal.push_str("${");
                    current_literal.push_str(&var_name);
                    if closed {
                        current_literal.push('}');
                    }
                }
            }
            Some(next) if is_name_start(next) => {
                if !current_literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut current_literal)));
                }
                let mut var_name = String::new();
                while let Some(&c) = chars.peek() {
                    if !is_name_char(c) {
                        break;
                    }
                    var_name.push(c);
                    chars.next();
                }
                segments.push(Segment::Variable {
                    name: var_name,
                    braced: false,
                });
            }
            _ => current_literal.push('$'),
        }
    }

    if !current_literal.is_empty() {
        segments.push(Segment::Literal(current_literal));
    }

    segments
}

/// Context for variable resolution.
///
/// Variables are resolved in priority order:
/// 1. Values defined by the current resolution (highest priority)
/// 2. The host's existing environment
#[derive(Debug, Default, Clone)]
pub struct InterpolationContext {
    /// Values assembled by the resolver
    pub defined: HashMap<String, String>,

    /// Host environment variables
    pub env: HashMap<String, String>,
}

impl InterpolationContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given host environment.
    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    /// Use the given defined values.
    pub fn with_defined(mut self, defined: HashMap<String, String>) -> Self {
        self.defined = defined;
        self
    }

    /// Resolve a variable name to its value.
    ///
    /// Resolution order: defined > env
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.defined
            .get(name)
            .or_else(|| self.env.get(name))
            .map(String::as_str)
    }
}

/// Expand every variable reference in `input` against `context`.
///
/// Unknown variables are left as written.
pub fn resolve_string(input: &str, context: &InterpolationContext) -> String {
    let mut result = String::with_capacity(input.len());

    for segment in parse_interpolation(input) {
        match &segment {
            Segment::Literal(text) => result.push_str(text),
            Segment::Variable { name, .. } => match context.resolve(name) {
                Some(value) => result.push_str(value),
                None => {
                    tracing::debug!("Leaving unresolved variable {} as-is", name);
                    result.push_str(&segment.source_text());
                }
            },
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str, braced: bool) -> Segment {
        Segment::Variable {
            name: name.to_string(),
            braced,
        }
    }

    #[test]
    fn parse_literal_only() {
        let result = parse_interpolation("hello world");
        assert_eq!(result, vec![Segment::Literal("hello world".to_string())]);
    }

    #[test]
    fn parse_bare_variable() {
        let result = parse_interpolation("$SONAR_CONFIG_NAME");
        assert_eq!(result, vec![var("SONAR_CONFIG_NAME", false)]);
    }

    #[test]
    fn parse_braced_variable() {
        let result = parse_interpolation("${name}");
        assert_eq!(result, vec![var("name", true)]);
    }

    #[test]
    fn parse_bare_variable_stops_at_non_name_char() {
        let result = parse_interpolation("$HOME/.m2");
        assert_eq!(
            result,
            vec![var("HOME", false), Segment::Literal("/.m2".to_string())]
        );
    }

    #[test]
    fn parse_variable_with_surrounding_text() {
        let result = parse_interpolation("user-${name}!");
        assert_eq!(
            result,
            vec![
                Segment::Literal("user-".to_string()),
                var("name", true),
                Segment::Literal("!".to_string()),
            ]
        );
    }

    #[test]
    fn parse_adjacent_variables() {
        let result = parse_interpolation("${a}$b");
        assert_eq!(result, vec![var("a", true), var("b", false)]);
    }

    #[test]
    fn parse_escaped_dollar() {
        let result = parse_interpolation("$$HOME and $${X}");
        assert_eq!(
            result,
            vec![Segment::Literal("$HOME and ${X}".to_string())]
        );
    }

    #[test]
    fn parse_dollar_without_name() {
        let result = parse_interpolation("price is $100 or $");
        assert_eq!(
            result,
            vec![Segment::Literal("price is $100 or $".to_string())]
        );
    }

    #[test]
    fn parse_unterminated_brace_is_literal() {
        let result = parse_interpolation("${open");
        assert_eq!(result, vec![Segment::Literal("${open".to_string())]);
    }

    #[test]
    fn parse_empty_braces_is_literal() {
        let result = parse_interpolation("${}");
        assert_eq!(result, vec![Segment::Literal("${}".to_string())]);
    }

    #[test]
    fn parse_empty_string() {
        assert!(parse_interpolation("").is_empty());
    }

    #[test]
    fn resolve_replaces_both_forms() {
        let mut ctx = InterpolationContext::new();
        ctx.env.insert("USER".to_string(), "ci".to_string());
        assert_eq!(resolve_string("$USER-${USER}", &ctx), "ci-ci");
    }

    #[test]
    fn resolve_prefers_defined_over_env() {
        let mut ctx = InterpolationContext::new();
        ctx.defined.insert("VAR".to_string(), "defined".to_string());
        ctx.env.insert("VAR".to_string(), "env".to_string());
        assert_eq!(resolve_string("$VAR", &ctx), "defined");

        ctx.defined.clear();
        assert_eq!(resolve_string("$VAR", &ctx), "env");
    }

    #[test]
    fn resolve_keeps_unknown_references_verbatim() {
        let ctx = InterpolationContext::new();
        assert_eq!(resolve_string("$MISSING", &ctx), "$MISSING");
        assert_eq!(resolve_string("${MISSING}", &ctx), "${MISSING}");
    }

    #[test]
    fn resolve_preserves_escapes() {
        let ctx = InterpolationContext::new();
        assert_eq!(resolve_string("$${NOT_RESOLVED}", &ctx), "${NOT_RESOLVED}");
    }

    #[test]
    fn resolve_does_not_recurse_into_values() {
        let mut ctx = InterpolationContext::new();
        ctx.defined.insert("A".to_string(), "$B".to_string());
        ctx.defined.insert("B".to_string(), "b".to_string());
        assert_eq!(resolve_string("$A", &ctx), "$B");
    }

    #[test]
    fn context_builders_set_layers() {
        let mut env = HashMap::new();
        env.insert("E".to_string(), "1".to_string());
        let mut defined = HashMap::new();
        defined.insert("D".to_string(), "2".to_string());

        let ctx = InterpolationContext::new().with_env(env).with_defined(defined);
        assert_eq!(ctx.resolve("E"), Some("1"));
        assert_eq!(ctx.resolve("D"), Some("2"));
        assert_eq!(ctx.resolve("X"), None);
    }
}
