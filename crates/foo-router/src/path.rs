//! Path tokenizing and pattern segment parsing.

use crate::error::{Result, RouteError};

/// Splits a path on `/`, dropping empty segments.
///
/// Leading, trailing and repeated slashes therefore collapse:
///
/// ```
/// use foo_router::path::tokenize;
///
/// let tokens: Vec<&str> = tokenize("//blog/hello-world/").collect();
/// assert_eq!(tokens, ["blog", "hello-world"]);
/// ```
pub fn tokenize(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// A segment in a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSegment<'a> {
    /// Exact, case-sensitive text.
    Literal(&'a str),
    /// A `:name` segment binding the matched token to `name`.
    Variable(&'a str),
}

impl<'a> PatternSegment<'a> {
    /// Classifies one non-empty pattern token.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidPattern`] for a bare `:` segment.
    pub fn parse(pattern: &str, token: &'a str) -> Result<Self> {
        match token.strip_prefix(':') {
            Some("") => Err(RouteError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "variable segment ':' has no name".to_string(),
            }),
            Some(name) => Ok(Self::Variable(name)),
            None => Ok(Self::Literal(token)),
        }
    }
}

/// Parses a whole pattern into its segments.
///
/// # Errors
///
/// Returns [`RouteError::InvalidPattern`] on the first malformed segment.
pub fn parse_pattern(pattern: &str) -> Result<Vec<PatternSegment<'_>>> {
    tokenize(pattern)
        .map(|token| PatternSegment::parse(pattern, token))
        .collect()
}
