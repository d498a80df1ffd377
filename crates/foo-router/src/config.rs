//! Route definitions and the INI-style route table.
//!
//! A route table maps URL patterns to target templates, one entry per line:
//!
//! ```text
//! ; default route
//! = Index
//! blog/:slug = "Post.:slug"
//! blog/archive = Archive
//! ```
//!
//! Blank lines and lines starting with `;` or `#` are comments. `[section]`
//! headers are accepted and ignored. Values may be double-quoted.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RouteError};
use crate::tree::RouteTree;

/// A single `(pattern, target)` route definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDefinition {
    /// `/`-delimited URL pattern. Empty for the default route.
    pub pattern: String,
    /// `.`-delimited target template.
    pub target: String,
}

impl RouteDefinition {
    /// Creates a new route definition.
    pub fn new(pattern: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            target: target.into(),
        }
    }
}

/// An ordered list of route definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteTable {
    routes: Vec<RouteDefinition>,
}

impl RouteTable {
    /// Creates an empty route table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a route.
    #[must_use]
    pub fn route(mut self, pattern: impl Into<String>, target: impl Into<String>) -> Self {
        self.routes.push(RouteDefinition::new(pattern, target));
        self
    }

    /// Parses the INI-style route table format.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Parse`] for a non-comment line without `=`.
    ///
    /// # Example
    ///
    /// ```
    /// use foo_router::RouteTable;
    ///
    /// let table = RouteTable::parse("= Index\nblog/:slug = \"Post.:slug\"\n").unwrap();
    /// assert_eq!(table.len(), 2);
    /// assert_eq!(table.routes()[0].pattern, "");
    /// assert_eq!(table.routes()[1].target, "Post.:slug");
    /// ```
    pub fn parse(source: &str) -> Result<Self> {
        let mut routes = Vec::new();

        for (i, raw) in source.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }
            if line.starts_with('[') && line.ends_with(']') {
                continue;
            }

            let (key, value) = line.split_once('=').ok_or_else(|| RouteError::Parse {
                line: i + 1,
                message: format!("expected 'pattern = target', found '{line}'"),
            })?;

            routes.push(RouteDefinition::new(unquote(key.trim()), unquote(value.trim())));
        }

        Ok(Self { routes })
    }

    /// Reads and parses a route table file.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Io`] if the file cannot be read, or
    /// [`RouteError::Parse`] if it is malformed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        Self::parse(&source)
    }

    /// Returns the definitions in registration order.
    #[must_use]
    pub fn routes(&self) -> &[RouteDefinition] {
        &self.routes
    }

    /// Returns the number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if the table has no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Compiles the table into a route tree.
    ///
    /// # Errors
    ///
    /// See [`RouteTree::compile`].
    pub fn compile(&self) -> Result<RouteTree> {
        RouteTree::compile(
            self.routes
                .iter()
                .map(|def| (def.pattern.as_str(), def.target.as_str())),
        )
    }
}

impl FromIterator<RouteDefinition> for RouteTable {
    fn from_iter<I: IntoIterator<Item = RouteDefinition>>(iter: I) -> Self {
        Self {
            routes: iter.into_iter().collect(),
        }
    }
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entries_in_order() {
        let table = RouteTable::parse(
            "; routes\n\n[routes]\n= Index\nblog/:slug = \"Post.:slug\"\n# trailing\nabout=About\n",
        )
        .unwrap();
        assert_eq!(
            table.routes(),
            [
                RouteDefinition::new("", "Index"),
                RouteDefinition::new("blog/:slug", "Post.:slug"),
                RouteDefinition::new("about", "About"),
            ]
        );
    }

    #[test]
    fn test_quoted_empty_key_is_default_route() {
        let table = RouteTable::parse("\"\" = Home").unwrap();
        assert_eq!(table.routes()[0], RouteDefinition::new("", "Home"));
    }

    #[test]
    fn test_missing_equals_is_parse_error() {
        let err = RouteTable::parse("= Index\nblog/:slug Post\n").unwrap_err();
        match err {
            RouteError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_target_fails_compile() {
        let table = RouteTable::parse("news =\n").unwrap();
        assert_eq!(table.routes()[0], RouteDefinition::new("news", ""));
        match table.compile().unwrap_err() {
            RouteError::InvalidTarget { pattern, .. } => assert_eq!(pattern, "news"),
            other => panic!("expected invalid target, got {other:?}"),
        }
    }

    #[test]
    fn test_builder_and_compile() {
        let tree = RouteTable::new()
            .route("", "Index")
            .route("blog/:slug", "Post.:slug")
            .compile()
            .unwrap();
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.ini");
        std::fs::write(&path, "blog/:slug = Post.:slug\n").unwrap();
        let table = RouteTable::from_file(&path).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_from_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = RouteTable::from_file(dir.path().join("nope.ini")).unwrap_err();
        assert!(matches!(err, RouteError::Io(_)));
    }

    #[test]
    fn test_json_round_shape() {
        let table: RouteTable = serde_json::from_str(
            r#"[{"pattern": "", "target": "Index"}, {"pattern": "a/:x", "target": "A.:x"}]"#,
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.routes()[1], RouteDefinition::new("a/:x", "A.:x"));
    }
}
