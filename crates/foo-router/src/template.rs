//! Target templates: `.`-delimited identifiers with `:name` placeholders.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{Result, RouteError};
use crate::resolve::Bindings;

/// One `.`-delimited part of a target template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TemplatePart {
    Text(String),
    Placeholder(String),
}

/// A compiled target template such as `Post.:slug`.
///
/// Templates without placeholders are returned verbatim on resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetTemplate {
    source: String,
    parts: Vec<TemplatePart>,
}

impl TargetTemplate {
    /// Parses a target template registered for `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidTarget`] for an empty template or a bare
    /// `:` placeholder.
    pub fn parse(pattern: &str, source: &str) -> Result<Self> {
        if source.is_empty() {
            return Err(RouteError::InvalidTarget {
                pattern: pattern.to_string(),
                reason: "target is empty".to_string(),
            });
        }

        let parts = source
            .split('.')
            .map(|part| match part.strip_prefix(':') {
                Some("") => Err(RouteError::InvalidTarget {
                    pattern: pattern.to_string(),
                    reason: "placeholder ':' has no name".to_string(),
                }),
                Some(name) => Ok(TemplatePart::Placeholder(name.to_string())),
                None => Ok(TemplatePart::Text(part.to_string())),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            source: source.to_string(),
            parts,
        })
    }

    /// Returns the template as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns true if the template has no placeholders.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        self.parts
            .iter()
            .all(|part| matches!(part, TemplatePart::Text(_)))
    }

    /// Returns the placeholder names in template order.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(|part| match part {
            TemplatePart::Placeholder(name) => Some(name.as_str()),
            TemplatePart::Text(_) => None,
        })
    }

    /// Substitutes every placeholder from `bindings`.
    ///
    /// On failure returns the first placeholder name with no binding.
    pub(crate) fn render(&self, bindings: &Bindings) -> std::result::Result<String, String> {
        if self.is_literal() {
            return Ok(self.source.clone());
        }

        let mut out = String::with_capacity(self.source.len());
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            match part {
                TemplatePart::Text(text) => out.push_str(text),
                TemplatePart::Placeholder(name) => {
                    out.push_str(bindings.get(name).ok_or_else(|| name.clone())?);
                }
            }
        }
        Ok(out)
    }
}

impl fmt::Display for TargetTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Serialize for TargetTemplate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}
