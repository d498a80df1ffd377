//! Path resolution against a compiled [`RouteTree`].
//!
//! Resolution walks the tree one path token at a time. A literal child always
//! wins over the variable child of the same node, which lets a specific route
//! such as `users/new` override `users/:id`. The walk never backtracks: once a
//! literal child is taken, the variable sibling is not retried deeper down.
//!
//! Bindings live in a fresh map per call, so resolution is a pure function of
//! the tree, the path and the options.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::path::tokenize;
use crate::tree::RouteTree;

/// Variable bindings collected while walking a path, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Bindings {
    values: BTreeMap<String, String>,
}

impl Bindings {
    /// Creates an empty binding set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `value`, replacing any earlier value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Gets the value bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Parses a bound value as a specific type.
    #[must_use]
    pub fn parse<T: std::str::FromStr>(&self, name: &str) -> Option<T> {
        self.get(name).and_then(|v| v.parse().ok())
    }

    /// Returns the number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns an iterator over the bindings.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Resolver options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Synthesize a target from the path tokens when no route matches.
    pub fallback: bool,
    /// Separator used to join path tokens into the fallback target.
    pub join: char,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            fallback: false,
            join: '_',
        }
    }
}

impl ResolveOptions {
    /// Creates the default options: no fallback, `_` separator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the path-join fallback.
    #[must_use]
    pub const fn with_fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }

    /// Sets the fallback separator.
    #[must_use]
    pub const fn with_join(mut self, join: char) -> Self {
        self.join = join;
        self
    }
}

/// Outcome of resolving one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Resolution {
    /// A route matched; `target` has its placeholders substituted.
    Matched {
        /// The resolved target identifier.
        target: String,
        /// Variables bound along the path.
        bindings: Bindings,
    },
    /// No route matched and the caller asked for the path-join fallback.
    Fallback {
        /// Path tokens joined with the configured separator.
        target: String,
    },
    /// No route matched.
    Unresolved,
}

impl Resolution {
    /// Returns the target identifier, whether matched or synthesized.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Matched { target, .. } | Self::Fallback { target } => Some(target),
            Self::Unresolved => None,
        }
    }

    /// Returns the bindings of a matched route.
    #[must_use]
    pub const fn bindings(&self) -> Option<&Bindings> {
        match self {
            Self::Matched { bindings, .. } => Some(bindings),
            _ => None,
        }
    }

    /// Returns true if a registered route matched.
    #[must_use]
    pub const fn is_matched(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }

    /// Returns true if nothing could be resolved.
    #[must_use]
    pub const fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved)
    }
}

impl RouteTree {
    /// Resolves `path` with the default `_` fallback separator.
    ///
    /// # Example
    ///
    /// ```
    /// use foo_router::RouteTree;
    ///
    /// let tree = RouteTree::compile([("foo/bar", "A"), ("foo/:x", "B")]).unwrap();
    /// assert_eq!(tree.resolve("foo/bar", false).target(), Some("A"));
    /// assert_eq!(tree.resolve("foo/baz", false).target(), Some("B"));
    /// assert_eq!(tree.resolve("alpha/beta", true).target(), Some("alpha_beta"));
    /// assert!(tree.resolve("alpha/beta", false).is_unresolved());
    /// ```
    #[must_use]
    pub fn resolve(&self, path: &str, fallback: bool) -> Resolution {
        self.resolve_with(path, &ResolveOptions::new().with_fallback(fallback))
    }

    /// Resolves `path` with explicit options.
    #[must_use]
    pub fn resolve_with(&self, path: &str, options: &ResolveOptions) -> Resolution {
        let tokens: Vec<&str> = tokenize(path).collect();
        let fallback = fallback_for(&tokens, options);

        let mut node = self.root();
        let mut bindings = Bindings::new();
        for token in &tokens {
            if node.is_leaf() {
                debug!(path = %path, token = %token, "no route below matched prefix");
                return fallback;
            }
            if let Some(child) = node.literals.get(*token) {
                node = child;
            } else if let Some(child) = node.variable.as_deref() {
                if let Some(name) = child.variable_name() {
                    bindings.insert(name, *token);
                }
                node = child;
            } else {
                debug!(path = %path, token = %token, "no route for segment");
                return fallback;
            }
        }

        let Some(template) = node.target() else {
            debug!(path = %path, "path is a prefix of a route but not a route");
            return fallback;
        };

        match template.render(&bindings) {
            Ok(target) => {
                debug!(path = %path, resolved = %target, "route matched");
                Resolution::Matched { target, bindings }
            }
            Err(missing) => {
                warn!(
                    path = %path,
                    template = %template,
                    placeholder = %missing,
                    "route target references a variable its pattern never binds"
                );
                fallback
            }
        }
    }
}

/// Resolves `path` against `tree`, optionally synthesizing a `_`-joined fallback.
#[must_use]
pub fn resolve(tree: &RouteTree, path: &str, fallback: bool) -> Resolution {
    tree.resolve(path, fallback)
}

fn fallback_for(tokens: &[&str], options: &ResolveOptions) -> Resolution {
    if !options.fallback || tokens.is_empty() {
        return Resolution::Unresolved;
    }
    let sep = options.join.to_string();
    Resolution::Fallback {
        target: tokens.join(sep.as_str()),
    }
}
