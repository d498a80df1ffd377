//! The route tree and the route compiler.
//!
//! Patterns are inserted segment by segment into a prefix tree. Each node owns
//! its children outright: one child per distinct literal text plus at most one
//! variable child. Shorter routes share structure with longer ones, so a node
//! may both carry a target and have children.
//!
//! ```text
//! ""            -> Index
//! blog          -> Blog
//! blog/:slug    -> Post.:slug
//! blog/archive  -> Archive
//!
//! (root: Index)
//! └── blog (Blog)
//!     ├── archive (Archive)
//!     └── :slug (Post.:slug)
//! ```
//!
//! Once compiled a [`RouteTree`] is never mutated, so it can be shared across
//! threads and resolved against without synchronization.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::RouteDefinition;
use crate::error::{Result, RouteError};
use crate::path::{parse_pattern, PatternSegment};
use crate::template::TargetTemplate;

/// Key identifying a child at one tree level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RouteSegmentKey<'a> {
    /// Exact literal segment text.
    Literal(&'a str),
    /// The single variable child of a node.
    Variable,
}

/// A vertex of the route tree.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RouteNode {
    /// Literal children keyed by exact segment text.
    #[serde(rename = "children", skip_serializing_if = "BTreeMap::is_empty")]
    pub(crate) literals: BTreeMap<String, RouteNode>,
    /// The variable child, if any pattern has a variable at this position.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) variable: Option<Box<RouteNode>>,
    /// Name bound when a path passes through this node. Only set on variable nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) variable_name: Option<String>,
    /// Target of the route terminating here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) target: Option<TargetTemplate>,
}

impl RouteNode {
    fn variable(name: &str) -> Self {
        Self {
            variable_name: Some(name.to_string()),
            ..Self::default()
        }
    }

    /// Returns the variable name bound by this node, if it is a variable node.
    #[must_use]
    pub fn variable_name(&self) -> Option<&str> {
        self.variable_name.as_deref()
    }

    /// Returns the target template of the route ending at this node.
    #[must_use]
    pub const fn target(&self) -> Option<&TargetTemplate> {
        self.target.as_ref()
    }

    /// Looks up a child by key.
    #[must_use]
    pub fn child(&self, key: RouteSegmentKey<'_>) -> Option<&Self> {
        match key {
            RouteSegmentKey::Literal(text) => self.literals.get(text),
            RouteSegmentKey::Variable => self.variable.as_deref(),
        }
    }

    /// Iterates over children: literals in sorted order, then the variable child.
    pub fn children(&self) -> impl Iterator<Item = (RouteSegmentKey<'_>, &Self)> {
        self.literals
            .iter()
            .map(|(text, node)| (RouteSegmentKey::Literal(text), node))
            .chain(
                self.variable
                    .as_deref()
                    .map(|node| (RouteSegmentKey::Variable, node)),
            )
    }

    /// Returns true if the node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.literals.is_empty() && self.variable.is_none()
    }
}

/// A template placeholder that no path reaching its route can bind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnboundPlaceholder {
    /// The route pattern.
    pub pattern: String,
    /// The placeholder name missing from the pattern.
    pub placeholder: String,
}

/// An immutable compiled route tree.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RouteTree {
    root: RouteNode,
    #[serde(skip)]
    len: usize,
}

impl RouteTree {
    /// Compiles an ordered set of `(pattern, target)` definitions.
    ///
    /// An empty pattern registers the default route at the root. Registering
    /// the same pattern twice keeps the later target.
    ///
    /// # Errors
    ///
    /// - [`RouteError::VariableNameConflict`] when a pattern binds a different
    ///   name than an earlier pattern at the same position. The earlier name wins.
    /// - [`RouteError::InvalidPattern`] / [`RouteError::InvalidTarget`] for
    ///   malformed input.
    ///
    /// # Example
    ///
    /// ```
    /// use foo_router::RouteTree;
    ///
    /// let tree = RouteTree::compile([("blog/:slug", "Post.:slug")]).unwrap();
    /// let res = tree.resolve("/blog/hello-world", false);
    /// assert_eq!(res.target(), Some("Post.hello-world"));
    /// ```
    pub fn compile<I, P, T>(definitions: I) -> Result<Self>
    where
        I: IntoIterator<Item = (P, T)>,
        P: AsRef<str>,
        T: AsRef<str>,
    {
        let mut tree = Self::default();
        for (pattern, target) in definitions {
            tree.insert(pattern.as_ref(), target.as_ref())?;
        }
        info!(routes = tree.len, "compiled route tree");
        Ok(tree)
    }

    fn insert(&mut self, pattern: &str, target: &str) -> Result<()> {
        let segments = parse_pattern(pattern)?;
        let template = TargetTemplate::parse(pattern, target)?;

        let mut node = &mut self.root;
        for (i, segment) in segments.iter().enumerate() {
            node = match *segment {
                PatternSegment::Literal(text) => node.literals.entry(text.to_string()).or_default(),
                PatternSegment::Variable(name) => {
                    let child = node
                        .variable
                        .get_or_insert_with(|| Box::new(RouteNode::variable(name)));
                    if let Some(existing) = child.variable_name.as_deref() {
                        if existing != name {
                            return Err(RouteError::VariableNameConflict {
                                pattern: pattern.to_string(),
                                position: render_pattern(&segments[..=i]),
                                existing: existing.to_string(),
                                conflicting: name.to_string(),
                            });
                        }
                    }
                    &mut **child
                }
            };
        }

        debug!(pattern = %pattern, template = %template, "registered route");
        match node.target.replace(template) {
            Some(previous) => {
                if node.target.as_ref() != Some(&previous) {
                    warn!(
                        pattern = %pattern,
                        previous = %previous,
                        template = %target,
                        "route registered twice, keeping the later target"
                    );
                }
            }
            None => self.len += 1,
        }
        Ok(())
    }

    /// Returns the root node (the empty path).
    #[must_use]
    pub const fn root(&self) -> &RouteNode {
        &self.root
    }

    /// Returns the number of registered routes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no route is registered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Lists every registered route, rendered back to pattern syntax.
    ///
    /// Literal branches come in sorted order before the variable branch.
    #[must_use]
    pub fn routes(&self) -> Vec<RouteDefinition> {
        let mut out = Vec::with_capacity(self.len);
        let mut prefix = Vec::new();
        walk(&self.root, &mut prefix, &mut |segments: &[String], node: &RouteNode| {
            if let Some(target) = &node.target {
                out.push(RouteDefinition::new(segments.join("/"), target.as_str()));
            }
        });
        out
    }

    /// Finds target placeholders that can never be bound on their route.
    ///
    /// Such routes always fail to resolve; the resolver reports them as a
    /// configuration-integrity warning at request time.
    #[must_use]
    pub fn unbound_placeholders(&self) -> Vec<UnboundPlaceholder> {
        let mut out = Vec::new();
        let mut prefix = Vec::new();
        walk(&self.root, &mut prefix, &mut |segments: &[String], node: &RouteNode| {
            let Some(target) = &node.target else {
                return;
            };
            let bound: BTreeSet<&str> = segments
                .iter()
                .filter_map(|s| s.strip_prefix(':'))
                .collect();
            for placeholder in target.placeholders() {
                if !bound.contains(placeholder) {
                    out.push(UnboundPlaceholder {
                        pattern: segments.join("/"),
                        placeholder: placeholder.to_string(),
                    });
                }
            }
        });
        out
    }
}

/// Compiles route definitions into a [`RouteTree`].
///
/// # Errors
///
/// See [`RouteTree::compile`].
pub fn compile<I, P, T>(definitions: I) -> Result<RouteTree>
where
    I: IntoIterator<Item = (P, T)>,
    P: AsRef<str>,
    T: AsRef<str>,
{
    RouteTree::compile(definitions)
}

/// Depth-first walk handing each node its pattern segments.
fn walk<'a, F>(node: &'a RouteNode, prefix: &mut Vec<String>, visit: &mut F)
where
    F: FnMut(&[String], &'a RouteNode),
{
    visit(prefix.as_slice(), node);
    for (key, child) in node.children() {
        prefix.push(match key {
            RouteSegmentKey::Literal(text) => text.to_string(),
            RouteSegmentKey::Variable => format!(":{}", child.variable_name().unwrap_or_default()),
        });
        walk(child, prefix, visit);
        prefix.pop();
    }
}

fn render_pattern(segments: &[PatternSegment<'_>]) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            PatternSegment::Literal(text) => (*text).to_string(),
            PatternSegment::Variable(name) => format!(":{name}"),
        })
        .collect::<Vec<_>>()
        .join("/")
}
