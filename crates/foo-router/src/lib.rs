//! # foo-router
//!
//! Route compiler and path resolver for the foo-mvc dispatcher.
//!
//! This crate provides:
//! - Compilation of `(pattern, target)` definitions into an immutable prefix tree
//! - Resolution of request paths against that tree, with variable bindings
//! - Target templates with `:name` placeholders filled from the bindings
//! - An optional path-join fallback for unmatched paths
//! - An INI-style route table loader
//!
//! ## Quick Start
//!
//! ```
//! use foo_router::{Resolution, RouteTable};
//!
//! let tree = RouteTable::parse(
//!     "= Index\n\
//!      blog/:slug = Post.:slug\n\
//!      blog/archive = Archive\n",
//! )
//! .unwrap()
//! .compile()
//! .unwrap();
//!
//! assert_eq!(tree.resolve("/", false).target(), Some("Index"));
//! assert_eq!(tree.resolve("/blog/archive", false).target(), Some("Archive"));
//! assert_eq!(tree.resolve("/blog/hello", false).target(), Some("Post.hello"));
//! assert_eq!(tree.resolve("/about/team", false), Resolution::Unresolved);
//! assert_eq!(tree.resolve("/about/team", true).target(), Some("about_team"));
//! ```
//!
//! ## Patterns
//!
//! Patterns are `/`-delimited. A segment is either literal text, matched
//! exactly and case-sensitively, or `:name`, which matches any single token
//! and binds it to `name`. An empty pattern is the default route for paths
//! with no segments.
//!
//! Every pattern that puts a variable at the same tree position must use the
//! same name there. `users/:id/posts` and `users/:id/edit` can coexist,
//! `users/:id/posts` and `users/:user/edit` cannot.
//!
//! ## Matching
//!
//! A literal child is always preferred to the variable child of the same
//! node. A path that stops on an inner node with no target of its own does
//! not match.

mod config;
mod error;
pub mod path;
mod resolve;
mod template;
mod tree;

pub use config::{RouteDefinition, RouteTable};
pub use error::{Result, RouteError};
pub use resolve::{resolve, Bindings, Resolution, ResolveOptions};
pub use template::TargetTemplate;
pub use tree::{compile, RouteNode, RouteSegmentKey, RouteTree, UnboundPlaceholder};
