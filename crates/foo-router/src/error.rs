//! Error types for route compilation and route-table loading.

use thiserror::Error;

/// Errors raised while building a route tree.
///
/// Resolution itself never fails: an unmatched path is reported as
/// [`Resolution::Unresolved`](crate::Resolution::Unresolved) instead.
#[derive(Debug, Error)]
pub enum RouteError {
    /// Two patterns bind different variable names at the same tree position.
    #[error(
        "route '{pattern}' binds ':{conflicting}' at '{position}', \
         but ':{existing}' is already bound there"
    )]
    VariableNameConflict {
        /// The pattern being compiled when the conflict was found.
        pattern: String,
        /// The pattern prefix (in pattern syntax) where the variable sits.
        position: String,
        /// The name registered first.
        existing: String,
        /// The name that disagrees with it.
        conflicting: String,
    },

    /// A pattern contains a malformed segment.
    #[error("invalid route pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A target template is empty or contains a malformed placeholder.
    #[error("invalid target for route '{pattern}': {reason}")]
    InvalidTarget {
        /// The pattern the target belongs to.
        pattern: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A route-table line could not be parsed.
    #[error("route table line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// Error message.
        message: String,
    },

    /// IO error while reading a route table.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for route operations.
pub type Result<T> = std::result::Result<T, RouteError>;
