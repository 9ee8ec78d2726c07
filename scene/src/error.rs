use thiserror::Error;

use crate::node::NodeId;

/// Errors raised by [`SceneGraph`](crate::SceneGraph) operations.
///
/// All errors are raised synchronously at the offending call and nothing is
/// retried internally; callers handle or propagate them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// An argument was structurally invalid: an empty search path, or a
    /// dead handle where a live node is required.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Child index outside `[0, child_count)`.
    #[error("child index {index} out of range ({child_count} children)")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of children the node actually has.
        child_count: usize,
    },

    /// Reparenting would make a node its own ancestor.
    #[error("cannot parent {node} to {parent}: it would create a cycle")]
    Cycle {
        /// The node being reparented.
        node: NodeId,
        /// The rejected parent.
        parent: NodeId,
    },

    /// A search path segment matched no child.
    #[error("no child named `{0}`")]
    NotFound(String),
}

/// Convenience alias for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;
