//! Errors raised while building a tree.

use facet::Facet;

/// Errors that can occur while building or querying a tree.
#[derive(Facet, Debug, Clone, PartialEq, Eq)]
#[facet(derive(Error))]
#[repr(u8)]
pub enum BuildError {
    /// child with index {index} does not exist
    MissingChild { index: usize },

    /// attribute "{name}" does not exist
    MissingAttribute { name: String },

    /// child is not present in this node
    ChildNotFound,

    /// no current context
    NoActiveContext,

    /// scope exit does not match the innermost open scope
    UnbalancedExit,

    /// adding this node would make it its own ancestor
    Cycle,

    /// failed to include {path}: {message}
    Include { path: String, message: String },

    /// command `{command}` failed: {message}
    Command { command: String, message: String },
}

/// Result alias used throughout the crate.
pub type Result<T, E = BuildError> = std::result::Result<T, E>;
