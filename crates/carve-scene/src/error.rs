//! Error types for scene edits and lookups

use std::fmt;

use thiserror::Error;

use crate::node::NodeId;

/// Result type alias using the scene's Error type
pub type Result<T> = std::result::Result<T, SceneError>;

/// Why a deletion was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteRefusal {
    /// The node is a container that still owns children
    NonEmptyContainer,
    /// The node is the first node ever created (id 0)
    ProtectedRoot,
    /// The node is the root subassembly the shader template calls
    EntryPoint,
}

impl fmt::Display for DeleteRefusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonEmptyContainer => write!(f, "container still has children"),
            Self::ProtectedRoot => write!(f, "node 0 is permanently protected"),
            Self::EntryPoint => write!(f, "node is the shader entry point"),
        }
    }
}

/// Errors that can occur while querying or editing a scene
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// The id does not name a live node
    #[error("Node id {id} is out of range (scene has {len} nodes)")]
    OutOfRange { id: NodeId, len: usize },

    /// Deletion precondition violated; the scene is unchanged
    #[error("Cannot delete node {id}: {reason}")]
    DeleteRefused { id: NodeId, reason: DeleteRefusal },

    /// The node's variant does not carry the requested parameter
    #[error("A {kind} has no parameter '{param}'")]
    NoSuchParameter { kind: &'static str, param: String },

    /// Subassembly name is not a usable function identifier
    #[error("Invalid subassembly name '{0}'")]
    InvalidName(String),

    /// Element kind string not recognised
    #[error("Unknown element kind '{0}' (expected sphere, box, union or intersection)")]
    UnknownElement(String),
}

impl SceneError {
    /// The refusal reason, if this is a refused deletion
    pub fn refusal(&self) -> Option<DeleteRefusal> {
        match self {
            Self::DeleteRefused { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}
