//! Error types for the Inkpad core library.

use crate::core::node::NodeId;
use thiserror::Error;

/// All errors that can occur within the Inkpad core library.
#[derive(Debug, Error)]
pub enum InkpadError {
    /// A SQLite operation failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A node ID was requested that does not exist in the database.
    #[error("Node not found: {0}")]
    NotFound(NodeId),

    /// An operation that requires a folder was given the ID of a note
    /// (or a nonexistent node claimed as a parent).
    #[error("Node {0} is not a folder")]
    NotAFolder(NodeId),

    /// An operation that requires a note was given the ID of a folder.
    #[error("Node {0} is not a note")]
    NotANote(NodeId),

    /// A move operation would create a cycle or is otherwise invalid.
    #[error("Invalid move: {0}")]
    InvalidMove(String),

    /// The stored tree contradicts itself: a parent pointer names a
    /// non-folder, sibling positions collide, or a content block is orphaned.
    #[error("Tree invariant violated: {0}")]
    InvariantViolation(String),

    /// The parent-chain walk from this node exceeded the maximum tree depth.
    /// Must not happen under correct operation; indicates corrupted data.
    #[error("Parent chain from node {0} exceeds the maximum tree depth")]
    CycleDetected(NodeId),

    /// The opened file is not a valid Inkpad workspace.
    #[error("Invalid workspace: {0}")]
    InvalidWorkspace(String),

    /// An I/O operation on the filesystem failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias that pins the error type to [`InkpadError`].
pub type Result<T> = std::result::Result<T, InkpadError>;

impl InkpadError {
    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Database(e) => format!("Failed to save: {e}"),
            Self::NotFound(_) => "That item no longer exists".to_string(),
            Self::NotAFolder(_) => "Items can only be placed inside a folder".to_string(),
            Self::NotANote(_) => "Only notes have canvas content".to_string(),
            Self::InvalidMove(msg) => msg.clone(),
            Self::InvariantViolation(_) => {
                "The workspace file is damaged — some items may be missing".to_string()
            }
            Self::CycleDetected(_) => {
                "The workspace file is damaged — some items may be missing".to_string()
            }
            Self::InvalidWorkspace(_) => "Could not open workspace file".to_string(),
            Self::Io(e) => format!("File error: {e}"),
        }
    }
}
