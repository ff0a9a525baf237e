//! Result type for node removal operations.
//!
//! Deleting a folder removes its entire subtree; [`DeleteResult`] reports
//! everything that went away so the UI can drop stale widgets without
//! re-querying the whole tree.
//!
//! Fields serialize in camelCase (`deletedCount`, `affectedIds`), consistent
//! with the other types that cross the UI boundary.
//!
//! ## Examples
//!
//! ```rust
//! use inkpad_core::DeleteResult;
//!
//! let result = DeleteResult {
//!     deleted_count: 3,
//!     affected_ids: vec![4, 7, 9],
//! };
//! let json = serde_json::to_string(&result).unwrap();
//! assert!(json.contains("deletedCount"));
//! assert!(json.contains("affectedIds"));
//! ```

use crate::core::node::NodeId;
use serde::{Deserialize, Serialize};

/// The outcome of a delete performed on a [`Workspace`](crate::Workspace).
///
/// `affected_ids` lists every node that was removed, in pre-order (each node
/// before its descendants); `deleted_count` always equals its length.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    /// The total number of nodes that were permanently removed.
    pub deleted_count: usize,

    /// IDs of all nodes removed by the operation, the requested node first.
    pub affected_ids: Vec<NodeId>,
}
