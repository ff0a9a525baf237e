use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Integer identifier of a tree node. Assigned by SQLite on insert and never
/// reused, even after the node is deleted.
pub type NodeId = i64;

/// The two concrete kinds of tree node.
///
/// Stored in the `kind` column as `"folder"` / `"note"`; all operations that
/// differ by kind dispatch on this enum rather than interpolating table names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Folder,
    Note,
}

impl NodeKind {
    /// Returns the string form stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Folder => "folder",
            NodeKind::Note => "note",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `kind` column held a value other than `"folder"` or `"note"`.
#[derive(Debug, Error)]
#[error("invalid node kind: {0}")]
pub struct InvalidNodeKind(pub String);

impl FromStr for NodeKind {
    type Err = InvalidNodeKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "folder" => Ok(NodeKind::Folder),
            "note" => Ok(NodeKind::Note),
            other => Err(InvalidNodeKind(other.to_string())),
        }
    }
}

/// One entry in the tree: a folder or a note.
///
/// `parent_id == None` means the node sits at the top level. `position` orders
/// siblings within their parent (or within the root level); children are
/// always listed in ascending `position`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub parent_id: Option<NodeId>,
    pub position: i32,
    pub name: String,
    /// Display date, `YYYY-MM-DD`. No arithmetic is performed on it.
    pub created_date: String,
    pub theme: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_str() {
        assert_eq!("folder".parse::<NodeKind>().unwrap(), NodeKind::Folder);
        assert_eq!("note".parse::<NodeKind>().unwrap(), NodeKind::Note);
        assert_eq!(NodeKind::Folder.as_str(), "folder");
        assert_eq!(NodeKind::Note.as_str(), "note");
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        assert!("directory".parse::<NodeKind>().is_err());
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&NodeKind::Folder).unwrap();
        assert_eq!(json, r#""folder""#);
    }
}
