//! Core library for Inkpad — a desktop note-taking application with
//! hierarchical folders and free-form canvas notes.
//!
//! The primary entry point is [`Workspace`], which represents an open `.inkpad`
//! database file. All tree and content mutations go through `Workspace` methods;
//! the presentation layer (windows, toolbars, the canvas editor) never issues
//! queries of its own.
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use core::{
    block::{ContentBlock, NewContentBlock},
    delete::DeleteResult,
    error::{InkpadError, Result},
    node::{Node, NodeId, NodeKind},
    storage::Storage,
    workspace::{today_string, Workspace},
};
