//! Content block types for the free-form canvas.
//!
//! A note's canvas is persisted as an ordered list of typed, positioned
//! blocks. The store treats `block_type` and `extra_args` as opaque strings
//! owned by the presentation layer: `block_type` names the widget to rebuild
//! (e.g. `"NoteLabel"`, `"CodeLabel"`, `"ImageLabel"`, `"PaintCanvas"`,
//! `"File"`), and `extra_args` carries widget-specific metadata such as a
//! file name or the canvas background style.
//!
//! Blocks serialize in camelCase so they can cross the UI boundary without a
//! mapping layer.

use crate::core::node::NodeId;
use serde::{Deserialize, Serialize};

/// A content block as stored: one positioned piece of a note's canvas.
///
/// `ordinal` records insertion order and doubles as the draw order (z-order)
/// when the canvas is rebuilt; [`get_note_content`](crate::Workspace::get_note_content)
/// returns blocks in ascending ordinal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBlock {
    pub id: i64,
    pub note_id: NodeId,
    pub ordinal: i32,
    pub block_type: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Raw widget content: UTF-8 bytes for text blocks, encoded bitmap bytes
    /// for images and drawings.
    pub payload: Vec<u8>,
    pub extra_args: Option<String>,
}

/// A content block to be written by
/// [`replace_note_content`](crate::Workspace::replace_note_content).
///
/// The store assigns `id`, `note_id`, and `ordinal` on insert; callers supply
/// blocks in the order they should layer on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContentBlock {
    pub block_type: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub payload: Vec<u8>,
    pub extra_args: Option<String>,
}
