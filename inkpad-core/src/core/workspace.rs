//! High-level tree and canvas-content operations over an Inkpad SQLite database.

use crate::{
    ContentBlock, DeleteResult, InkpadError, NewContentBlock, Node, NodeId, NodeKind, Result,
    Storage,
};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

/// Upper bound on the parent-chain walk. A healthy tree never gets anywhere
/// near this deep; exceeding it means a parent cycle in corrupted data.
const MAX_TREE_DEPTH: usize = 1024;

/// An open Inkpad workspace backed by a SQLite database.
///
/// `Workspace` is the primary interface for all tree and content mutations.
/// The presentation layer holds one instance per open file and never issues
/// queries of its own; it refers to nodes only by their integer IDs.
///
/// Folders and notes live in a single `nodes` table with a `kind` column and
/// a nullable `parent_id`. A node's children are derived by querying
/// `parent_id` equality ordered by `position`; the top level is simply the
/// set of nodes whose `parent_id` is NULL. There is no separate child-list or
/// root-set state to keep in sync.
///
/// Each mutating method runs as one SQLite transaction committed before
/// return, so a failure mid-operation rolls back and leaves the tree exactly
/// as it was.
pub struct Workspace {
    storage: Storage,
}

impl Workspace {
    /// Creates a new workspace database at `path` and initialises the schema.
    ///
    /// The new workspace starts empty: no folders, no notes.
    ///
    /// # Errors
    ///
    /// Returns [`crate::InkpadError::Database`] for any SQLite failure.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let storage = Storage::create(path)?;
        Ok(Self { storage })
    }

    /// Opens an existing workspace database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::InkpadError::InvalidWorkspace`] if the file is not an
    /// Inkpad database, or [`crate::InkpadError::Database`] for any SQLite
    /// failure.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let storage = Storage::open(path)?;

        let schema_version: Option<String> = storage
            .connection()
            .query_row(
                "SELECT value FROM workspace_meta WHERE key = 'schema_version'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(version) = schema_version {
            if version != "1" {
                log::warn!("workspace reports schema_version {version}, expected 1");
            }
        }

        Ok(Self { storage })
    }

    /// Returns the underlying SQLite connection.
    pub fn connection(&self) -> &Connection {
        self.storage.connection()
    }

    /// Fetches a single node by ID.
    ///
    /// # Errors
    ///
    /// Returns [`crate::InkpadError::NotFound`] if no node with `id` exists.
    pub fn get_node(&self, id: NodeId) -> Result<Node> {
        self.connection()
            .query_row(
                "SELECT id, kind, parent_id, position, name, created_date, theme
                 FROM nodes WHERE id = ?1",
                [id],
                map_node_row,
            )
            .optional()?
            .ok_or(InkpadError::NotFound(id))
    }

    /// Creates a new node of `kind` under `parent_id`, or at the top level if
    /// `parent_id` is `None`.
    ///
    /// The node is appended at the end of its sibling group, matching the
    /// order items appear in the folder view. Returns the new node's ID; IDs
    /// are never reused, even after deletion.
    ///
    /// # Errors
    ///
    /// Returns [`crate::InkpadError::NotFound`] if `parent_id` names a
    /// nonexistent node, or [`crate::InkpadError::NotAFolder`] if it names a
    /// note. Notes have no children.
    pub fn create_node(
        &mut self,
        kind: NodeKind,
        name: &str,
        theme: Option<&str>,
        created_date: &str,
        parent_id: Option<NodeId>,
    ) -> Result<NodeId> {
        if let Some(pid) = parent_id {
            let parent = self.get_node(pid)?;
            if parent.kind != NodeKind::Folder {
                return Err(InkpadError::NotAFolder(pid));
            }
        }

        let tx = self.storage.connection_mut().transaction()?;

        // Append at the end of the sibling group.
        let position: i32 = tx.query_row(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM nodes WHERE parent_id IS ?1",
            rusqlite::params![parent_id],
            |row| row.get(0),
        )?;

        tx.execute(
            "INSERT INTO nodes (kind, parent_id, position, name, created_date, theme)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![kind.as_str(), parent_id, position, name, created_date, theme],
        )?;
        let id = tx.last_insert_rowid();

        tx.commit()?;
        Ok(id)
    }

    /// Creates a folder. Shorthand for [`create_node`](Self::create_node)
    /// with [`NodeKind::Folder`].
    pub fn create_folder(
        &mut self,
        name: &str,
        theme: Option<&str>,
        created_date: &str,
        parent_id: Option<NodeId>,
    ) -> Result<NodeId> {
        self.create_node(NodeKind::Folder, name, theme, created_date, parent_id)
    }

    /// Creates a note. Shorthand for [`create_node`](Self::create_node)
    /// with [`NodeKind::Note`].
    pub fn create_note(
        &mut self,
        name: &str,
        theme: Option<&str>,
        created_date: &str,
        parent_id: Option<NodeId>,
    ) -> Result<NodeId> {
        self.create_node(NodeKind::Note, name, theme, created_date, parent_id)
    }

    /// Returns the direct children of `parent_id`, ordered by position.
    ///
    /// `None` lists the top level. An empty folder yields an empty vec; a
    /// missing folder is an error, so the two cases stay distinguishable.
    ///
    /// # Errors
    ///
    /// Returns [`crate::InkpadError::NotFound`] if `parent_id` names a
    /// nonexistent node, or [`crate::InkpadError::NotAFolder`] if it names a
    /// note.
    pub fn list_children(&self, parent_id: Option<NodeId>) -> Result<Vec<Node>> {
        if let Some(pid) = parent_id {
            let parent = self.get_node(pid)?;
            if parent.kind != NodeKind::Folder {
                return Err(InkpadError::NotAFolder(pid));
            }
        }

        let mut stmt = self.connection().prepare(
            "SELECT id, kind, parent_id, position, name, created_date, theme
             FROM nodes WHERE parent_id IS ?1 ORDER BY position",
        )?;
        let rows = stmt
            .query_map(rusqlite::params![parent_id], map_node_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Returns every note in the workspace, flat, ordered by ID.
    pub fn list_notes(&self) -> Result<Vec<Node>> {
        let mut stmt = self.connection().prepare(
            "SELECT id, kind, parent_id, position, name, created_date, theme
             FROM nodes WHERE kind = 'note' ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], map_node_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Returns the number of direct children of `id`.
    ///
    /// Grandchildren and deeper descendants are not included. A nonexistent
    /// `id` counts as zero rather than an error.
    pub fn count_children(&self, id: NodeId) -> Result<usize> {
        let count: i64 = self.connection().query_row(
            "SELECT COUNT(*) FROM nodes WHERE parent_id = ?1",
            rusqlite::params![id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Renames the node `id`. Works uniformly on folders and notes.
    ///
    /// # Errors
    ///
    /// Returns [`crate::InkpadError::NotFound`] if no node with `id` exists.
    pub fn rename(&mut self, id: NodeId, new_name: &str) -> Result<()> {
        let changed = self.storage.connection().execute(
            "UPDATE nodes SET name = ?1 WHERE id = ?2",
            rusqlite::params![new_name, id],
        )?;
        if changed == 0 {
            return Err(InkpadError::NotFound(id));
        }
        Ok(())
    }

    /// Sets or clears the theme tag of the node `id`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::InkpadError::NotFound`] if no node with `id` exists.
    pub fn retheme(&mut self, id: NodeId, new_theme: Option<&str>) -> Result<()> {
        let changed = self.storage.connection().execute(
            "UPDATE nodes SET theme = ?1 WHERE id = ?2",
            rusqlite::params![new_theme, id],
        )?;
        if changed == 0 {
            return Err(InkpadError::NotFound(id));
        }
        Ok(())
    }

    /// Moves `id` under `new_parent_id`, or to the top level if `None`.
    ///
    /// The node is detached from its old sibling group (closing the position
    /// gap) and appended at the end of the new one — the same attach rule as
    /// [`create_node`](Self::create_node). Detach and reattach happen in one
    /// transaction, so no reader ever sees the node in two places or in none.
    ///
    /// # Errors
    ///
    /// Returns [`crate::InkpadError::InvalidMove`] if the move would make the
    /// node its own parent or pull an ancestor under its descendant,
    /// [`crate::InkpadError::NotFound`] if either ID is unknown, or
    /// [`crate::InkpadError::NotAFolder`] if the target is a note.
    pub fn move_node(&mut self, id: NodeId, new_parent_id: Option<NodeId>) -> Result<()> {
        if new_parent_id == Some(id) {
            return Err(InkpadError::InvalidMove(
                "An item cannot be its own parent".to_string(),
            ));
        }

        let node = self.get_node(id)?;

        if let Some(pid) = new_parent_id {
            let parent = self.get_node(pid)?;
            if parent.kind != NodeKind::Folder {
                return Err(InkpadError::NotAFolder(pid));
            }

            // Cycle check: walk the ancestor chain of the new parent.
            let mut current = parent.parent_id;
            let mut depth = 0usize;
            while let Some(ancestor) = current {
                if ancestor == id {
                    return Err(InkpadError::InvalidMove(
                        "Move would create a cycle".to_string(),
                    ));
                }
                depth += 1;
                if depth > MAX_TREE_DEPTH {
                    return Err(InkpadError::CycleDetected(pid));
                }
                current = self.get_node(ancestor)?.parent_id;
            }
        }

        let old_parent_id = node.parent_id;
        let old_position = node.position;

        let tx = self.storage.connection_mut().transaction()?;

        // Close the gap in the old sibling group. Exclude the node itself:
        // during a same-parent move it still occupies old_position until the
        // final UPDATE below.
        tx.execute(
            "UPDATE nodes SET position = position - 1
             WHERE parent_id IS ?1 AND position > ?2 AND id != ?3",
            rusqlite::params![old_parent_id, old_position, id],
        )?;

        // Append at the end of the new sibling group.
        let new_position: i32 = tx.query_row(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM nodes
             WHERE parent_id IS ?1 AND id != ?2",
            rusqlite::params![new_parent_id, id],
            |row| row.get(0),
        )?;

        tx.execute(
            "UPDATE nodes SET parent_id = ?1, position = ?2 WHERE id = ?3",
            rusqlite::params![new_parent_id, new_position, id],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// Deletes `id` and all of its descendants recursively.
    ///
    /// The entire subtree is removed within a single SQLite transaction, so a
    /// mid-subtree failure leaves the database unchanged. Deleting a note
    /// also removes its content blocks; deleting a folder removes every
    /// descendant note's blocks along the way. After the subtree is gone the
    /// remaining siblings are renumbered so positions stay dense.
    ///
    /// # Errors
    ///
    /// Returns [`crate::InkpadError::NotFound`] if no node with `id` exists,
    /// or [`crate::InkpadError::Database`] for any SQLite failure. The
    /// transaction is rolled back automatically on any failure.
    pub fn delete_node(&mut self, id: NodeId) -> Result<DeleteResult> {
        let node = self.get_node(id)?;
        let old_parent_id = node.parent_id;

        let tx = self.storage.connection_mut().transaction()?;
        let result = Self::delete_subtree_in_tx(&tx, id)?;

        // Renumber the remaining siblings of the deleted node's parent.
        let sibling_ids: Vec<NodeId> = {
            let mut stmt =
                tx.prepare("SELECT id FROM nodes WHERE parent_id IS ?1 ORDER BY position, id")?;
            let ids = stmt
                .query_map(rusqlite::params![old_parent_id], |row| row.get(0))?
                .collect::<rusqlite::Result<_>>()?;
            ids
        };
        for (position, sibling_id) in sibling_ids.iter().enumerate() {
            tx.execute(
                "UPDATE nodes SET position = ?1 WHERE id = ?2",
                rusqlite::params![position as i64, sibling_id],
            )?;
        }

        tx.commit()?;
        Ok(result)
    }

    /// Recursively deletes `id` and all descendants within an existing transaction.
    ///
    /// Only child IDs are fetched (not full `Node` structs) to keep the query
    /// minimal. Children are removed before their parent so the foreign key
    /// on `parent_id` is never violated mid-delete.
    ///
    /// This helper must not open its own transaction; callers are responsible
    /// for wrapping the call in a transaction, as SQLite does not support
    /// nested transactions.
    fn delete_subtree_in_tx(tx: &rusqlite::Transaction, id: NodeId) -> Result<DeleteResult> {
        let mut affected_ids = vec![id];

        let child_ids: Vec<NodeId> = {
            let mut stmt =
                tx.prepare("SELECT id FROM nodes WHERE parent_id = ?1 ORDER BY position")?;
            let ids = stmt
                .query_map(rusqlite::params![id], |row| row.get(0))?
                .collect::<rusqlite::Result<_>>()?;
            ids
        };

        for child_id in child_ids {
            let child_result = Self::delete_subtree_in_tx(tx, child_id)?;
            affected_ids.extend(child_result.affected_ids);
        }

        // Notes own canvas content; for folders this is a no-op.
        tx.execute(
            "DELETE FROM content_blocks WHERE note_id = ?1",
            rusqlite::params![id],
        )?;

        tx.execute("DELETE FROM nodes WHERE id = ?1", rusqlite::params![id])?;

        // Detect nonexistent IDs: SQLite DELETE silently affects zero rows
        // when the ID does not exist. Surface this as NotFound.
        if tx.changes() == 0 {
            return Err(InkpadError::NotFound(id));
        }

        Ok(DeleteResult {
            deleted_count: affected_ids.len(),
            affected_ids,
        })
    }

    /// Replaces the entire canvas content of `note_id` with `blocks`.
    ///
    /// Existing blocks are cleared and the new ones inserted in order, with
    /// ordinals `0..blocks.len()`. This is the only content mutation — the
    /// editor saves the whole canvas, it never diffs individual blocks.
    ///
    /// # Errors
    ///
    /// Returns [`crate::InkpadError::NotFound`] if `note_id` is unknown, or
    /// [`crate::InkpadError::NotANote`] if it names a folder.
    pub fn replace_note_content(
        &mut self,
        note_id: NodeId,
        blocks: &[NewContentBlock],
    ) -> Result<()> {
        let node = self.get_node(note_id)?;
        if node.kind != NodeKind::Note {
            return Err(InkpadError::NotANote(note_id));
        }

        let tx = self.storage.connection_mut().transaction()?;
        tx.execute(
            "DELETE FROM content_blocks WHERE note_id = ?1",
            rusqlite::params![note_id],
        )?;
        for (ordinal, block) in blocks.iter().enumerate() {
            tx.execute(
                "INSERT INTO content_blocks
                 (note_id, ordinal, block_type, pos_x, pos_y, width, height, payload, extra_args)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                rusqlite::params![
                    note_id,
                    ordinal as i64,
                    block.block_type,
                    block.x,
                    block.y,
                    block.width,
                    block.height,
                    block.payload,
                    block.extra_args,
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Returns the canvas content of `note_id`, ordered by ordinal.
    ///
    /// The order matches insertion order, which is the draw order the editor
    /// saved the canvas in.
    ///
    /// # Errors
    ///
    /// Returns [`crate::InkpadError::NotFound`] if `note_id` is unknown — a
    /// deleted note fails here rather than reading as empty — or
    /// [`crate::InkpadError::NotANote`] if it names a folder.
    pub fn get_note_content(&self, note_id: NodeId) -> Result<Vec<ContentBlock>> {
        let node = self.get_node(note_id)?;
        if node.kind != NodeKind::Note {
            return Err(InkpadError::NotANote(note_id));
        }

        let mut stmt = self.connection().prepare(
            "SELECT id, note_id, ordinal, block_type, pos_x, pos_y, width, height, payload, extra_args
             FROM content_blocks WHERE note_id = ?1 ORDER BY ordinal",
        )?;
        let rows = stmt
            .query_map(rusqlite::params![note_id], |row| {
                Ok(ContentBlock {
                    id: row.get(0)?,
                    note_id: row.get(1)?,
                    ordinal: row.get(2)?,
                    block_type: row.get(3)?,
                    x: row.get(4)?,
                    y: row.get(5)?,
                    width: row.get(6)?,
                    height: row.get(7)?,
                    payload: row.get(8)?,
                    extra_args: row.get(9)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Returns the folder names on the path from the top level down to the
    /// parent of `id`. A top-level node yields an empty vec.
    ///
    /// # Errors
    ///
    /// Returns [`crate::InkpadError::NotFound`] if `id` is unknown, or
    /// [`crate::InkpadError::CycleDetected`] if the upward walk exceeds the
    /// maximum tree depth. A cycle cannot arise through this API; the bound
    /// keeps the walk from spinning forever on a corrupted file.
    pub fn path_of(&self, id: NodeId) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut current = self.get_node(id)?.parent_id;
        let mut depth = 0usize;

        while let Some(parent_id) = current {
            depth += 1;
            if depth > MAX_TREE_DEPTH {
                return Err(InkpadError::CycleDetected(id));
            }
            let parent = self.get_node(parent_id)?;
            names.push(parent.name);
            current = parent.parent_id;
        }

        names.reverse();
        Ok(names)
    }

    /// Checks the structural invariants the schema cannot express.
    ///
    /// Verified: every `parent_id` references an existing folder, sibling
    /// positions are distinct within each group, and every content block
    /// belongs to an existing note.
    ///
    /// # Errors
    ///
    /// Returns [`crate::InkpadError::InvariantViolation`] naming the first
    /// failed check, or [`crate::InkpadError::Database`] if a query fails.
    pub fn verify_integrity(&self) -> Result<()> {
        let bad_parents: i64 = self.connection().query_row(
            "SELECT COUNT(*) FROM nodes n
             LEFT JOIN nodes p ON n.parent_id = p.id
             WHERE n.parent_id IS NOT NULL AND (p.id IS NULL OR p.kind != 'folder')",
            [],
            |row| row.get(0),
        )?;
        if bad_parents > 0 {
            log::warn!("integrity check: {bad_parents} node(s) with a missing or non-folder parent");
            return Err(InkpadError::InvariantViolation(format!(
                "{bad_parents} node(s) have a missing or non-folder parent"
            )));
        }

        let position_collisions: i64 = self.connection().query_row(
            "SELECT COUNT(*) FROM (
                 SELECT parent_id, position FROM nodes
                 GROUP BY parent_id, position HAVING COUNT(*) > 1
             )",
            [],
            |row| row.get(0),
        )?;
        if position_collisions > 0 {
            log::warn!("integrity check: {position_collisions} sibling position collision(s)");
            return Err(InkpadError::InvariantViolation(format!(
                "{position_collisions} sibling group(s) with colliding positions"
            )));
        }

        let orphan_blocks: i64 = self.connection().query_row(
            "SELECT COUNT(*) FROM content_blocks b
             LEFT JOIN nodes n ON b.note_id = n.id
             WHERE n.id IS NULL OR n.kind != 'note'",
            [],
            |row| row.get(0),
        )?;
        if orphan_blocks > 0 {
            log::warn!("integrity check: {orphan_blocks} orphaned content block(s)");
            return Err(InkpadError::InvariantViolation(format!(
                "{orphan_blocks} content block(s) without an owning note"
            )));
        }

        Ok(())
    }
}

/// Today's date in the `YYYY-MM-DD` form the UI stores in `created_date`.
pub fn today_string() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

fn map_node_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Node> {
    let kind_str: String = row.get(1)?;
    let kind = kind_str.parse::<NodeKind>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Node {
        id: row.get(0)?,
        kind,
        parent_id: row.get(2)?,
        position: row.get(3)?,
        name: row.get(4)?,
        created_date: row.get(5)?,
        theme: row.get(6)?,
    })
}
