use crate::Result;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

/// Owns the SQLite connection for one open workspace file.
///
/// The connection lives as long as the `Storage`; individual operations open
/// per-call transactions on it rather than reconnecting.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Creates a new workspace database at `path` and initialises the schema.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self { conn })
    }

    /// Opens an existing workspace database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::InkpadError::InvalidWorkspace`] if the file is not an
    /// Inkpad database, or [`crate::InkpadError::Database`] for any SQLite
    /// failure (including a file that is not SQLite at all).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "foreign_keys", true)?;

        // Validate database structure
        let table_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master
             WHERE type='table'
             AND name IN ('nodes', 'content_blocks', 'workspace_meta')",
            [],
            |row| row.get(0),
        )?;

        if table_count != 3 {
            return Err(crate::InkpadError::InvalidWorkspace(
                "Not a valid Inkpad database".to_string(),
            ));
        }

        let application: Option<String> = conn
            .query_row(
                "SELECT value FROM workspace_meta WHERE key = 'application'",
                [],
                |row| row.get(0),
            )
            .optional()?;

        if application.as_deref() != Some("inkpad") {
            return Err(crate::InkpadError::InvalidWorkspace(
                "Not a valid Inkpad database".to_string(),
            ));
        }

        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}
