//! Note table operations

use rusqlite::{params, OptionalExtension, Row};

use super::super::sqlite::{Database, StoreResult};
use crate::models::{Note, NoteDraft};

impl Database {
    /// All notes in rowid order
    pub fn list_notes(&self) -> StoreResult<Vec<Note>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, title, content FROM notes ORDER BY id")?;

        let notes = stmt
            .query_map([], Self::row_to_note)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(notes)
    }

    pub fn get_note(&self, id: i64) -> StoreResult<Option<Note>> {
        let conn = self.conn()?;
        let note = conn
            .query_row(
                "SELECT id, title, content FROM notes WHERE id = ?1",
                [id],
                Self::row_to_note,
            )
            .optional()?;

        Ok(note)
    }

    /// Insert a note and return it with its assigned id
    pub fn create_note(&self, draft: &NoteDraft) -> StoreResult<Note> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO notes (title, content) VALUES (?1, ?2)",
            params![draft.title, draft.content],
        )?;

        let id = conn.last_insert_rowid();
        log::debug!("[NOTES] Created note {}", id);

        Ok(draft.clone().into_note(id))
    }

    /// Overwrite every field except the id. Returns None if the note does not exist.
    pub fn update_note(&self, id: i64, draft: &NoteDraft) -> StoreResult<Option<Note>> {
        let conn = self.conn()?;
        let rows_affected = conn.execute(
            "UPDATE notes SET title = ?1, content = ?2 WHERE id = ?3",
            params![draft.title, draft.content, id],
        )?;

        if rows_affected == 0 {
            return Ok(None);
        }

        log::debug!("[NOTES] Updated note {}", id);
        Ok(Some(draft.clone().into_note(id)))
    }

    /// Delete a note. Returns false if it did not exist.
    pub fn delete_note(&self, id: i64) -> StoreResult<bool> {
        let conn = self.conn()?;
        let rows_affected = conn.execute("DELETE FROM notes WHERE id = ?1", [id])?;

        if rows_affected > 0 {
            log::debug!("[NOTES] Deleted note {}", id);
        }
        Ok(rows_affected > 0)
    }

    pub fn count_notes(&self) -> StoreResult<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))?;
        Ok(count)
    }

    fn row_to_note(row: &Row<'_>) -> rusqlite::Result<Note> {
        Ok(Note {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
        })
    }
}
