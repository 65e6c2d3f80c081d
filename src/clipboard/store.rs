//! Clipboard history store: a single SQLite connection (WAL journal mode,
//! foreign keys on) with an FTS5 index for text search. Schema and
//! operation set follow the original clipboard store exactly; `rusqlite`
//! replaces hand-rolled `sqlite3_stmt*` management with safe prepared
//! statements reused across calls.

use super::error::{ClipboardError, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ContentType {
    Text = 0,
    Image = 1,
    Unknown = 2,
}

impl ContentType {
    fn from_i32(v: i32) -> ContentType {
        match v {
            0 => ContentType::Text,
            1 => ContentType::Image,
            _ => ContentType::Unknown,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClipboardRecord {
    pub id: i64,
    pub content_type: ContentType,
    pub content: String,
    pub content_hash: String,
    pub source_app: Option<String>,
    pub thumbnail_path: Option<String>,
    pub image_format: Option<String>,
    pub image_width: Option<u32>,
    pub image_height: Option<u32>,
    pub file_size: Option<u64>,
    pub created_at: i64,
    pub last_used_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddRecordResult {
    pub id: i64,
    pub is_new: bool,
}

/// Single-connection clipboard history store. All access happens on one
/// background task/thread; callers outside that task go through the
/// controller's channel, not this struct directly.
pub struct ClipboardStore {
    conn: Connection,
}

impl ClipboardStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", true)?;
        let store = Self { conn };
        store.create_tables()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", true)?;
        let store = Self { conn };
        store.create_tables()?;
        Ok(store)
    }

    fn create_tables(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                content_type INTEGER NOT NULL,
                content TEXT NOT NULL,
                content_hash TEXT NOT NULL UNIQUE,
                source_app TEXT,
                thumbnail_path TEXT,
                image_format TEXT,
                image_width INTEGER,
                image_height INTEGER,
                file_size INTEGER,
                created_at INTEGER NOT NULL,
                last_used_at INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_records_last_used ON records(last_used_at DESC);
            CREATE INDEX IF NOT EXISTS idx_records_created ON records(created_at DESC);
            CREATE INDEX IF NOT EXISTS idx_records_content_type ON records(content_type);
            CREATE VIRTUAL TABLE IF NOT EXISTS records_fts USING fts5(
                content, content='records', content_rowid='id'
            );
            CREATE TRIGGER IF NOT EXISTS records_ai AFTER INSERT ON records
            WHEN new.content_type = 0 BEGIN
                INSERT INTO records_fts(rowid, content) VALUES (new.id, new.content);
            END;
            CREATE TRIGGER IF NOT EXISTS records_ad AFTER DELETE ON records
            WHEN old.content_type = 0 BEGIN
                INSERT INTO records_fts(records_fts, rowid, content) VALUES ('delete', old.id, old.content);
            END;
            CREATE TRIGGER IF NOT EXISTS records_au AFTER UPDATE ON records
            WHEN new.content_type = 0 OR old.content_type = 0 BEGIN
                INSERT INTO records_fts(records_fts, rowid, content)
                    SELECT 'delete', old.id, old.content WHERE old.content_type = 0;
                INSERT INTO records_fts(rowid, content)
                    SELECT new.id, new.content WHERE new.content_type = 0;
            END;
            "#,
        )?;
        Ok(())
    }

    /// Inserts a new record, or if `content_hash` already exists, bumps
    /// that record's `last_used_at` and returns its existing id.
    pub fn add_record(
        &self,
        content_type: ContentType,
        content: &str,
        content_hash: &str,
        source_app: Option<&str>,
        thumbnail_path: Option<&str>,
        image_format: Option<&str>,
        image_width: Option<u32>,
        image_height: Option<u32>,
        file_size: Option<u64>,
    ) -> Result<AddRecordResult> {
        if let Some(existing) = self.find_by_hash(content_hash)? {
            self.update_last_used_time(existing.id)?;
            return Ok(AddRecordResult {
                id: existing.id,
                is_new: false,
            });
        }

        let now = Utc::now().timestamp_millis();
        self.conn.execute(
            "INSERT INTO records (content_type, content, content_hash, source_app,
                thumbnail_path, image_format, image_width, image_height, file_size,
                created_at, last_used_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
            params![
                content_type as i32,
                content,
                content_hash,
                source_app,
                thumbnail_path,
                image_format,
                image_width,
                image_height,
                file_size,
                now,
            ],
        )?;
        Ok(AddRecordResult {
            id: self.conn.last_insert_rowid(),
            is_new: true,
        })
    }

    pub fn find_by_hash(&self, hash: &str) -> Result<Option<ClipboardRecord>> {
        self.conn
            .query_row(
                "SELECT * FROM records WHERE content_hash = ?1",
                params![hash],
                row_to_record,
            )
            .optional()
            .map_err(ClipboardError::from)
    }

    pub fn get_record(&self, id: i64) -> Result<Option<ClipboardRecord>> {
        self.conn
            .query_row("SELECT * FROM records WHERE id = ?1", params![id], row_to_record)
            .optional()
            .map_err(ClipboardError::from)
    }

    pub fn update_last_used_time(&self, id: i64) -> Result<()> {
        let now = Utc::now().timestamp_millis();
        self.conn.execute(
            "UPDATE records SET last_used_at = ?1 WHERE id = ?2",
            params![now, id],
        )?;
        Ok(())
    }

    /// Records ordered by most-recently-used first.
    pub fn get_all_records(&self, limit: u32, offset: u32) -> Result<Vec<ClipboardRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT * FROM records ORDER BY last_used_at DESC LIMIT ?1 OFFSET ?2",
        )?;
        let rows = stmt.query_map(params![limit, offset], row_to_record)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(ClipboardError::from)
    }

    /// FTS5 prefix match (`"<kw>"*`) first; falls back to a plain `LIKE`
    /// scan if the FTS query fails to parse or simply returns no rows.
    /// `keyword` must be non-empty.
    pub fn search_text(&self, keyword: &str, limit: u32) -> Result<Vec<ClipboardRecord>> {
        if keyword.trim().is_empty() {
            return Err(ClipboardError::InvalidInput("search keyword must not be empty".into()));
        }
        match self.search_text_fts(keyword, limit) {
            Ok(results) if !results.is_empty() => Ok(results),
            _ => self.search_text_fallback(keyword, limit),
        }
    }

    fn search_text_fts(&self, keyword: &str, limit: u32) -> Result<Vec<ClipboardRecord>> {
        let escaped = keyword.replace('"', "\"\"");
        let query = format!("\"{escaped}\"*");
        let mut stmt = self.conn.prepare(
            "SELECT records.* FROM records
             JOIN records_fts ON records.id = records_fts.rowid
             WHERE records_fts MATCH ?1
             ORDER BY records.last_used_at DESC LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![query, limit], row_to_record)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(ClipboardError::from)
    }

    fn search_text_fallback(&self, keyword: &str, limit: u32) -> Result<Vec<ClipboardRecord>> {
        let pattern = format!("%{}%", keyword.replace('%', "\\%").replace('_', "\\_"));
        let mut stmt = self.conn.prepare(
            "SELECT * FROM records WHERE content LIKE ?1 ESCAPE '\\'
             ORDER BY last_used_at DESC LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![pattern, limit], row_to_record)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(ClipboardError::from)
    }

    /// Deletes a record and returns it so the caller can unlink any image
    /// files it referenced. Returns `None` if `id` didn't exist.
    pub fn delete_record(&self, id: i64) -> Result<Option<ClipboardRecord>> {
        let record = self.get_record(id)?;
        if record.is_some() {
            self.conn.execute("DELETE FROM records WHERE id = ?1", params![id])?;
        }
        Ok(record)
    }

    /// Applies the retention policy and returns every deleted record so the
    /// caller can unlink their image files.
    ///
    /// - Both bounds set: deletes rows older than `max_age_days` (by
    ///   `created_at`) that also fall outside the `max_count` most
    ///   recently-used rows.
    /// - Only one bound set: that bound alone decides what's deleted.
    /// - Both zero: no-op.
    ///
    /// Runs inside a single transaction.
    pub fn delete_expired_records(
        &self,
        max_age_days: u32,
        max_count: u32,
    ) -> Result<Vec<ClipboardRecord>> {
        if max_age_days == 0 && max_count == 0 {
            return Ok(Vec::new());
        }
        let tx = self.conn.unchecked_transaction()?;
        let cutoff = Utc::now().timestamp_millis() - (max_age_days as i64) * 86_400_000;

        let victims: Vec<ClipboardRecord> = if max_age_days > 0 && max_count > 0 {
            let mut stmt = tx.prepare(
                "SELECT * FROM records WHERE created_at < ?1 AND id NOT IN (
                    SELECT id FROM records ORDER BY last_used_at DESC LIMIT ?2
                 )",
            )?;
            let rows = stmt.query_map(params![cutoff, max_count], row_to_record)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        } else if max_age_days > 0 {
            let mut stmt = tx.prepare("SELECT * FROM records WHERE created_at < ?1")?;
            let rows = stmt.query_map(params![cutoff], row_to_record)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        } else {
            let mut stmt = tx.prepare(
                "SELECT * FROM records WHERE id NOT IN (
                    SELECT id FROM records ORDER BY last_used_at DESC LIMIT ?1
                 )",
            )?;
            let rows = stmt.query_map(params![max_count], row_to_record)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };

        {
            let mut del = tx.prepare("DELETE FROM records WHERE id = ?1")?;
            for record in &victims {
                del.execute(params![record.id])?;
            }
        }
        tx.commit()?;
        Ok(victims)
    }

    /// Deletes every record and returns them so the caller can unlink their
    /// image files.
    pub fn clear_all(&self) -> Result<Vec<ClipboardRecord>> {
        let tx = self.conn.unchecked_transaction()?;
        let all = {
            let mut stmt = tx.prepare("SELECT * FROM records")?;
            let rows = stmt.query_map([], row_to_record)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };
        tx.execute("DELETE FROM records", [])?;
        tx.commit()?;
        Ok(all)
    }

    pub fn record_count(&self) -> Result<u32> {
        self.conn
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))
            .map_err(ClipboardError::from)
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<ClipboardRecord> {
    Ok(ClipboardRecord {
        id: row.get("id")?,
        content_type: ContentType::from_i32(row.get("content_type")?),
        content: row.get("content")?,
        content_hash: row.get("content_hash")?,
        source_app: row.get("source_app")?,
        thumbnail_path: row.get("thumbnail_path")?,
        image_format: row.get("image_format")?,
        image_width: row.get("image_width")?,
        image_height: row.get("image_height")?,
        file_size: row.get("file_size")?,
        created_at: row.get("created_at")?,
        last_used_at: row.get("last_used_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ClipboardStore {
        ClipboardStore::open_in_memory().unwrap()
    }

    #[test]
    fn add_record_then_fetch() {
        let store = store();
        let result = store
            .add_record(ContentType::Text, "hello", "hash1", None, None, None, None, None, None)
            .unwrap();
        assert!(result.is_new);
        let record = store.get_record(result.id).unwrap().unwrap();
        assert_eq!(record.content, "hello");
    }

    #[test]
    fn duplicate_hash_updates_last_used_instead_of_inserting() {
        let store = store();
        let first = store
            .add_record(ContentType::Text, "hello", "hash1", None, None, None, None, None, None)
            .unwrap();
        let second = store
            .add_record(ContentType::Text, "hello again", "hash1", None, None, None, None, None, None)
            .unwrap();
        assert_eq!(first.id, second.id);
        assert!(!second.is_new);
        assert_eq!(store.record_count().unwrap(), 1);
    }

    #[test]
    fn search_text_finds_fts_matches() {
        let store = store();
        store
            .add_record(ContentType::Text, "the quick brown fox", "h1", None, None, None, None, None, None)
            .unwrap();
        store
            .add_record(ContentType::Text, "lazy dog", "h2", None, None, None, None, None, None)
            .unwrap();
        let results = store.search_text("quick", 10).unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].content.contains("quick"));
    }

    #[test]
    fn retention_with_count_only_keeps_the_n_most_recently_used() {
        let store = store();
        for i in 0..5 {
            store
                .add_record(ContentType::Text, &format!("item{i}"), &format!("h{i}"), None, None, None, None, None, None)
                .unwrap();
        }
        let deleted = store.delete_expired_records(0, 3).unwrap();
        assert_eq!(deleted.len(), 2);
        assert_eq!(store.record_count().unwrap(), 3);
    }

    #[test]
    fn retention_with_both_bounds_zero_is_a_no_op() {
        let store = store();
        store
            .add_record(ContentType::Text, "item", "h1", None, None, None, None, None, None)
            .unwrap();
        let deleted = store.delete_expired_records(0, 0).unwrap();
        assert!(deleted.is_empty());
        assert_eq!(store.record_count().unwrap(), 1);
    }

    #[test]
    fn delete_record_returns_the_deleted_row() {
        let store = store();
        let result = store
            .add_record(ContentType::Text, "hello", "hash1", None, None, None, None, None, None)
            .unwrap();
        let deleted = store.delete_record(result.id).unwrap().unwrap();
        assert_eq!(deleted.content, "hello");
        assert!(store.get_record(result.id).unwrap().is_none());
        assert!(store.delete_record(result.id).unwrap().is_none());
    }

    #[test]
    fn clear_all_returns_every_deleted_record() {
        let store = store();
        store
            .add_record(ContentType::Text, "a", "h1", None, None, None, None, None, None)
            .unwrap();
        store
            .add_record(ContentType::Text, "b", "h2", None, None, None, None, None, None)
            .unwrap();
        let deleted = store.clear_all().unwrap();
        assert_eq!(deleted.len(), 2);
        assert_eq!(store.record_count().unwrap(), 0);
    }

    #[test]
    fn search_text_rejects_empty_keyword() {
        let store = store();
        assert!(store.search_text("", 10).is_err());
        assert!(store.search_text("   ", 10).is_err());
    }

    #[test]
    fn search_text_falls_back_to_like_when_fts_finds_nothing() {
        let store = store();
        store
            .add_record(ContentType::Text, "hello world", "h1", None, None, None, None, None, None)
            .unwrap();
        // "orl" is not a valid FTS prefix match for "world" but the LIKE
        // fallback still finds it as a substring.
        let results = store.search_text("orl", 10).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn readding_the_same_hash_bumps_last_used_at_without_a_second_row() {
        let store = store();
        let first = store
            .add_record(ContentType::Text, "hi", "abc", None, None, None, None, None, None)
            .unwrap();
        let before = store.get_record(first.id).unwrap().unwrap().last_used_at;
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = store
            .add_record(ContentType::Text, "hi", "abc", None, None, None, None, None, None)
            .unwrap();
        assert_eq!(second, AddRecordResult { id: first.id, is_new: false });
        assert_eq!(store.record_count().unwrap(), 1);
        let after = store.get_record(first.id).unwrap().unwrap().last_used_at;
        assert!(after >= before);
    }

    #[test]
    fn retention_combined_keeps_the_most_recently_used_three_in_order() {
        let store = store();
        for i in 1..=5 {
            store
                .add_record(ContentType::Text, &format!("item{i}"), &format!("h{i}"), None, None, None, None, None, None)
                .unwrap();
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        let deleted = store.delete_expired_records(0, 3).unwrap();
        assert_eq!(deleted.len(), 2);
        let deleted_contents: Vec<_> = deleted.iter().map(|r| r.content.as_str()).collect();
        assert!(deleted_contents.contains(&"item1"));
        assert!(deleted_contents.contains(&"item2"));

        let remaining = store.get_all_records(10, 0).unwrap();
        assert_eq!(remaining[0].content, "item5");
        assert_eq!(remaining[2].content, "item3");
    }

    #[test]
    fn get_all_records_orders_by_last_used_desc() {
        let store = store();
        store
            .add_record(ContentType::Text, "first", "h1", None, None, None, None, None, None)
            .unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        store
            .add_record(ContentType::Text, "second", "h2", None, None, None, None, None, None)
            .unwrap();
        let all = store.get_all_records(10, 0).unwrap();
        assert_eq!(all[0].content, "second");
    }
}
