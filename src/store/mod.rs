//! SQLite bookmark store
//!
//! One persistent connection, auto-commit per statement. Every user-supplied
//! value goes through parameter binding.

mod model;

pub use model::{
    Bookmark, BookmarkUpdate, RatingComparator, CREATED_AT_FORMAT, MAX_RATING,
};

use crate::error::{AppError, Result};
use model::{created_at_from_column, rating_from_column};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const DB_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS bookmarks (
        id INTEGER PRIMARY KEY,
        datetime_created TEXT,
        name TEXT,
        position INTEGER,
        rating INTEGER,
        comment TEXT
    );

    CREATE INDEX IF NOT EXISTS idx_bookmarks_name_position
        ON bookmarks (name, position);
"#;

const SELECT_COLUMNS: &str =
    "SELECT id, name, position, rating, comment, datetime_created FROM bookmarks";

/// Backward offset applied before looking for the previous bookmark, so that
/// resuming exactly on a bookmark still finds the one before it.
pub const ZAPPING_TOLERANCE_SECS: i64 = 1;

pub struct BookmarkStore {
    conn: Connection,
}

impl BookmarkStore {
    /// Open (or create) the store at `path`, creating parent directories.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        tracing::info!("Bookmark store opened at {:?}", path);
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(DB_SCHEMA)?;
        Ok(Self { conn })
    }

    // ===== Writes =====

    /// Insert a bookmark and return its id.
    pub fn create(
        &self,
        file_path: &str,
        position: i64,
        rating: Option<u8>,
        comment: Option<&str>,
    ) -> Result<i64> {
        if position < 0 {
            return Err(AppError::InputValidation(format!(
                "Position must not be negative (got {})",
                position
            )));
        }
        validate_rating(rating)?;

        let created = chrono::Local::now()
            .naive_local()
            .format(CREATED_AT_FORMAT)
            .to_string();

        self.conn.execute(
            "INSERT INTO bookmarks (datetime_created, name, position, rating, comment)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![created, file_path, position, rating, comment.unwrap_or("")],
        )?;

        let id = self.conn.last_insert_rowid();
        tracing::info!("Created bookmark #{} at {}s in {}", id, position, file_path);
        Ok(id)
    }

    /// Change rating and/or comment. File, position and id never change.
    pub fn update(&self, id: i64, update: &BookmarkUpdate) -> Result<()> {
        if let Some(rating) = update.rating {
            validate_rating(rating)?;
        }

        let changed = self.conn.execute(
            "UPDATE bookmarks SET
                rating = CASE WHEN ?1 THEN ?2 ELSE rating END,
                comment = COALESCE(?3, comment)
             WHERE id = ?4",
            params![
                update.rating.is_some(),
                update.rating.flatten(),
                update.comment,
                id
            ],
        )?;

        if changed == 0 {
            return Err(AppError::NotFound(id));
        }
        tracing::debug!("Updated bookmark #{}", id);
        Ok(())
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM bookmarks WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(AppError::NotFound(id));
        }
        tracing::info!("Deleted bookmark #{}", id);
        Ok(())
    }

    // ===== Queries =====

    pub fn get(&self, id: i64) -> Result<Bookmark> {
        self.conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                row_to_bookmark,
            )
            .optional()?
            .ok_or(AppError::NotFound(id))
    }

    /// Display order: id, then position.
    pub fn list_all(&self) -> Result<Vec<Bookmark>> {
        self.query(
            &format!("{} ORDER BY id ASC, position ASC", SELECT_COLUMNS),
            params![],
        )
    }

    /// Case-insensitive substring match against file path or comment.
    pub fn search(&self, needle: &str) -> Result<Vec<Bookmark>> {
        let pattern = format!("%{}%", escape_like(needle));
        self.query(
            &format!(
                "{} WHERE name LIKE ?1 ESCAPE '\\' OR comment LIKE ?1 ESCAPE '\\'
                 ORDER BY name ASC, position ASC",
                SELECT_COLUMNS
            ),
            params![pattern],
        )
    }

    pub fn list_by_file(&self, file_path: &str) -> Result<Vec<Bookmark>> {
        self.query(
            &format!("{} WHERE name = ?1 ORDER BY position ASC, id ASC", SELECT_COLUMNS),
            params![file_path],
        )
    }

    /// First bookmark strictly after `position` in the same file.
    pub fn next_after(&self, file_path: &str, position: i64) -> Result<Option<Bookmark>> {
        let found = self
            .conn
            .query_row(
                &format!(
                    "{} WHERE name = ?1 AND position > ?2
                     ORDER BY position ASC, id ASC LIMIT 1",
                    SELECT_COLUMNS
                ),
                params![file_path, position],
                row_to_bookmark,
            )
            .optional()?;
        Ok(found)
    }

    /// Last bookmark before `position - ZAPPING_TOLERANCE_SECS` in the same file.
    pub fn previous_before(&self, file_path: &str, position: i64) -> Result<Option<Bookmark>> {
        let threshold = position - ZAPPING_TOLERANCE_SECS;
        let found = self
            .conn
            .query_row(
                &format!(
                    "{} WHERE name = ?1 AND position < ?2
                     ORDER BY position DESC, id DESC LIMIT 1",
                    SELECT_COLUMNS
                ),
                params![file_path, threshold],
                row_to_bookmark,
            )
            .optional()?;
        Ok(found)
    }

    /// Bookmarks whose rating compares to `rating`. Unrated rows never match.
    pub fn filter_by_rating(&self, rating: u8, cmp: RatingComparator) -> Result<Vec<Bookmark>> {
        // The operator comes from a closed enum, the value is bound.
        self.query(
            &format!(
                "{} WHERE rating IS NOT NULL AND rating > 0 AND rating {} ?1
                 ORDER BY name ASC, position ASC",
                SELECT_COLUMNS,
                cmp.as_sql()
            ),
            params![rating],
        )
    }

    /// Distinct bookmarked files, sorted.
    pub fn files(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT name FROM bookmarks WHERE name IS NOT NULL ORDER BY name ASC")?;
        let files = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, rusqlite::Error>>()?;
        Ok(files)
    }

    fn query(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> Result<Vec<Bookmark>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, row_to_bookmark)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(rows)
    }
}

fn row_to_bookmark(row: &Row) -> rusqlite::Result<Bookmark> {
    Ok(Bookmark {
        id: row.get(0)?,
        file_path: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        position: row.get::<_, Option<i64>>(2)?.unwrap_or(0),
        rating: rating_from_column(row.get(3)?),
        comment: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        created_at: created_at_from_column(row.get(5)?),
    })
}

fn validate_rating(rating: Option<u8>) -> Result<()> {
    match rating {
        Some(r) if r == 0 || r > MAX_RATING => Err(AppError::InputValidation(format!(
            "Rating must be between 1 and {} (got {})",
            MAX_RATING, r
        ))),
        _ => Ok(()),
    }
}

/// Make `%`, `_` and `\` match literally inside a LIKE pattern.
fn escape_like(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> BookmarkStore {
        BookmarkStore::open_in_memory().unwrap()
    }

    #[test]
    fn create_then_list_all() {
        let db = store();
        let id = db.create("/music/a.mp3", 120, Some(4), Some("intro")).unwrap();
        assert_eq!(id, 1);

        let all = db.list_all().unwrap();
        assert_eq!(all.len(), 1);
        let b = &all[0];
        assert_eq!(b.file_path, "/music/a.mp3");
        assert_eq!(b.position, 120);
        assert_eq!(b.rating, Some(4));
        assert_eq!(b.comment, "intro");
        assert!(b.created_at.is_some());

        assert_eq!(db.search("intro").unwrap(), all);
        assert!(db.search("nomatch").unwrap().is_empty());
    }

    #[test]
    fn create_defaults_and_validation() {
        let db = store();
        let id = db.create("/m/x.mp3", 0, None, None).unwrap();
        let b = db.get(id).unwrap();
        assert_eq!(b.rating, None);
        assert_eq!(b.comment, "");

        assert!(matches!(
            db.create("/m/x.mp3", -1, None, None),
            Err(AppError::InputValidation(_))
        ));
        assert!(matches!(
            db.create("/m/x.mp3", 5, Some(MAX_RATING + 1), None),
            Err(AppError::InputValidation(_))
        ));
        assert!(matches!(
            db.create("/m/x.mp3", 5, Some(0), None),
            Err(AppError::InputValidation(_))
        ));
        assert_eq!(db.list_all().unwrap().len(), 1);
    }

    #[test]
    fn update_is_partial() {
        let db = store();
        let id = db.create("/m/a.mp3", 30, Some(2), Some("first")).unwrap();

        db.update(id, &BookmarkUpdate::default().comment("second")).unwrap();
        let b = db.get(id).unwrap();
        assert_eq!(b.rating, Some(2));
        assert_eq!(b.comment, "second");

        db.update(id, &BookmarkUpdate::default().rating(Some(5))).unwrap();
        let b = db.get(id).unwrap();
        assert_eq!(b.rating, Some(5));
        assert_eq!(b.comment, "second");

        db.update(id, &BookmarkUpdate::default().rating(None)).unwrap();
        assert_eq!(db.get(id).unwrap().rating, None);
    }

    #[test]
    fn update_round_trip_keeps_identity() {
        let db = store();
        let id = db.create("/m/a.mp3", 77, None, None).unwrap();
        let before = db.get(id).unwrap();

        db.update(id, &BookmarkUpdate::default().rating(Some(3)).comment("x"))
            .unwrap();

        let after = db.get(id).unwrap();
        assert_eq!(after.rating, Some(3));
        assert_eq!(after.comment, "x");
        assert_eq!(after.id, before.id);
        assert_eq!(after.file_path, before.file_path);
        assert_eq!(after.position, before.position);
        assert_eq!(after.created_at, before.created_at);
    }

    #[test]
    fn update_and_delete_missing_ids() {
        let db = store();
        assert!(matches!(
            db.update(9, &BookmarkUpdate::default().comment("x")),
            Err(AppError::NotFound(9))
        ));
        assert!(matches!(db.update(9, &BookmarkUpdate::default()), Err(AppError::NotFound(9))));

        let id = db.create("/m/a.mp3", 1, None, None).unwrap();
        db.delete(id).unwrap();
        assert!(db.list_all().unwrap().iter().all(|b| b.id != id));
        assert!(matches!(db.delete(id), Err(AppError::NotFound(_))));
    }

    #[test]
    fn list_all_orders_by_id() {
        let db = store();
        db.create("/m/b.mp3", 50, None, None).unwrap();
        db.create("/m/a.mp3", 10, None, None).unwrap();
        db.create("/m/a.mp3", 5, None, None).unwrap();
        let ids: Vec<i64> = db.list_all().unwrap().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn search_orders_by_file_then_position_and_ignores_case() {
        let db = store();
        db.create("/m/b.mp3", 50, None, Some("Chorus")).unwrap();
        db.create("/m/a.mp3", 90, None, Some("chorus again")).unwrap();
        db.create("/m/a.mp3", 10, None, Some("verse")).unwrap();
        db.create("/m/CHORUS.mp3", 1, None, None).unwrap();

        let hits = db.search("CHORUS").unwrap();
        let keys: Vec<(&str, i64)> = hits
            .iter()
            .map(|b| (b.file_path.as_str(), b.position))
            .collect();
        assert_eq!(
            keys,
            vec![("/m/CHORUS.mp3", 1), ("/m/a.mp3", 90), ("/m/b.mp3", 50)]
        );
    }

    #[test]
    fn search_treats_wildcards_and_quotes_literally() {
        let db = store();
        db.create("/m/a.mp3", 1, None, Some("100% live")).unwrap();
        db.create("/m/b.mp3", 2, None, Some("1000 live")).unwrap();
        db.create("/m/it's.mp3", 3, None, Some("Robert'); DROP TABLE bookmarks;--"))
            .unwrap();

        let hits = db.search("0%").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].comment, "100% live");

        assert!(db.search("_").unwrap().is_empty());
        assert_eq!(db.search("it's").unwrap().len(), 1);
        assert_eq!(db.list_all().unwrap().len(), 3);
    }

    #[test]
    fn next_after_picks_the_closest_later_position() {
        let db = store();
        db.create("/m/a.mp3", 200, None, None).unwrap();
        let ten = db.create("/m/a.mp3", 10, None, None).unwrap();
        db.create("/m/b.mp3", 20, None, None).unwrap();

        let next = db.next_after("/m/a.mp3", 10).unwrap().unwrap();
        assert_eq!(next.position, 200);
        let next = db.next_after("/m/a.mp3", 0).unwrap().unwrap();
        assert_eq!(next.id, ten);
        assert!(db.next_after("/m/a.mp3", 200).unwrap().is_none());
        assert!(db.next_after("/m/none.mp3", 0).unwrap().is_none());
    }

    #[test]
    fn next_after_breaks_ties_by_id() {
        let db = store();
        let first = db.create("/m/a.mp3", 40, None, None).unwrap();
        db.create("/m/a.mp3", 40, None, None).unwrap();
        assert_eq!(db.next_after("/m/a.mp3", 39).unwrap().unwrap().id, first);
    }

    #[test]
    fn previous_before_applies_tolerance() {
        let db = store();
        db.create("/m/a.mp3", 10, None, None).unwrap();
        db.create("/m/a.mp3", 100, None, None).unwrap();

        // Resuming exactly on 100 must not find 100 again
        let prev = db.previous_before("/m/a.mp3", 100).unwrap().unwrap();
        assert_eq!(prev.position, 10);
        let prev = db.previous_before("/m/a.mp3", 101).unwrap().unwrap();
        assert_eq!(prev.position, 10);
        let prev = db.previous_before("/m/a.mp3", 102).unwrap().unwrap();
        assert_eq!(prev.position, 100);
        assert!(db.previous_before("/m/a.mp3", 11).unwrap().is_none());
    }

    #[test]
    fn previous_before_never_returns_within_tolerance() {
        let db = store();
        for pos in [0, 3, 7, 8, 9, 15, 40] {
            db.create("/m/a.mp3", pos, None, None).unwrap();
        }
        for p in 0..50 {
            if let Some(b) = db.previous_before("/m/a.mp3", p).unwrap() {
                assert!(b.position < p - 1, "p={} got {}", p, b.position);
            }
        }
    }

    #[test]
    fn previous_before_breaks_ties_by_highest_id() {
        let db = store();
        db.create("/m/a.mp3", 40, None, None).unwrap();
        let second = db.create("/m/a.mp3", 40, None, None).unwrap();
        assert_eq!(db.previous_before("/m/a.mp3", 60).unwrap().unwrap().id, second);
    }

    #[test]
    fn filter_by_rating_uses_comparator() {
        let db = store();
        db.create("/m/a.mp3", 1, Some(2), None).unwrap();
        db.create("/m/a.mp3", 2, Some(4), None).unwrap();
        db.create("/m/a.mp3", 3, Some(6), None).unwrap();
        db.create("/m/a.mp3", 4, None, None).unwrap();

        let count = |cmp| db.filter_by_rating(4, cmp).unwrap().len();
        assert_eq!(count(RatingComparator::Less), 1);
        assert_eq!(count(RatingComparator::LessOrEqual), 2);
        assert_eq!(count(RatingComparator::Equal), 1);
        assert_eq!(count(RatingComparator::GreaterOrEqual), 2);
        assert_eq!(count(RatingComparator::Greater), 1);
    }

    #[test]
    fn list_by_file_and_files() {
        let db = store();
        db.create("/m/b.mp3", 9, None, None).unwrap();
        db.create("/m/a.mp3", 30, None, None).unwrap();
        db.create("/m/a.mp3", 3, None, None).unwrap();

        let positions: Vec<i64> = db
            .list_by_file("/m/a.mp3")
            .unwrap()
            .iter()
            .map(|b| b.position)
            .collect();
        assert_eq!(positions, vec![3, 30]);
        assert_eq!(db.files().unwrap(), vec!["/m/a.mp3", "/m/b.mp3"]);
    }

    #[test]
    fn reopening_keeps_rows_and_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("bookmarks.sqlite");
        {
            let db = BookmarkStore::open(&path).unwrap();
            db.create("/m/a.mp3", 12, Some(1), Some("kept")).unwrap();
        }
        let db = BookmarkStore::open(&path).unwrap();
        let all = db.list_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].comment, "kept");
    }

    #[test]
    fn legacy_rows_without_timestamp_load() {
        let db = store();
        db.conn
            .execute(
                "INSERT INTO bookmarks (name, rating, position, comment) VALUES ('/m/old.mp3', NULL, 5, '')",
                [],
            )
            .unwrap();
        let all = db.list_all().unwrap();
        assert_eq!(all[0].created_at, None);
        assert_eq!(all[0].rating, None);
    }

    #[test]
    fn escape_like_escapes_specials() {
        assert_eq!(escape_like("a%b_c\\d"), "a\\%b\\_c\\\\d");
        assert_eq!(escape_like("plain"), "plain");
    }
}
