//! CUE sheet export: one `<file>.cue` next to every bookmarked file,
//! one track per bookmark.

use crate::error::Result;
use crate::store::{Bookmark, BookmarkStore};
use crate::ui::utils::file_name;
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::{info, warn};

/// `MM:SS:00`, minutes not wrapped at the hour
pub fn cue_index(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{:02}:{:02}:00", seconds / 60, seconds % 60)
}

/// `HHh:MMm:SSs`
pub fn cue_title(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!(
        "{:02}h:{:02}m:{:02}s",
        seconds / 3600,
        (seconds / 60) % 60,
        seconds % 60
    )
}

pub fn cue_sheet(file_path: &str, bookmarks: &[Bookmark]) -> String {
    let mut sheet = String::new();
    let _ = writeln!(sheet, "FILE \"{}\" MP3", file_name(file_path));

    for (i, bookmark) in bookmarks.iter().enumerate() {
        let mut title = cue_title(bookmark.position);
        let comment = bookmark.comment.trim();
        if !comment.is_empty() {
            // CUE strings cannot hold a double quote
            title.push_str(" - ");
            title.push_str(&comment.replace('"', "'"));
        }

        let _ = writeln!(sheet, "  TRACK {:02} AUDIO", i + 1);
        let _ = writeln!(sheet, "    INDEX 01 {}", cue_index(bookmark.position));
        let _ = writeln!(sheet, "    TITLE \"{}\"", title);
    }
    sheet
}

pub fn cue_path(file_path: &str) -> PathBuf {
    PathBuf::from(format!("{}.cue", file_path))
}

/// Writes a sheet for every bookmarked file. Returns how many were written.
/// A file whose directory is gone or read-only is skipped with a warning.
pub fn export_cue_sheets(store: &BookmarkStore) -> Result<usize> {
    let mut written = 0;
    let mut last_error = None;

    for file in store.files()? {
        let bookmarks = store.list_by_file(&file)?;
        if bookmarks.is_empty() {
            continue;
        }
        let path = cue_path(&file);
        match std::fs::write(&path, cue_sheet(&file, &bookmarks)) {
            Ok(()) => {
                info!("Wrote {} ({} tracks)", path.display(), bookmarks.len());
                written += 1;
            }
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) if written == 0 => Err(e.into()),
        _ => Ok(written),
    }
}
