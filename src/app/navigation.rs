//! Next/previous lookup, rating glyphs and list filtering.
//!
//! Pure reads over the store and a playback snapshot.

use crate::error::Result;
use crate::player::PlaybackState;
use crate::store::{Bookmark, BookmarkStore, RatingComparator};

pub const FILLED_MARK: char = '★';
pub const EMPTY_MARK: char = '☆';

/// Bookmark after the live position in the playing file
pub fn find_next(store: &BookmarkStore, state: &PlaybackState) -> Result<Option<Bookmark>> {
    match state.cursor() {
        Some((file, position)) => store.next_after(file, position),
        None => Ok(None),
    }
}

/// Bookmark before the live position, honoring the tolerance window
pub fn find_previous(store: &BookmarkStore, state: &PlaybackState) -> Result<Option<Bookmark>> {
    match state.cursor() {
        Some((file, position)) => store.previous_before(file, position),
        None => Ok(None),
    }
}

/// `rating` filled marks then empty marks up to `max_rating`.
pub fn rating_glyph(rating: Option<u8>, max_rating: u8) -> String {
    let filled = rating.unwrap_or(0).min(max_rating) as usize;
    let empty = max_rating as usize - filled;

    let mut glyph = String::with_capacity((filled + empty) * FILLED_MARK.len_utf8());
    glyph.extend(std::iter::repeat(FILLED_MARK).take(filled));
    glyph.extend(std::iter::repeat(EMPTY_MARK).take(empty));
    glyph
}

/// `>=4`, `<3`, `=5`... as typed in the search field
pub fn parse_rating_filter(text: &str) -> Option<(RatingComparator, u8)> {
    let split = text.find(|c: char| c.is_ascii_digit())?;
    let (op, value) = text.split_at(split);
    let cmp = RatingComparator::parse(op.trim())?;
    let rating = value.trim().parse::<u8>().ok()?;
    Some((cmp, rating))
}

/// Empty search text lists everything in display order. A rating
/// comparison filters by rating, anything else is a substring search.
pub fn apply_filter(store: &BookmarkStore, search_text: Option<&str>) -> Result<Vec<Bookmark>> {
    match search_text.map(str::trim) {
        Some(text) if !text.is_empty() => match parse_rating_filter(text) {
            Some((cmp, rating)) => store.filter_by_rating(rating, cmp),
            None => store.search(text),
        },
        _ => store.list_all(),
    }
}
