use chrono::NaiveDateTime;

/// Highest rating a bookmark can carry
pub const MAX_RATING: u8 = 6;

/// Stored format of `datetime_created`
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A saved position within an audio file 🔖
#[derive(Debug, Clone, PartialEq)]
pub struct Bookmark {
    pub id: i64,
    pub file_path: String,
    /// Offset in whole seconds
    pub position: i64,
    pub rating: Option<u8>,
    pub comment: String,
    /// Rows written by older versions carry no timestamp
    pub created_at: Option<NaiveDateTime>,
}

/// Partial update: `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookmarkUpdate {
    /// `Some(None)` clears the rating
    pub rating: Option<Option<u8>>,
    pub comment: Option<String>,
}

impl BookmarkUpdate {
    pub fn rating(mut self, rating: Option<u8>) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Comparison used by rating filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingComparator {
    Less,
    LessOrEqual,
    Equal,
    GreaterOrEqual,
    Greater,
}

impl RatingComparator {
    pub fn as_sql(self) -> &'static str {
        match self {
            RatingComparator::Less => "<",
            RatingComparator::LessOrEqual => "<=",
            RatingComparator::Equal => "=",
            RatingComparator::GreaterOrEqual => ">=",
            RatingComparator::Greater => ">",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "<" => Some(RatingComparator::Less),
            "<=" => Some(RatingComparator::LessOrEqual),
            "=" | "==" => Some(RatingComparator::Equal),
            ">=" => Some(RatingComparator::GreaterOrEqual),
            ">" => Some(RatingComparator::Greater),
            _ => None,
        }
    }
}

/// Parse a stored rating; zero and out-of-range legacy values read as unset.
pub fn rating_from_column(raw: Option<i64>) -> Option<u8> {
    match raw {
        Some(r) if (1..=MAX_RATING as i64).contains(&r) => Some(r as u8),
        Some(r) if r > MAX_RATING as i64 => Some(MAX_RATING),
        _ => None,
    }
}

pub fn created_at_from_column(raw: Option<String>) -> Option<NaiveDateTime> {
    raw.and_then(|s| NaiveDateTime::parse_from_str(s.trim(), CREATED_AT_FORMAT).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparator_parses_every_operator() {
        for op in ["<", "<=", "=", ">=", ">"] {
            let cmp = RatingComparator::parse(op).unwrap();
            assert_eq!(cmp.as_sql(), op);
        }
        assert_eq!(RatingComparator::parse("=="), Some(RatingComparator::Equal));
        assert_eq!(RatingComparator::parse("; DROP"), None);
    }

    #[test]
    fn legacy_ratings_are_normalized() {
        assert_eq!(rating_from_column(None), None);
        assert_eq!(rating_from_column(Some(0)), None);
        assert_eq!(rating_from_column(Some(-3)), None);
        assert_eq!(rating_from_column(Some(4)), Some(4));
        assert_eq!(rating_from_column(Some(9)), Some(MAX_RATING));
    }

    #[test]
    fn created_at_tolerates_garbage() {
        assert!(created_at_from_column(Some("2024-03-01 10:11:12".into())).is_some());
        assert!(created_at_from_column(Some("yesterday".into())).is_none());
        assert!(created_at_from_column(None).is_none());
    }

    #[test]
    fn update_builder_tracks_fields() {
        assert_eq!(BookmarkUpdate::default(), BookmarkUpdate { rating: None, comment: None });
        let u = BookmarkUpdate::default().rating(None).comment("x");
        assert_eq!(u.rating, Some(None));
        assert_eq!(u.comment.as_deref(), Some("x"));
    }
}
