//! Modal dialogs: state, local key bindings and typed results.
//!
//! A dialog runs inside `Controller::run_modal`, which blocks the outer
//! loop until `handle_key` returns an outcome.

use crate::store::{Bookmark, MAX_RATING};
use crate::ui::utils::format_seconds;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a modal hands back to whoever opened it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome<T> {
    Accepted(T),
    Cancelled,
}

/// Borrowed view of the active dialog, for rendering
#[derive(Debug, Clone, Copy)]
pub enum DialogView<'a> {
    Bookmark(&'a BookmarkForm),
    Confirm(&'a ConfirmPrompt),
}

pub trait Modal {
    type Output;

    /// `None` keeps the dialog open
    fn handle_key(&mut self, key: KeyEvent) -> Option<DialogOutcome<Self::Output>>;

    fn view(&self) -> DialogView<'_>;
}

/// Validated values of an accepted bookmark form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkInput {
    pub rating: Option<u8>,
    pub comment: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Rating,
    Comment,
}

/// Create/edit bookmark dialog 🔖
#[derive(Debug, Clone)]
pub struct BookmarkForm {
    pub title: String,
    pub heading: String,
    pub file_path: String,
    pub position: i64,
    pub rating: String,
    pub comment: String,
    pub active_field: FormField,
    pub error: Option<String>,
}

impl BookmarkForm {
    /// Empty form for the live playback position
    pub fn for_capture(file_path: &str, position: i64) -> Self {
        Self {
            title: "Bookmark position".to_string(),
            heading: "Save a bookmark for the current position".to_string(),
            file_path: file_path.to_string(),
            position,
            rating: String::new(),
            comment: String::new(),
            active_field: FormField::Rating,
            error: None,
        }
    }

    /// Form pre-filled from an existing bookmark
    pub fn for_edit(bookmark: &Bookmark) -> Self {
        Self {
            title: "Edit bookmark".to_string(),
            heading: format!("Bookmark #{}", bookmark.id),
            file_path: bookmark.file_path.clone(),
            position: bookmark.position,
            rating: bookmark.rating.map(|r| r.to_string()).unwrap_or_default(),
            comment: bookmark.comment.clone(),
            active_field: FormField::Rating,
            error: None,
        }
    }

    pub fn position_label(&self) -> String {
        format_seconds(self.position)
    }

    pub fn active_value(&mut self) -> &mut String {
        match self.active_field {
            FormField::Rating => &mut self.rating,
            FormField::Comment => &mut self.comment,
        }
    }

    pub fn next_field(&mut self) {
        self.active_field = match self.active_field {
            FormField::Rating => FormField::Comment,
            FormField::Comment => FormField::Rating,
        };
    }

    pub fn prev_field(&mut self) {
        // Two fields: same as next
        self.next_field();
    }

    /// Empty and zero mean "unset"; anything else must be in `1..=MAX_RATING`.
    pub fn parse_rating(&self) -> Result<Option<u8>, String> {
        let raw = self.rating.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        match raw.parse::<u8>() {
            Ok(0) => Ok(None),
            Ok(r) if r <= MAX_RATING => Ok(Some(r)),
            _ => Err(format!("Rating must be between 1 and {}", MAX_RATING)),
        }
    }
}

impl Modal for BookmarkForm {
    type Output = BookmarkInput;

    fn handle_key(&mut self, key: KeyEvent) -> Option<DialogOutcome<BookmarkInput>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return None;
        }
        match key.code {
            KeyCode::Esc => return Some(DialogOutcome::Cancelled),
            KeyCode::Enter => match self.parse_rating() {
                Ok(rating) => {
                    return Some(DialogOutcome::Accepted(BookmarkInput {
                        rating,
                        comment: self.comment.trim_end().to_string(),
                    }))
                }
                Err(msg) => {
                    self.error = Some(msg);
                    self.active_field = FormField::Rating;
                }
            },
            KeyCode::Tab | KeyCode::Down => self.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.prev_field(),
            KeyCode::Backspace => {
                self.active_value().pop();
                self.error = None;
            }
            KeyCode::Char(c) => {
                let accept = match self.active_field {
                    FormField::Rating => c.is_ascii_digit() && self.rating.len() < 3,
                    FormField::Comment => !c.is_control(),
                };
                if accept {
                    self.active_value().push(c);
                    self.error = None;
                }
            }
            _ => {}
        }
        None
    }

    fn view(&self) -> DialogView<'_> {
        DialogView::Bookmark(self)
    }
}

/// Yes/no question
#[derive(Debug, Clone)]
pub struct ConfirmPrompt {
    pub title: String,
    pub lines: Vec<String>,
}

impl ConfirmPrompt {
    pub fn new(title: &str, lines: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            lines: lines.iter().map(|l| l.to_string()).collect(),
        }
    }
}

impl Modal for ConfirmPrompt {
    type Output = ();

    fn handle_key(&mut self, key: KeyEvent) -> Option<DialogOutcome<()>> {
        match key.code {
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                Some(DialogOutcome::Accepted(()))
            }
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                Some(DialogOutcome::Cancelled)
            }
            _ => None,
        }
    }

    fn view(&self) -> DialogView<'_> {
        DialogView::Confirm(self)
    }
}
