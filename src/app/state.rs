use super::config::UserConfig;
use super::keys::KeyConfig;
use super::navigation;
use crate::error::Result;
use crate::player::{PlaybackState, PlayerBridge, SeekPolicy};
use crate::store::{Bookmark, BookmarkStore, MAX_RATING};
use crate::ui::theme::Theme;
use std::time::{Duration, Instant};

/// Which part of the main screen takes typed keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    List,
    Search,
}

/// One rendered line of the bookmark list
#[derive(Debug, Clone, PartialEq)]
pub struct BookmarkRow {
    pub bookmark: Bookmark,
    pub glyph: String,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub start_time: Instant,
    pub deadline: Instant,
}

/// Application context handed to the controller and every command handler
pub struct App {
    pub theme: Theme,
    pub keys: KeyConfig,
    pub store: BookmarkStore,
    pub player: Box<dyn PlayerBridge>,
    pub seek_policy: SeekPolicy,
    pub max_rating: u8,

    pub is_running: bool,
    pub focus: Focus,

    /// Text in the search field
    pub search_query: String,
    /// Filter the list was last built with (None = everything)
    pub active_filter: Option<String>,

    pub rows: Vec<BookmarkRow>,
    pub selected: usize,

    /// Last observed player state, shown in the header
    pub playback: PlaybackState,
    pub status_poll: Option<Duration>,
    pub last_status_poll: Instant,

    pub toast: Option<Toast>,
}

impl App {
    pub fn new(store: BookmarkStore, player: Box<dyn PlayerBridge>, config: &UserConfig) -> Self {
        Self {
            theme: config.theme.clone(),
            keys: config.keys.clone(),
            store,
            player,
            seek_policy: config.seek_policy(),
            max_rating: MAX_RATING,
            is_running: true,
            focus: Focus::default(),
            search_query: String::new(),
            active_filter: None,
            rows: Vec::new(),
            selected: 0,
            playback: PlaybackState::default(),
            status_poll: config.status_poll(),
            last_status_poll: Instant::now(),
            toast: None,
        }
    }

    pub fn selected_bookmark(&self) -> Option<&Bookmark> {
        self.rows.get(self.selected).map(|row| &row.bookmark)
    }

    /// Rebuild rows from the store with the active filter.
    /// The selection index survives unless the list got shorter than it.
    pub fn reload_rows(&mut self) -> Result<()> {
        let bookmarks = navigation::apply_filter(&self.store, self.active_filter.as_deref())?;
        self.rows = bookmarks
            .into_iter()
            .map(|bookmark| BookmarkRow {
                glyph: navigation::rating_glyph(bookmark.rating, self.max_rating),
                bookmark,
            })
            .collect();
        self.clamp_selection();
        Ok(())
    }

    pub fn refresh_player_state(&mut self) {
        self.playback = self.player.query_state();
        self.last_status_poll = Instant::now();
    }

    /// Player status line + rows
    pub fn refresh(&mut self) -> Result<()> {
        self.refresh_player_state();
        self.reload_rows()
    }

    /// Take the search field as the list filter.
    /// The selection goes back to the top only when the filter changed.
    pub fn apply_search(&mut self) -> Result<()> {
        let query = self.search_query.trim();
        let filter = if query.is_empty() {
            None
        } else {
            Some(query.to_string())
        };
        if filter != self.active_filter {
            self.active_filter = filter;
            self.selected = 0;
        }
        self.reload_rows()
    }

    pub fn clamp_selection(&mut self) {
        if self.rows.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.rows.len() {
            self.selected = self.rows.len() - 1;
        }
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.rows.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.rows.len().saturating_sub(1);
    }

    pub fn show_toast(&mut self, message: &str) {
        let now = Instant::now();
        let deadline = now + Duration::from_millis(2000); // 2s display time

        if let Some(ref mut current) = self.toast {
            // Keep start_time so a rapid update doesn't replay the entrance
            current.message = message.to_string();
            current.deadline = deadline;
        } else {
            self.toast = Some(Toast {
                message: message.to_string(),
                start_time: now,
                deadline,
            });
        }
    }

    /// Idle housekeeping between key presses
    pub fn on_tick(&mut self) {
        if let Some(ref toast) = self.toast {
            if Instant::now() > toast.deadline {
                self.toast = None;
            }
        }

        if let Some(interval) = self.status_poll {
            if self.last_status_poll.elapsed() >= interval {
                self.refresh_player_state();
            }
        }
    }
}
