use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};

/// Everything a key can trigger while the bookmark list is in charge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    CaptureBookmark,
    TogglePause,
    PlaySelected,
    /// Reserved, does nothing yet
    ToggleViewMode,
    FocusSearch,
    PreviousBookmark,
    NextBookmark,
    SeekRelative(i32),
    FocusList,
    EditSelected,
    DeleteSelected,
    Reload,
    ExportCue,
    SelectUp,
    SelectDown,
    SelectFirst,
    SelectLast,
}

pub const SHORT_SEEK_SECS: i32 = 30;
pub const LONG_SEEK_SECS: i32 = 120;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    // Global
    pub quit: String,
    pub capture: String,
    pub play_pause: String,
    pub play_selected: String,
    pub view_mode: String,
    pub search: String,
    pub reload: String,
    pub export: String,

    // Bookmark jumps
    pub prev_bookmark: String,
    pub next_bookmark: String,

    // Seek
    pub rewind_short: String,
    pub rewind_short_alt: String,
    pub skip_short: String,
    pub skip_short_alt: String,
    pub rewind_long: String,
    pub skip_long: String,

    // List
    pub focus_list: String,
    pub focus_list_alt: String,
    pub edit: String,
    pub delete: String,
    pub nav_up: String,
    pub nav_up_alt: String,
    pub nav_down: String,
    pub nav_down_alt: String,
    pub nav_first: String,
    pub nav_last: String,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            quit: "q".to_string(),
            capture: "b".to_string(),
            play_pause: "Space".to_string(),
            play_selected: "Enter".to_string(),
            view_mode: "m".to_string(),
            search: "s".to_string(),
            reload: "r".to_string(),
            export: "x".to_string(),

            prev_bookmark: "p".to_string(),
            next_bookmark: "n".to_string(),

            rewind_short: ",".to_string(),
            rewind_short_alt: "Left".to_string(),
            skip_short: ".".to_string(),
            skip_short_alt: "Right".to_string(),
            rewind_long: "<".to_string(),
            skip_long: ">".to_string(),

            focus_list: "Tab".to_string(),
            focus_list_alt: "F8".to_string(),
            edit: "e".to_string(),
            delete: "d".to_string(),
            nav_up: "k".to_string(),
            nav_up_alt: "Up".to_string(),
            nav_down: "j".to_string(),
            nav_down_alt: "Down".to_string(),
            nav_first: "Home".to_string(),
            nav_last: "End".to_string(),
        }
    }
}

impl KeyConfig {
    /// The global key table, in lookup order
    pub fn bindings(&self) -> Vec<(&str, Command)> {
        vec![
            (self.quit.as_str(), Command::Quit),
            (self.capture.as_str(), Command::CaptureBookmark),
            (self.play_pause.as_str(), Command::TogglePause),
            (self.play_selected.as_str(), Command::PlaySelected),
            (self.view_mode.as_str(), Command::ToggleViewMode),
            (self.search.as_str(), Command::FocusSearch),
            (self.prev_bookmark.as_str(), Command::PreviousBookmark),
            (self.next_bookmark.as_str(), Command::NextBookmark),
            (self.rewind_short.as_str(), Command::SeekRelative(-SHORT_SEEK_SECS)),
            (self.rewind_short_alt.as_str(), Command::SeekRelative(-SHORT_SEEK_SECS)),
            (self.skip_short.as_str(), Command::SeekRelative(SHORT_SEEK_SECS)),
            (self.skip_short_alt.as_str(), Command::SeekRelative(SHORT_SEEK_SECS)),
            (self.rewind_long.as_str(), Command::SeekRelative(-LONG_SEEK_SECS)),
            (self.skip_long.as_str(), Command::SeekRelative(LONG_SEEK_SECS)),
            (self.focus_list.as_str(), Command::FocusList),
            (self.focus_list_alt.as_str(), Command::FocusList),
            (self.edit.as_str(), Command::EditSelected),
            (self.delete.as_str(), Command::DeleteSelected),
            (self.reload.as_str(), Command::Reload),
            (self.export.as_str(), Command::ExportCue),
            (self.nav_up.as_str(), Command::SelectUp),
            (self.nav_up_alt.as_str(), Command::SelectUp),
            (self.nav_down.as_str(), Command::SelectDown),
            (self.nav_down_alt.as_str(), Command::SelectDown),
            (self.nav_first.as_str(), Command::SelectFirst),
            (self.nav_last.as_str(), Command::SelectLast),
        ]
    }

    pub fn resolve(&self, event: KeyEvent) -> Option<Command> {
        self.bindings()
            .into_iter()
            .find(|(key, _)| self.matches(event, key))
            .map(|(_, cmd)| cmd)
    }

    /// Keys bound to more than one command. The table is only unambiguous
    /// when this is empty.
    pub fn conflicts(&self) -> Vec<(String, Command, Command)> {
        let table = self.bindings();
        let mut found = Vec::new();
        for (i, (key, first)) in table.iter().enumerate() {
            for (other, second) in table.iter().skip(i + 1) {
                if key == other && first != second {
                    found.push((key.to_string(), *first, *second));
                }
            }
        }
        found
    }

    pub fn matches(&self, event: KeyEvent, key_str: &str) -> bool {
        // Ctrl/Alt chords never trigger plain bindings
        if event
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return false;
        }
        match key_str {
            "Space" => event.code == KeyCode::Char(' '),
            "Enter" => event.code == KeyCode::Enter,
            "Backspace" => event.code == KeyCode::Backspace,
            "Esc" => event.code == KeyCode::Esc,
            "Tab" => event.code == KeyCode::Tab,
            "BackTab" => event.code == KeyCode::BackTab,
            "Up" => event.code == KeyCode::Up,
            "Down" => event.code == KeyCode::Down,
            "Left" => event.code == KeyCode::Left,
            "Right" => event.code == KeyCode::Right,
            "Home" => event.code == KeyCode::Home,
            "End" => event.code == KeyCode::End,
            s if s.len() > 1 && s.starts_with('F') => s[1..]
                .parse::<u8>()
                .map(|n| event.code == KeyCode::F(n))
                .unwrap_or(false),
            s if s.chars().count() == 1 => {
                if let Some(ch) = s.chars().next() {
                    // Check for shift modifier if char is uppercase
                    if ch.is_uppercase() {
                        event.code == KeyCode::Char(ch)
                            || (event.code == KeyCode::Char(ch.to_ascii_lowercase())
                                && event.modifiers.contains(KeyModifiers::SHIFT))
                    } else {
                        event.code == KeyCode::Char(ch)
                    }
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    // Helper for UI display
    pub fn display(&self, key_str: &str) -> String {
        match key_str {
            "Space" => "Space".to_string(),
            "Up" => "↑".to_string(),
            "Down" => "↓".to_string(),
            "Left" => "←".to_string(),
            "Right" => "→".to_string(),
            "BackTab" => "S-Tab".to_string(), // Shift+Tab
            "Backspace" => "Bksp".to_string(),
            _ => key_str.to_string(),
        }
    }
}
