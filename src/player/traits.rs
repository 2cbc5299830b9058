use crate::error::Result;

/// Player status as last observed. Never owned by us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    Playing,
    Paused,
    Stopped,
    NotRunning,
    #[default]
    Unknown,
}

impl PlaybackStatus {
    pub fn label(self) -> &'static str {
        match self {
            PlaybackStatus::Playing => "PLAY",
            PlaybackStatus::Paused => "PAUSE",
            PlaybackStatus::Stopped => "STOP",
            PlaybackStatus::NotRunning => "not running",
            PlaybackStatus::Unknown => "unknown",
        }
    }

    /// A file is loaded and has a meaningful offset
    pub fn has_track(self) -> bool {
        matches!(self, PlaybackStatus::Playing | PlaybackStatus::Paused)
    }
}

/// Snapshot of the external player. A later command may see a different state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlaybackState {
    pub status: PlaybackStatus,
    pub current_file: Option<String>,
    pub position_seconds: Option<u32>,
}

impl PlaybackState {
    pub fn not_running() -> Self {
        Self {
            status: PlaybackStatus::NotRunning,
            ..Self::default()
        }
    }

    /// File and offset, if both are known
    pub fn cursor(&self) -> Option<(&str, i64)> {
        match (&self.current_file, self.position_seconds) {
            (Some(file), Some(pos)) if !file.is_empty() => Some((file.as_str(), pos as i64)),
            _ => None,
        }
    }
}

/// Result of a retried absolute seek
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekOutcome {
    Landed { attempts: u32 },
    GaveUp { attempts: u32 },
}

/// Retry budget for absolute seeks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeekPolicy {
    pub max_retries: u32,
    pub retry_delay: std::time::Duration,
}

impl Default for SeekPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            retry_delay: std::time::Duration::from_millis(150),
        }
    }
}

/// Everything the app may ask of the external player 🎵
///
/// Queries never fail: trouble is folded into `PlaybackStatus`, `None` or the
/// `-1` sentinel. Commands report `AppError::PlayerUnavailable`.
pub trait PlayerBridge {
    fn query_state(&self) -> PlaybackState;

    /// Start the player server if it is not running, then settle.
    fn ensure_started(&self) -> Result<()>;

    /// Best effort: callers re-query state afterwards.
    fn load_and_play(&self, file_path: &str) -> Result<()>;

    fn seek_to(&self, offset_secs: u32, policy: SeekPolicy) -> SeekOutcome;

    /// Positive seeks forward, negative backward. Single shot.
    fn seek_relative(&self, delta_secs: i32) -> Result<()>;

    fn toggle_pause(&self) -> Result<()>;

    fn current_file(&self) -> Option<String>;

    /// `-1` when unavailable
    fn current_position_seconds(&self) -> i64;

    /// Sleep long enough for the player to act on the last command
    fn settle(&self) {}
}
