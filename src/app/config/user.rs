use crate::app::keys::KeyConfig;
use crate::player::SeekPolicy;
use crate::ui::theme::Theme;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// User-editable configuration (read only after load)
/// stored in `config.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    /// Bookmark database; empty means the default data directory
    #[serde(default)]
    pub database_path: String,
    #[serde(default = "default_player_binary")]
    pub player_binary: String,
    /// Sleep after state-changing player commands
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    #[serde(default = "default_seek_retries")]
    pub seek_retries: u32,
    #[serde(default = "default_settle_delay_ms")]
    pub seek_retry_delay_ms: u64,
    /// Refresh the player line while idle; 0 disables
    #[serde(default = "default_status_poll_ms")]
    pub status_poll_ms: u64,
    #[serde(default)]
    pub keys: KeyConfig,
    #[serde(default)]
    pub theme: Theme,
}

fn default_player_binary() -> String {
    "mocp".to_string()
}

fn default_settle_delay_ms() -> u64 {
    150
}

fn default_seek_retries() -> u32 {
    5
}

fn default_status_poll_ms() -> u64 {
    2000
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            database_path: String::new(),
            player_binary: default_player_binary(),
            settle_delay_ms: default_settle_delay_ms(),
            seek_retries: default_seek_retries(),
            seek_retry_delay_ms: default_settle_delay_ms(),
            status_poll_ms: default_status_poll_ms(),
            keys: KeyConfig::default(),
            theme: Theme::default(),
        }
    }
}

impl UserConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn seek_policy(&self) -> SeekPolicy {
        SeekPolicy {
            max_retries: self.seek_retries,
            retry_delay: Duration::from_millis(self.seek_retry_delay_ms),
        }
    }

    pub fn status_poll(&self) -> Option<Duration> {
        (self.status_poll_ms > 0).then(|| Duration::from_millis(self.status_poll_ms))
    }
}
