//! Application error types

use thiserror::Error;

/// Every failure the store, the player bridge or a command handler can report.
///
/// None of these end the process: the controller turns them into a toast.
#[derive(Error, Debug)]
pub enum AppError {
    /// Storage unavailable or corrupt
    #[error("Bookmark store error: {0}")]
    Persistence(#[from] rusqlite::Error),

    /// Stale id, usually a row deleted since the last refresh
    #[error("Bookmark #{0} not found")]
    NotFound(i64),

    #[error("Player unavailable: {0}")]
    PlayerUnavailable(String),

    #[error("Seek to {target}s did not land after {attempts} attempts")]
    SeekTransientFailure { target: u32, attempts: u32 },

    /// Rejected before reaching the store
    #[error("Invalid input: {0}")]
    InputValidation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Short message for the toast line
    pub fn user_message(&self) -> String {
        match self {
            AppError::Persistence(_) => "⚠ Bookmark store unavailable".to_string(),
            AppError::NotFound(id) => format!("Bookmark #{} is gone (reload with r)", id),
            AppError::PlayerUnavailable(_) => "⏹ Player not running".to_string(),
            AppError::SeekTransientFailure { target, .. } => {
                format!("⚠ Seek to {} did not land", crate::ui::utils::format_seconds(*target as i64))
            }
            AppError::InputValidation(msg) => msg.clone(),
            AppError::Io(e) => format!("⚠ {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_id() {
        let err = AppError::NotFound(42);
        assert!(err.user_message().contains("#42"));
        assert_eq!(err.to_string(), "Bookmark #42 not found");
    }

    #[test]
    fn seek_failure_message_uses_clock_format() {
        let err = AppError::SeekTransientFailure { target: 3725, attempts: 6 };
        assert!(err.user_message().contains("01:02:05"));
    }
}
