pub mod mocp;
pub mod runner;
pub mod traits;

pub use mocp::{MocpPlayer, DEFAULT_SETTLE_DELAY};
pub use runner::{CommandOutput, CommandRunner, SystemRunner};
pub use traits::{PlaybackState, PlaybackStatus, PlayerBridge, SeekOutcome, SeekPolicy};
