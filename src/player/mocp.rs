use super::runner::{CommandOutput, CommandRunner, SystemRunner};
use super::traits::{PlaybackState, PlaybackStatus, PlayerBridge, SeekOutcome, SeekPolicy};
use crate::error::{AppError, Result};
use std::io;
use std::time::Duration;

/// Default settle delay after state-changing commands
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(150);

/// Bridge to the MOC console player, one `mocp` invocation per request
pub struct MocpPlayer<R: CommandRunner = SystemRunner> {
    binary: String,
    runner: R,
    settle_delay: Duration,
}

impl MocpPlayer<SystemRunner> {
    pub fn new(binary: impl Into<String>, settle_delay: Duration) -> Self {
        Self::with_runner(binary, SystemRunner, settle_delay)
    }
}

impl<R: CommandRunner> MocpPlayer<R> {
    pub fn with_runner(binary: impl Into<String>, runner: R, settle_delay: Duration) -> Self {
        Self {
            binary: binary.into(),
            runner,
            settle_delay,
        }
    }

    fn invoke(&self, args: &[&str]) -> io::Result<CommandOutput> {
        tracing::debug!("{} {}", self.binary, args.join(" "));
        let result = self.runner.run(&self.binary, args);
        match &result {
            Ok(out) if out.is_error() => {
                tracing::debug!("{} {:?} -> stderr: {}", self.binary, args, out.stderr)
            }
            Err(e) => tracing::warn!("Failed to run {}: {}", self.binary, e),
            _ => {}
        }
        result
    }

    /// Run a state-changing command, mapping every failure to `PlayerUnavailable`.
    fn command(&self, args: &[&str]) -> Result<()> {
        let out = self
            .invoke(args)
            .map_err(|e| AppError::PlayerUnavailable(format!("{}: {}", self.binary, e)))?;
        if out.is_error() {
            if is_not_running(&out) {
                return Err(AppError::PlayerUnavailable("server is not running".into()));
            }
            return Err(AppError::PlayerUnavailable(error_line(&out)));
        }
        Ok(())
    }

    fn probe_status(&self) -> PlaybackStatus {
        match self.invoke(&["-Q", "%state"]) {
            Ok(out) => parse_status(&out),
            Err(_) => PlaybackStatus::Unknown,
        }
    }
}

impl<R: CommandRunner> PlayerBridge for MocpPlayer<R> {
    fn query_state(&self) -> PlaybackState {
        let status = self.probe_status();
        if !status.has_track() {
            return PlaybackState {
                status,
                ..PlaybackState::default()
            };
        }

        let position = self.current_position_seconds();
        PlaybackState {
            status,
            current_file: self.current_file(),
            position_seconds: u32::try_from(position).ok(),
        }
    }

    fn ensure_started(&self) -> Result<()> {
        if self.probe_status() != PlaybackStatus::NotRunning {
            return Ok(());
        }

        tracing::info!("Starting {} server", self.binary);
        let clean = self
            .runner
            .launch(&self.binary, &["--server"])
            .map_err(|e| AppError::PlayerUnavailable(format!("{}: {}", self.binary, e)))?;
        if !clean {
            tracing::warn!("{} --server exited with an error", self.binary);
        }
        self.settle();
        Ok(())
    }

    fn load_and_play(&self, file_path: &str) -> Result<()> {
        self.ensure_started()?;
        self.command(&["--playit", file_path])
    }

    fn seek_to(&self, offset_secs: u32, policy: SeekPolicy) -> SeekOutcome {
        let target = format!("{}s", offset_secs);
        let max_attempts = policy.max_retries + 1;

        for attempt in 1..=max_attempts {
            // The player rejects jumps while it is still opening the file
            match self.invoke(&["--jump", &target]) {
                Ok(out) if !out.is_error() => {
                    return SeekOutcome::Landed { attempts: attempt };
                }
                _ => {}
            }
            if attempt < max_attempts && !policy.retry_delay.is_zero() {
                std::thread::sleep(policy.retry_delay);
            }
        }

        tracing::warn!(
            "Giving up seek to {}s after {} attempts",
            offset_secs,
            max_attempts
        );
        SeekOutcome::GaveUp {
            attempts: max_attempts,
        }
    }

    fn seek_relative(&self, delta_secs: i32) -> Result<()> {
        self.command(&["--seek", &delta_secs.to_string()])
    }

    fn toggle_pause(&self) -> Result<()> {
        self.command(&["--toggle-pause"])
    }

    fn current_file(&self) -> Option<String> {
        let out = self.invoke(&["-Q", "%file"]).ok()?;
        if out.is_error() {
            return None;
        }
        out.first_line().map(str::to_string)
    }

    fn current_position_seconds(&self) -> i64 {
        match self.invoke(&["-Q", "%cs"]) {
            Ok(out) if !out.is_error() => out
                .first_line()
                .and_then(|l| l.parse::<i64>().ok())
                .unwrap_or(-1),
            _ => -1,
        }
    }

    fn settle(&self) {
        if !self.settle_delay.is_zero() {
            std::thread::sleep(self.settle_delay);
        }
    }
}

fn is_not_running(out: &CommandOutput) -> bool {
    out.stderr
        .to_ascii_lowercase()
        .contains("server is not running")
}

fn error_line(out: &CommandOutput) -> String {
    out.stderr
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("player command failed")
        .to_string()
}

fn parse_status(out: &CommandOutput) -> PlaybackStatus {
    if is_not_running(out) {
        return PlaybackStatus::NotRunning;
    }
    match out.first_line() {
        Some("PLAY") => PlaybackStatus::Playing,
        Some("PAUSE") => PlaybackStatus::Paused,
        Some("STOP") => PlaybackStatus::Stopped,
        _ => PlaybackStatus::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Replays canned outputs and records every argv it saw
    #[derive(Default)]
    struct ScriptedRunner {
        replies: RefCell<VecDeque<io::Result<CommandOutput>>>,
        calls: RefCell<Vec<String>>,
        launches: RefCell<Vec<String>>,
    }

    impl ScriptedRunner {
        fn reply(self, out: CommandOutput) -> Self {
            self.replies.borrow_mut().push_back(Ok(out));
            self
        }

        fn reply_err(self) -> Self {
            self.replies
                .borrow_mut()
                .push_back(Err(io::Error::new(io::ErrorKind::NotFound, "no mocp")));
            self
        }
    }

    impl CommandRunner for ScriptedRunner {
        fn run(&self, _program: &str, args: &[&str]) -> io::Result<CommandOutput> {
            self.calls.borrow_mut().push(args.join(" "));
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(CommandOutput::ok("")))
        }

        fn launch(&self, _program: &str, args: &[&str]) -> io::Result<bool> {
            self.launches.borrow_mut().push(args.join(" "));
            Ok(true)
        }
    }

    fn player(runner: ScriptedRunner) -> MocpPlayer<ScriptedRunner> {
        MocpPlayer::with_runner("mocp", runner, Duration::ZERO)
    }

    fn not_running() -> CommandOutput {
        CommandOutput::failed("Running the server...\nFATAL_ERROR: The server is not running!")
    }

    fn fast_policy(max_retries: u32) -> SeekPolicy {
        SeekPolicy {
            max_retries,
            retry_delay: Duration::ZERO,
        }
    }

    #[test]
    fn query_state_reads_file_and_position_while_playing() {
        let p = player(
            ScriptedRunner::default()
                .reply(CommandOutput::ok("PLAY"))
                .reply(CommandOutput::ok("150"))
                .reply(CommandOutput::ok("/music/a.mp3")),
        );
        let state = p.query_state();
        assert_eq!(state.status, PlaybackStatus::Playing);
        assert_eq!(state.current_file.as_deref(), Some("/music/a.mp3"));
        assert_eq!(state.position_seconds, Some(150));
        assert_eq!(
            *p.runner.calls.borrow(),
            vec!["-Q %state", "-Q %cs", "-Q %file"]
        );
    }

    #[test]
    fn query_state_not_running_is_not_an_error() {
        let p = player(ScriptedRunner::default().reply(not_running()));
        assert_eq!(p.query_state(), PlaybackState::not_running());
        assert_eq!(p.runner.calls.borrow().len(), 1);
    }

    #[test]
    fn query_state_normalizes_failures() {
        let p = player(ScriptedRunner::default().reply_err());
        assert_eq!(p.query_state().status, PlaybackStatus::Unknown);

        let p = player(ScriptedRunner::default().reply(CommandOutput::ok("garbage")));
        assert_eq!(p.query_state().status, PlaybackStatus::Unknown);

        let p = player(ScriptedRunner::default().reply(CommandOutput::ok("STOP")));
        let state = p.query_state();
        assert_eq!(state.status, PlaybackStatus::Stopped);
        assert_eq!(state.current_file, None);
    }

    #[test]
    fn malformed_position_reads_as_sentinel() {
        let p = player(
            ScriptedRunner::default()
                .reply(CommandOutput::ok("PAUSE"))
                .reply(CommandOutput::ok("n/a"))
                .reply(CommandOutput::ok("/m/a.mp3")),
        );
        let state = p.query_state();
        assert_eq!(state.status, PlaybackStatus::Paused);
        assert_eq!(state.position_seconds, None);
        assert!(state.cursor().is_none());

        let p = player(ScriptedRunner::default().reply_err());
        assert_eq!(p.current_position_seconds(), -1);
    }

    #[test]
    fn ensure_started_launches_only_when_down() {
        let p = player(ScriptedRunner::default().reply(not_running()));
        p.ensure_started().unwrap();
        assert_eq!(*p.runner.launches.borrow(), vec!["--server"]);

        let p = player(ScriptedRunner::default().reply(CommandOutput::ok("STOP")));
        p.ensure_started().unwrap();
        assert!(p.runner.launches.borrow().is_empty());
    }

    #[test]
    fn load_and_play_starts_server_first() {
        let p = player(ScriptedRunner::default().reply(not_running()));
        p.load_and_play("/music/it's here.mp3").unwrap();
        assert_eq!(*p.runner.launches.borrow(), vec!["--server"]);
        assert_eq!(
            *p.runner.calls.borrow(),
            vec!["-Q %state", "--playit /music/it's here.mp3"]
        );
    }

    #[test]
    fn seek_to_retries_until_it_lands() {
        let p = player(
            ScriptedRunner::default()
                .reply(CommandOutput::failed("FATAL_ERROR: busy"))
                .reply(CommandOutput::failed("FATAL_ERROR: busy"))
                .reply(CommandOutput::ok("")),
        );
        assert_eq!(
            p.seek_to(90, fast_policy(5)),
            SeekOutcome::Landed { attempts: 3 }
        );
        assert!(p.runner.calls.borrow().iter().all(|c| c == "--jump 90s"));
    }

    #[test]
    fn seek_to_gives_up_after_budget() {
        let mut runner = ScriptedRunner::default();
        for _ in 0..10 {
            runner = runner.reply(CommandOutput::failed("FATAL_ERROR: busy"));
        }
        let p = player(runner);
        assert_eq!(
            p.seek_to(12, fast_policy(5)),
            SeekOutcome::GaveUp { attempts: 6 }
        );
        assert_eq!(p.runner.calls.borrow().len(), 6);
    }

    #[test]
    fn relative_seek_is_single_shot() {
        let p = player(ScriptedRunner::default().reply(CommandOutput::failed("busy")));
        assert!(matches!(
            p.seek_relative(-30),
            Err(AppError::PlayerUnavailable(_))
        ));
        assert_eq!(*p.runner.calls.borrow(), vec!["--seek -30"]);
    }

    #[test]
    fn toggle_pause_reports_not_running() {
        let p = player(ScriptedRunner::default().reply(not_running()));
        match p.toggle_pause() {
            Err(AppError::PlayerUnavailable(msg)) => assert!(msg.contains("not running")),
            other => panic!("unexpected {:?}", other),
        }
    }
}
