//! Render / read key / dispatch loop.
//!
//! Everything runs on one thread. Modal dialogs are a nested run of the same
//! loop (`run_modal`) that blocks until the dialog hands back an outcome.

use super::dialog::{BookmarkForm, ConfirmPrompt, DialogOutcome, DialogView, Modal};
use super::export;
use super::keys::Command;
use super::navigation;
use super::state::{App, Focus};
use crate::error::AppError;
use crate::player::{PlaybackStatus, SeekOutcome};
use crate::store::{Bookmark, BookmarkUpdate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::io;
use std::time::Duration;
use tracing::{info, warn};

/// How long to wait for a key before running idle housekeeping
pub const TICK_RATE: Duration = Duration::from_millis(250);

/// Where frames go and keys come from. The real one owns the terminal.
pub trait Screen {
    fn draw(&mut self, app: &App, dialog: Option<DialogView<'_>>) -> io::Result<()>;

    /// `Ok(None)` when nothing was pressed within `timeout`
    fn next_key(&mut self, timeout: Duration) -> io::Result<Option<KeyEvent>>;
}

/// Handlers fail in two ways: app errors become a toast, terminal errors end the loop.
#[derive(Debug)]
enum HandlerError {
    Terminal(io::Error),
    App(AppError),
}

impl From<io::Error> for HandlerError {
    fn from(e: io::Error) -> Self {
        HandlerError::Terminal(e)
    }
}

impl From<AppError> for HandlerError {
    fn from(e: AppError) -> Self {
        HandlerError::App(e)
    }
}

type HandlerResult = std::result::Result<(), HandlerError>;

pub struct Controller<S: Screen> {
    pub app: App,
    screen: S,
    tick_rate: Duration,
}

impl<S: Screen> Controller<S> {
    pub fn new(app: App, screen: S) -> Self {
        Self {
            app,
            screen,
            tick_rate: TICK_RATE,
        }
    }

    pub fn screen(&self) -> &S {
        &self.screen
    }

    /// Main loop. Returns when the user quits or the terminal fails.
    pub fn run(&mut self) -> io::Result<()> {
        info!("Entering main loop");
        if let Err(e) = self.app.refresh() {
            self.report(e);
        }

        while self.app.is_running {
            self.app.on_tick();
            self.screen.draw(&self.app, None)?;

            let Some(key) = self.screen.next_key(self.tick_rate)? else {
                continue;
            };
            match self.handle_key(key) {
                Ok(()) => {}
                Err(HandlerError::App(e)) => self.report(e),
                Err(HandlerError::Terminal(e)) => return Err(e),
            }
        }

        info!("Leaving main loop");
        Ok(())
    }

    /// Nested loop for one dialog; only the dialog's own keys are live.
    pub fn run_modal<M: Modal>(&mut self, dialog: &mut M) -> io::Result<DialogOutcome<M::Output>> {
        loop {
            self.app.on_tick();
            self.screen.draw(&self.app, Some(dialog.view()))?;

            if let Some(key) = self.screen.next_key(self.tick_rate)? {
                if let Some(outcome) = dialog.handle_key(key) {
                    return Ok(outcome);
                }
            }
        }
    }

    fn report(&mut self, error: AppError) {
        warn!("{}", error);
        self.app.show_toast(&error.user_message());
    }

    fn handle_key(&mut self, key: KeyEvent) -> HandlerResult {
        // Ctrl+C always leaves, whatever has focus
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.app.is_running = false;
            return Ok(());
        }

        if self.app.focus == Focus::Search && self.handle_search_key(key)? {
            return Ok(());
        }

        match self.app.keys.resolve(key) {
            Some(command) => self.dispatch(command),
            None => Ok(()),
        }
    }

    /// Search field bindings. Returns false for keys it leaves to the global table.
    fn handle_search_key(&mut self, key: KeyEvent) -> std::result::Result<bool, HandlerError> {
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return Ok(false);
        }
        match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Tab | KeyCode::F(8) => {
                self.app.focus = Focus::List;
                self.app.apply_search()?;
            }
            KeyCode::Backspace => {
                self.app.search_query.pop();
            }
            KeyCode::Char(c) => self.app.search_query.push(c),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn dispatch(&mut self, command: Command) -> HandlerResult {
        match command {
            Command::Quit => self.app.is_running = false,
            Command::CaptureBookmark => self.capture_bookmark()?,
            Command::TogglePause => {
                self.app.player.toggle_pause()?;
                self.after_player_command()?;
            }
            Command::PlaySelected => {
                if let Some(bookmark) = self.app.selected_bookmark().cloned() {
                    self.play_bookmark(&bookmark)?;
                }
            }
            // Reserved
            Command::ToggleViewMode => {}
            Command::FocusSearch => self.app.focus = Focus::Search,
            Command::FocusList => {
                self.app.focus = Focus::List;
                self.app.apply_search()?;
            }
            Command::PreviousBookmark => self.jump(false)?,
            Command::NextBookmark => self.jump(true)?,
            Command::SeekRelative(delta) => {
                self.app.player.seek_relative(delta)?;
                self.after_player_command()?;
            }
            Command::EditSelected => self.edit_selected()?,
            Command::DeleteSelected => self.delete_selected()?,
            Command::Reload => {
                self.app.refresh()?;
                self.app.show_toast("🔄 Reloaded");
            }
            Command::ExportCue => self.export_cue()?,
            Command::SelectUp => self.app.select_prev(),
            Command::SelectDown => self.app.select_next(),
            Command::SelectFirst => self.app.select_first(),
            Command::SelectLast => self.app.select_last(),
        }
        Ok(())
    }

    fn after_player_command(&mut self) -> HandlerResult {
        self.app.player.settle();
        self.app.refresh()?;
        Ok(())
    }

    fn capture_bookmark(&mut self) -> HandlerResult {
        let state = self.app.player.query_state();
        self.app.playback = state.clone();

        if state.status == PlaybackStatus::NotRunning {
            self.app.show_toast("⏹ Player not running, nothing to bookmark");
            return Ok(());
        }
        let Some((file, position)) = state.cursor() else {
            self.app.show_toast("⏹ Nothing is playing");
            return Ok(());
        };

        let mut form = BookmarkForm::for_capture(file, position);
        let DialogOutcome::Accepted(input) = self.run_modal(&mut form)? else {
            return Ok(());
        };

        let id = self
            .app
            .store
            .create(file, position, input.rating, Some(&input.comment))?;
        self.app.refresh()?;
        self.select_id(id);
        self.app.show_toast(&format!("🔖 Saved bookmark #{}", id));
        Ok(())
    }

    /// Load the file unless it is already current, then seek to the bookmark.
    fn play_bookmark(&mut self, bookmark: &Bookmark) -> HandlerResult {
        let player = &self.app.player;
        if player.current_file().as_deref() != Some(bookmark.file_path.as_str()) {
            // The server may already be up even when loading failed
            if let Err(e) = player.load_and_play(&bookmark.file_path) {
                self.app.refresh_player_state();
                return Err(e.into());
            }
            player.settle();
        }

        let target = u32::try_from(bookmark.position).unwrap_or(0);
        let outcome = player.seek_to(target, self.app.seek_policy);
        self.after_player_command()?;

        match outcome {
            SeekOutcome::Landed { .. } => Ok(()),
            SeekOutcome::GaveUp { attempts } => {
                Err(AppError::SeekTransientFailure { target, attempts }.into())
            }
        }
    }

    fn jump(&mut self, forward: bool) -> HandlerResult {
        let state = self.app.player.query_state();
        self.app.playback = state.clone();

        if state.status == PlaybackStatus::NotRunning {
            return Err(AppError::PlayerUnavailable("server is not running".into()).into());
        }

        let found = if forward {
            navigation::find_next(&self.app.store, &state)?
        } else {
            navigation::find_previous(&self.app.store, &state)?
        };

        match found {
            Some(bookmark) => {
                self.play_bookmark(&bookmark)?;
                self.select_id(bookmark.id);
                self.app.show_toast(&format!(
                    "{} {}",
                    if forward { "⏭" } else { "⏮" },
                    crate::ui::utils::format_seconds(bookmark.position)
                ));
            }
            None => self.app.show_toast(if forward {
                "No later bookmark in this file"
            } else {
                "No earlier bookmark in this file"
            }),
        }
        Ok(())
    }

    fn edit_selected(&mut self) -> HandlerResult {
        let Some(bookmark) = self.app.selected_bookmark().cloned() else {
            return Ok(());
        };

        let mut form = BookmarkForm::for_edit(&bookmark);
        let DialogOutcome::Accepted(input) = self.run_modal(&mut form)? else {
            return Ok(());
        };

        let update = BookmarkUpdate::default()
            .rating(input.rating)
            .comment(input.comment);
        let result = self.app.store.update(bookmark.id, &update);
        self.app.reload_rows()?;
        result?;
        self.app.show_toast(&format!("✏️ Updated bookmark #{}", bookmark.id));
        Ok(())
    }

    fn delete_selected(&mut self) -> HandlerResult {
        let Some(id) = self.app.selected_bookmark().map(|b| b.id) else {
            return Ok(());
        };
        let index = self.app.selected;
        let was_last = index + 1 == self.app.rows.len();

        let result = self.app.store.delete(id);
        self.app.reload_rows()?;
        self.app.selected = if was_last {
            self.app.rows.len().saturating_sub(1)
        } else {
            index
        };
        self.app.clamp_selection();

        result?;
        self.app.show_toast(&format!("🗑 Deleted bookmark #{}", id));
        Ok(())
    }

    fn export_cue(&mut self) -> HandlerResult {
        let mut prompt = ConfirmPrompt::new(
            "Export bookmarks to CUE sheets?",
            &[
                "A cue sheet will be written next to every file with bookmarks.",
                "",
                "Enter: export    Esc: cancel",
            ],
        );
        if self.run_modal(&mut prompt)? == DialogOutcome::Cancelled {
            return Ok(());
        }

        let written = export::export_cue_sheets(&self.app.store)?;
        self.app.show_toast(&format!("💾 Wrote {} cue sheet(s)", written));
        Ok(())
    }

    fn select_id(&mut self, id: i64) {
        if let Some(index) = self.app.rows.iter().position(|r| r.bookmark.id == id) {
            self.app.selected = index;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::UserConfig;
    use crate::player::{PlaybackState, PlayerBridge, SeekPolicy};
    use crate::store::BookmarkStore;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    #[derive(Default)]
    struct NullPlayer;

    impl PlayerBridge for NullPlayer {
        fn query_state(&self) -> PlaybackState {
            PlaybackState::not_running()
        }
        fn ensure_started(&self) -> crate::error::Result<()> {
            Ok(())
        }
        fn load_and_play(&self, _: &str) -> crate::error::Result<()> {
            Ok(())
        }
        fn seek_to(&self, _: u32, _: SeekPolicy) -> SeekOutcome {
            SeekOutcome::Landed { attempts: 1 }
        }
        fn seek_relative(&self, _: i32) -> crate::error::Result<()> {
            Err(AppError::PlayerUnavailable("server is not running".into()))
        }
        fn toggle_pause(&self) -> crate::error::Result<()> {
            Ok(())
        }
        fn current_file(&self) -> Option<String> {
            None
        }
        fn current_position_seconds(&self) -> i64 {
            -1
        }
    }

    /// Keys from a script; errors out once the script is exhausted.
    struct ScriptScreen {
        keys: VecDeque<KeyEvent>,
        frames: Rc<RefCell<Vec<bool>>>,
    }

    impl Screen for ScriptScreen {
        fn draw(&mut self, _app: &App, dialog: Option<DialogView<'_>>) -> io::Result<()> {
            self.frames.borrow_mut().push(dialog.is_some());
            Ok(())
        }

        fn next_key(&mut self, _timeout: Duration) -> io::Result<Option<KeyEvent>> {
            self.keys
                .pop_front()
                .map(Some)
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
        }
    }

    fn controller(keys: &[KeyCode]) -> (Controller<ScriptScreen>, Rc<RefCell<Vec<bool>>>) {
        let store = BookmarkStore::open_in_memory().unwrap();
        let app = App::new(store, Box::new(NullPlayer), &UserConfig::default());
        let frames = Rc::new(RefCell::new(Vec::new()));
        let screen = ScriptScreen {
            keys: keys
                .iter()
                .map(|c| KeyEvent::new(*c, KeyModifiers::NONE))
                .collect(),
            frames: frames.clone(),
        };
        (Controller::new(app, screen), frames)
    }

    #[test]
    fn quit_ends_the_loop() {
        let (mut c, _) = controller(&[KeyCode::Char('q')]);
        assert!(c.run().is_ok());
        assert!(!c.app.is_running);
    }

    #[test]
    fn player_errors_become_toasts() {
        let (mut c, _) = controller(&[KeyCode::Right, KeyCode::Char('q')]);
        c.run().unwrap();
        let toast = c.app.toast.as_ref().unwrap();
        assert!(toast.message.contains("not running"));
    }

    #[test]
    fn search_field_swallows_command_keys() {
        let (mut c, _) = controller(&[
            KeyCode::Char('s'),
            KeyCode::Char('q'),
            KeyCode::Char('x'),
            KeyCode::Enter,
            KeyCode::Char('q'),
        ]);
        c.run().unwrap();
        assert_eq!(c.app.search_query, "qx");
        assert_eq!(c.app.active_filter.as_deref(), Some("qx"));
        assert_eq!(c.app.focus, Focus::List);
    }

    #[test]
    fn cancelled_export_draws_dialog_and_writes_nothing() {
        let (mut c, frames) = controller(&[KeyCode::Char('x'), KeyCode::Esc, KeyCode::Char('q')]);
        c.run().unwrap();
        assert!(frames.borrow().iter().any(|with_dialog| *with_dialog));
        assert!(c.app.toast.is_none());
    }

    #[test]
    fn terminal_failure_ends_run_with_error() {
        let (mut c, _) = controller(&[KeyCode::Char('j')]);
        assert!(c.run().is_err());
    }
}
