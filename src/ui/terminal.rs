use crate::app::dialog::DialogView;
use crate::app::{App, Screen};
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;

/// Full-screen crossterm terminal. Raw mode and the alternate screen are
/// left again on drop.
pub struct TerminalScreen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalScreen {
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

/// Put the terminal back for a panic report or an error message
pub fn restore() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
}

impl Drop for TerminalScreen {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

impl Screen for TerminalScreen {
    fn draw(&mut self, app: &App, dialog: Option<DialogView<'_>>) -> io::Result<()> {
        self.terminal.draw(|f| super::render(f, app, dialog))?;
        Ok(())
    }

    fn next_key(&mut self, timeout: Duration) -> io::Result<Option<KeyEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            // Release/repeat events would double every key on some terminals
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key)),
            // Resize just needs the redraw the loop does anyway
            _ => Ok(None),
        }
    }
}
