pub mod layout;
pub mod terminal;
pub mod theme;
pub mod utils;
pub mod widgets;

pub use terminal::TerminalScreen;
pub use theme::Theme;

use crate::app::dialog::DialogView;
use crate::app::App;
use ratatui::Frame;

pub fn render(f: &mut Frame, app: &App, dialog: Option<DialogView<'_>>) {
    let layout = layout::get_main_layout(f.area());

    widgets::header::render(f, layout.header_area, app);
    widgets::header::render_search(f, layout.search_area, app);
    widgets::bookmarks::render(f, layout.body_area, app);
    widgets::footer::render(f, layout.footer_area, app);

    // Overlays last
    widgets::popups::render(f, app, dialog);
}
