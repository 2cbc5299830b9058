use crate::app::dialog::DialogView;
use crate::app::App;
use ratatui::Frame;

pub mod bookmark_form;
pub mod confirm;
pub mod toast;

pub fn render(f: &mut Frame, app: &App, dialog: Option<DialogView<'_>>) {
    // MODAL DIALOG
    match dialog {
        Some(DialogView::Bookmark(form)) => bookmark_form::render(f, &app.theme, form),
        Some(DialogView::Confirm(prompt)) => confirm::render(f, &app.theme, prompt),
        None => {}
    }

    // TOAST NOTIFICATION (above dialogs)
    if app.toast.is_some() {
        toast::render(f, app);
    }
}
