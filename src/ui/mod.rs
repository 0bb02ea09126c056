pub mod command_bar;
pub mod error_popup;
pub mod help;
pub mod modes;
pub mod status_bar;
pub mod status_panel;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::app::{App, InputMode};

use command_bar::CommandBar;
use error_popup::ErrorPopup;
use help::HelpView;
use modes::ModeList;
use status_bar::StatusBar;
use status_panel::StatusPanel;

/// Width of the mode list column.
const MODE_LIST_WIDTH: u16 = 28;

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Layout: main content + status bar + optional command bar
    let bottom_height = if app.input_mode == InputMode::Command { 2 } else { 1 };

    let [main_area, bottom_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(bottom_height)]).areas(area);

    if app.input_mode == InputMode::Command {
        let [status_area, cmd_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(bottom_area);
        frame.render_widget(StatusBar::new(app), status_area);
        frame.render_widget(CommandBar::new(&app.command_input), cmd_area);
    } else {
        frame.render_widget(StatusBar::new(app), bottom_area);
    }

    let [list_area, panel_area] = Layout::horizontal([
        Constraint::Length(MODE_LIST_WIDTH),
        Constraint::Min(1),
    ])
    .areas(main_area);

    frame.render_widget(
        ModeList::new(app.selected, app.controller.settings().mode),
        list_area,
    );
    frame.render_widget(StatusPanel::new(app), panel_area);

    if app.show_help {
        frame.render_widget(HelpView::new(), main_area);
    }

    // Error detail popup overlay (renders on top of everything)
    if let Some(ref detail) = app.error_detail {
        frame.render_widget(ErrorPopup::new(detail), area);
    }
}

/// Cut `text` to at most `width` characters.
pub(crate) fn clip(text: &str, width: usize) -> &str {
    match text.char_indices().nth(width) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::clip;

    #[test]
    fn clip_respects_char_boundaries() {
        assert_eq!(clip("héllo", 2), "hé");
        assert_eq!(clip("short", 10), "short");
        assert_eq!(clip("", 3), "");
    }
}
