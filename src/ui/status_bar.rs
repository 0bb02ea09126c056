use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use crate::app::{App, InputMode};

/// Bottom status bar showing input mode, key hints and the status message.
pub struct StatusBar<'a> {
    pub app: &'a App,
}

impl<'a> StatusBar<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        // Background
        let bg_style = Style::default().bg(Color::DarkGray).fg(Color::White);
        for x in area.x..area.x + area.width {
            buf[(x, area.y)].set_style(bg_style);
        }

        let mut spans = Vec::new();

        let (mode_str, mode_bg) = match self.app.input_mode {
            InputMode::Normal => (" NORMAL ", Color::Blue),
            InputMode::Command => (" COMMAND ", Color::Magenta),
        };
        spans.push(Span::styled(
            mode_str,
            Style::default()
                .bg(mode_bg)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));

        if self.app.controller.is_generating() {
            spans.push(Span::styled(
                "[generating...] ",
                Style::default().bg(Color::DarkGray).fg(Color::Yellow),
            ));
        }
        if self.app.controller.auto_change_active() {
            spans.push(Span::styled(
                "[auto] ",
                Style::default().bg(Color::DarkGray).fg(Color::Green),
            ));
        }
        spans.push(Span::styled("? help", bg_style));

        // Status message (right-aligned)
        let msg = self.app.controller.status();
        if !msg.is_empty() {
            let left_width: usize = spans.iter().map(|s| s.width()).sum();
            let room = (area.width as usize).saturating_sub(left_width + 1);
            let shown = super::clip(msg, room);
            let padding = (area.width as usize).saturating_sub(left_width + shown.chars().count());
            if padding > 0 {
                spans.push(Span::styled(" ".repeat(padding), bg_style));
            }
            let msg_style = if self.app.controller.last_report().is_some_and(|r| {
                !r.outcome.is_success()
            }) {
                Style::default().bg(Color::DarkGray).fg(Color::Red)
            } else {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            };
            spans.push(Span::styled(shown, msg_style));
        }

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
