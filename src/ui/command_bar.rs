use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;

/// `:` input line with a block cursor.
///
/// When the text is wider than the area the rightmost portion is shown.
pub struct CommandBar<'a> {
    text: &'a str,
    style: Style,
}

impl<'a> CommandBar<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            style: Style::default().fg(Color::White),
        }
    }
}

impl Widget for CommandBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let display = format!(":{}\u{2588}", self.text);
        let max_width = area.width as usize;
        let len = display.chars().count();
        let visible: String = display.chars().skip(len.saturating_sub(max_width)).collect();

        buf.set_string(area.x, area.y, visible, self.style);
    }
}
