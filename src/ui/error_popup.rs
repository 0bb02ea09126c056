use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap};

/// Centered popup with the full text of a failed generation.
pub struct ErrorPopup<'a> {
    text: &'a str,
}

impl<'a> ErrorPopup<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }
}

/// Rows needed for `text` wrapped at `width` columns.
fn wrapped_height(text: &str, width: usize) -> usize {
    text.lines()
        .map(|line| {
            let len = line.chars().count();
            if len == 0 || width == 0 {
                1
            } else {
                len.div_ceil(width)
            }
        })
        .sum()
}

impl Widget for ErrorPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = 70u16.min(area.width.saturating_sub(4));
        let inner_width = width.saturating_sub(2) as usize;

        // Borders plus the hint line and the blank line above it.
        let content_height = wrapped_height(self.text, inner_width) as u16 + 4;
        let max_height = (area.height * 3 / 5).max(8);
        let height = content_height
            .min(max_height)
            .min(area.height.saturating_sub(2));

        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        let panel = Rect::new(x, y, width, height);

        Clear.render(panel, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Generation Failed ")
            .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
            .border_style(Style::default().fg(Color::Red));

        let inner = block.inner(panel);
        block.render(panel, buf);

        if inner.height < 2 {
            return;
        }
        let text_area = Rect::new(inner.x, inner.y, inner.width, inner.height - 1);
        let hint_area = Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1);

        Paragraph::new(self.text)
            .wrap(Wrap { trim: true })
            .render(text_area, buf);

        let hint = Line::from(Span::styled(
            " Esc/Enter to dismiss ",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ));
        Paragraph::new(hint).render(hint_area, buf);
    }
}
