use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Widget};

use crate::prompt::Mode;

/// Selectable list of prompt modes. `●` marks the active one.
pub struct ModeList {
    selected: usize,
    active: Mode,
}

impl ModeList {
    pub fn new(selected: usize, active: Mode) -> Self {
        Self { selected, active }
    }
}

impl Widget for ModeList {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Modes ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(area);
        block.render(area, buf);

        for (i, mode) in Mode::ALL.iter().enumerate() {
            let y = inner.y + i as u16;
            if y >= inner.y + inner.height {
                break;
            }

            let is_selected = i == self.selected;
            let marker = if *mode == self.active { "●" } else { " " };
            let style = if is_selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else if *mode == self.active {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::White)
            };

            if is_selected {
                for x in inner.x..inner.x + inner.width {
                    buf[(x, y)].set_style(style);
                }
            }

            let line = Line::from(vec![
                Span::styled(format!(" {marker} "), style),
                Span::styled(mode.label(), style),
            ]);
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}
