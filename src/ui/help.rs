use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

/// Help overlay showing keybindings and `:` commands.
#[derive(Default)]
pub struct HelpView;

impl HelpView {
    pub fn new() -> Self {
        Self
    }
}

impl Widget for HelpView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = 64u16.min(area.width.saturating_sub(4));
        let height = 30u16.min(area.height.saturating_sub(2));
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        let panel = Rect::new(x, y, width, height);

        Clear.render(panel, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .border_style(Style::default().fg(Color::Cyan));

        let key_style = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let desc_style = Style::default().fg(Color::White);
        let section_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);

        let bindings: Vec<Line<'_>> = vec![
            Line::from(Span::styled("Keys", section_style)),
            binding_line("j/k", "Move through modes", key_style, desc_style),
            binding_line("Enter", "Use highlighted mode", key_style, desc_style),
            binding_line("Space/g", "Generate now", key_style, desc_style),
            binding_line("a", "Toggle auto-change", key_style, desc_style),
            binding_line("+/-", "Interval +/- 1 minute", key_style, desc_style),
            binding_line("s", "Save settings", key_style, desc_style),
            binding_line("o", "Open personalization settings", key_style, desc_style),
            binding_line("?", "Toggle this help", key_style, desc_style),
            binding_line("q/Esc", "Quit (settings are saved)", key_style, desc_style),
            Line::from(""),
            Line::from(Span::styled("Commands", section_style)),
            binding_line(":prompt <text>", "Custom prompt, manual mode", key_style, desc_style),
            binding_line(":mode <name>", "Switch mode, e.g. space", key_style, desc_style),
            binding_line(":interval <m>", "Auto-change interval", key_style, desc_style),
            binding_line(":res <WxH>", "Output resolution", key_style, desc_style),
            binding_line(":model <name>", "Model (needs API key)", key_style, desc_style),
            binding_line(":key [key]", "Set or clear API key", key_style, desc_style),
            binding_line(":save", "Save settings", key_style, desc_style),
            binding_line(":generate", "Generate now", key_style, desc_style),
            binding_line(":quit", "Quit", key_style, desc_style),
        ];

        Paragraph::new(bindings).block(block).render(panel, buf);
    }
}

fn binding_line<'a>(key: &'a str, desc: &'a str, key_style: Style, desc_style: Style) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {key:<18}"), key_style),
        Span::styled(desc, desc_style),
    ])
}
