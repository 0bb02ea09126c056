use std::time::Duration;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};

use crate::app::App;
use crate::controller::{GenerationState, format_interval};
use crate::pipeline::GenerationOutcome;

/// Right-hand panel: generation state, settings summary and the last result.
pub struct StatusPanel<'a> {
    app: &'a App,
}

impl<'a> StatusPanel<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }
}

impl Widget for StatusPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let controller = &self.app.controller;
        let settings = controller.settings();

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" PolliPaper ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .border_style(Style::default().fg(Color::DarkGray));

        let label = Style::default().fg(Color::DarkGray);
        let value = Style::default().fg(Color::White);
        let field = |name: &'static str, text: String, style: Style| {
            Line::from(vec![
                Span::styled(format!("{name:<12}"), label),
                Span::styled(text, style),
            ])
        };

        let state = match controller.state() {
            GenerationState::Idle => field("State", "Idle".into(), Style::default().fg(Color::Green)),
            GenerationState::Generating { started } => field(
                "State",
                format!("Generating... {}s", started.elapsed().as_secs()),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        };

        let interval = format_interval(Duration::from_secs(settings.auto_change_interval));
        let auto = if controller.auto_change_active() {
            field("Auto-change", format!("on, every {interval}"), Style::default().fg(Color::Green))
        } else {
            field("Auto-change", format!("off ({interval})"), value)
        };

        let key_note = if !controller.is_authenticated() {
            " (no API key)"
        } else {
            ""
        };

        let mut lines = vec![
            state,
            auto,
            field("Mode", settings.mode.label().into(), value),
            field("Resolution", settings.resolution.to_string(), value),
            field("Model", format!("{}{key_note}", settings.model), value),
            field(
                "Enhance",
                if settings.enhance_prompts { "on" } else { "off" }.into(),
                value,
            ),
        ];
        if !settings.custom_prompt.is_empty() {
            lines.push(field("Custom", settings.custom_prompt.clone(), value));
        }

        lines.push(Line::from(""));
        if let Some(report) = controller.last_report() {
            lines.push(field("Last prompt", report.prompt.clone(), value));
            match &report.outcome {
                GenerationOutcome::Success {
                    saved_path, seed, ..
                } => {
                    lines.push(field(
                        "Saved",
                        saved_path.display().to_string(),
                        Style::default().fg(Color::Green),
                    ));
                    lines.push(field("Seed", seed.to_string(), value));
                }
                GenerationOutcome::Failure(failure) => {
                    lines.push(field(
                        "Failed",
                        failure.to_string(),
                        Style::default().fg(Color::Red),
                    ));
                }
            }
        } else {
            lines.push(Line::from(Span::styled(
                "Nothing generated yet. Press Space to generate.",
                label,
            )));
        }

        let highlighted = self.app.highlighted_mode();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            highlighted.label(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(highlighted.description(), value)));

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
