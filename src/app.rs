use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::DefaultTerminal;

use crate::command::{self, Command};
use crate::controller::Controller;
use crate::event::{AppEvent, Event, EventHandler};
use crate::prompt::Mode;
use crate::ui;

// ---------------------------------------------------------------------------
// Input mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Command,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Terminal front end over a [`Controller`].
pub struct App {
    pub running: bool,
    pub events: EventHandler,
    pub controller: Controller,

    pub input_mode: InputMode,
    pub command_input: String,
    /// Highlighted row in the mode list.
    pub selected: usize,
    pub show_help: bool,
    /// Full failure text shown in a popup until dismissed.
    pub error_detail: Option<String>,
}

impl App {
    pub fn new(controller: Controller, events: EventHandler) -> Self {
        let current = controller.settings().mode;
        let selected = Mode::ALL.iter().position(|m| *m == current).unwrap_or(0);
        Self {
            running: true,
            events,
            controller,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            selected,
            show_help: false,
            error_detail: None,
        }
    }

    // -- Main event loop ----------------------------------------------------

    pub async fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        while self.running {
            terminal.draw(|frame| ui::draw(frame, &self))?;
            match self.events.next().await? {
                Event::Tick => {}
                Event::Crossterm(event) => {
                    if let crossterm::event::Event::Key(key) = event
                        && key.kind == crossterm::event::KeyEventKind::Press
                    {
                        self.handle_key_event(key);
                    }
                }
                Event::App(app_event) => self.handle_app_event(*app_event),
            }
        }
        self.controller.shutdown().await;
        Ok(())
    }

    pub fn highlighted_mode(&self) -> Mode {
        Mode::ALL[self.selected.min(Mode::ALL.len() - 1)]
    }

    // -- Key event routing --------------------------------------------------

    fn handle_key_event(&mut self, key: KeyEvent) {
        // Ctrl-C always quits.
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c' | 'C'))
        {
            self.events.send(AppEvent::Quit);
            return;
        }

        if self.error_detail.is_some() {
            self.handle_popup_key(key);
            return;
        }
        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?' | 'q')) {
                self.show_help = false;
            }
            return;
        }

        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::Command => self.handle_command_key(key),
        }
    }

    fn handle_popup_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.error_detail = None,
            KeyCode::Char('o') if self.controller.offers_personalization() => {
                self.error_detail = None;
                self.events.send(AppEvent::OpenPersonalization);
            }
            _ => {}
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.events.send(AppEvent::Quit),
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected + 1 < Mode::ALL.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Enter => {
                self.events
                    .send(AppEvent::SelectMode(self.highlighted_mode()));
            }
            KeyCode::Char(' ' | 'g') => self.events.send(AppEvent::Generate),
            KeyCode::Char('a') => self.events.send(AppEvent::ToggleAutoChange),
            KeyCode::Char('+' | '=') => self.controller.adjust_interval_minutes(1),
            KeyCode::Char('-') => self.controller.adjust_interval_minutes(-1),
            KeyCode::Char('s') => self.events.send(AppEvent::SaveSettings),
            KeyCode::Char('o') => self.events.send(AppEvent::OpenPersonalization),
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char(':') => {
                self.input_mode = InputMode::Command;
                self.command_input.clear();
            }
            _ => {}
        }
    }

    fn handle_command_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.command_input.clear();
            }
            KeyCode::Enter => {
                self.execute_command();
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Backspace => {
                self.command_input.pop();
            }
            KeyCode::Char(c) => {
                self.command_input.push(c);
            }
            _ => {}
        }
    }

    // -- Command execution --------------------------------------------------

    fn execute_command(&mut self) {
        let input = std::mem::take(&mut self.command_input);
        let command = match command::parse_command(&input) {
            Ok(command) => command,
            Err(message) => {
                self.controller.set_status(message);
                return;
            }
        };

        match command {
            Command::Prompt(text) => {
                self.controller.set_custom_prompt(&text);
                self.sync_selection();
            }
            Command::Mode(mode) => self.events.send(AppEvent::SelectMode(mode)),
            Command::Interval(minutes) => self.controller.set_interval_secs(minutes.saturating_mul(60)),
            Command::Resolution(res) => self.controller.set_resolution(res),
            Command::Model(model) => self.controller.set_model(&model),
            Command::Key(key) => self.controller.set_api_key(&key),
            Command::Save => self.events.send(AppEvent::SaveSettings),
            Command::Generate => self.events.send(AppEvent::Generate),
            Command::Help => self.show_help = true,
            Command::Quit => self.events.send(AppEvent::Quit),
        }
    }

    fn sync_selection(&mut self) {
        let mode = self.controller.settings().mode;
        if let Some(index) = Mode::ALL.iter().position(|m| *m == mode) {
            self.selected = index;
        }
    }

    // -- App event handling -------------------------------------------------

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Quit => {
                self.running = false;
            }
            AppEvent::GenerationFinished(report) => {
                self.error_detail = report.outcome.failure().map(|f| {
                    let mut detail = format!("{f}\n\nPrompt: {}", report.prompt);
                    if f.offers_personalization() {
                        detail.push_str("\n\nPress o to open personalization settings.");
                    }
                    detail
                });
                self.controller
                    .handle_app_event(AppEvent::GenerationFinished(report));
            }
            AppEvent::SelectMode(mode) => {
                self.controller.handle_app_event(AppEvent::SelectMode(mode));
                self.sync_selection();
            }
            other => self.controller.handle_app_event(other),
        }
    }
}

// ---------------------------------------------------------------------------
// Headless
// ---------------------------------------------------------------------------

/// Run auto-change without a terminal UI until Ctrl-C.
pub async fn run_headless(
    mut controller: Controller,
    mut events: EventHandler,
) -> color_eyre::Result<()> {
    controller.start_auto_change();
    eprintln!(
        "PolliPaper running minimized ({}). Press Ctrl-C to stop.",
        controller.status()
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.next() => match event? {
                Event::App(app_event) => match *app_event {
                    AppEvent::Quit => break,
                    AppEvent::GenerationFinished(report) => {
                        controller.handle_app_event(AppEvent::GenerationFinished(report));
                        eprintln!("{}", controller.status());
                    }
                    other => controller.handle_app_event(other),
                },
                Event::Tick | Event::Crossterm(_) => {}
            },
        }
    }

    controller.shutdown().await;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
