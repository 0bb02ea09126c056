use color_eyre::eyre::OptionExt;
use crossterm::event::Event as CrosstermEvent;
use futures::{FutureExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::pipeline::GenerationOutcome;
use crate::prompt::Mode;

/// The frequency at which tick events are emitted.
const TICK_FPS: f64 = 4.0;

/// Representation of all possible events.
#[derive(Clone, Debug)]
pub enum Event {
    /// An event that is emitted on a regular schedule.
    Tick,
    /// Crossterm events from the terminal.
    Crossterm(CrosstermEvent),
    /// Application-level events.
    App(Box<AppEvent>),
}

/// Application events: user intents, timer firings and task results.
#[derive(Clone, Debug)]
pub enum AppEvent {
    Quit,

    // -- Triggers (key handlers, commands) --
    Generate,
    ToggleAutoChange,
    SelectMode(Mode),
    SaveSettings,
    OpenPersonalization,

    // -- Background results (sent from spawned tasks back to the event loop) --
    AutoChangeElapsed,
    GenerationFinished(Box<GenerationReport>),
}

/// What a finished generation task reports back.
#[derive(Clone, Debug)]
pub struct GenerationReport {
    pub mode: Mode,
    /// Prompt before variation.
    pub prompt: String,
    pub outcome: GenerationOutcome,
    pub elapsed: Duration,
}

/// Event channel plus the background task feeding it.
///
/// The terminal flavour forwards crossterm input; the headless flavour only
/// emits ticks, for runs without a UI.
#[derive(Debug)]
pub struct EventHandler {
    /// Event sender channel.
    sender: mpsc::UnboundedSender<Event>,
    /// Event receiver channel.
    receiver: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Constructs a new instance of [`EventHandler`] and spawns the terminal event task.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let actor = EventTask::new(sender.clone());
        tokio::spawn(async { actor.run().await });
        Self { sender, receiver }
    }

    /// Ticks only; no terminal input is read.
    pub fn headless() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let actor = EventTask::new(sender.clone());
        tokio::spawn(async { actor.run_ticks().await });
        Self { sender, receiver }
    }

    /// Receives the next event, blocking until one is available.
    pub async fn next(&mut self) -> color_eyre::Result<Event> {
        self.receiver
            .recv()
            .await
            .ok_or_eyre("Failed to receive event")
    }

    /// Queue an app event to be processed by the event loop.
    pub fn send(&self, app_event: AppEvent) {
        let _ = self.sender.send(Event::App(Box::new(app_event)));
    }

    /// Clone the underlying sender for use in spawned async tasks.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.sender.clone()
    }
}

/// Background task that reads crossterm events and emits ticks.
struct EventTask {
    sender: mpsc::UnboundedSender<Event>,
}

impl EventTask {
    fn new(sender: mpsc::UnboundedSender<Event>) -> Self {
        Self { sender }
    }

    async fn run(self) -> color_eyre::Result<()> {
        let mut reader = crossterm::event::EventStream::new();
        let mut tick = tokio::time::interval(tick_rate());
        loop {
            let tick_delay = tick.tick();
            let crossterm_event = reader.next().fuse();
            tokio::select! {
                _ = self.sender.closed() => {
                    break;
                }
                _ = tick_delay => {
                    self.send(Event::Tick);
                }
                Some(Ok(evt)) = crossterm_event => {
                    self.send(Event::Crossterm(evt));
                }
            };
        }
        Ok(())
    }

    async fn run_ticks(self) {
        let mut tick = tokio::time::interval(tick_rate());
        loop {
            tokio::select! {
                _ = self.sender.closed() => break,
                _ = tick.tick() => self.send(Event::Tick),
            }
        }
    }

    fn send(&self, event: Event) {
        let _ = self.sender.send(event);
    }
}

fn tick_rate() -> Duration {
    Duration::from_secs_f64(1.0 / TICK_FPS)
}

/// Wrap an app event for sending over a raw channel.
pub fn app(event: AppEvent) -> Event {
    Event::App(Box::new(event))
}
