use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use crate::config::{Resolution, Settings, SettingsError, SettingsStore};
use crate::context::ContextProvider;
use crate::event::{self, AppEvent, Event, GenerationReport};
use crate::pipeline::{GenerationOutcome, GenerationPipeline};
use crate::pollinations::credentials;
use crate::pollinations::types::{GenerationRequest, MODELS};
use crate::prompt::{self, Mode};
use crate::scheduler::AutoChange;
use crate::wallpaper;

/// Shortest auto-change interval accepted from the user.
pub const MIN_INTERVAL_SECS: u64 = 60;

// ---------------------------------------------------------------------------
// State token
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    Idle,
    Generating { started: Instant },
}

impl GenerationState {
    pub fn is_generating(&self) -> bool {
        matches!(self, GenerationState::Generating { .. })
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Owns settings, the generation state and the auto-change loop.
///
/// All mutation happens on the event-loop task; background work reports back
/// through the event channel.
pub struct Controller {
    settings: Settings,
    store: SettingsStore,
    pipeline: Arc<GenerationPipeline>,
    context: Arc<ContextProvider>,
    sender: mpsc::UnboundedSender<Event>,

    state: GenerationState,
    /// The single in-flight generation task, if any.
    task: Option<AbortHandle>,
    auto_change: Option<AutoChange>,

    status: String,
    last_report: Option<GenerationReport>,
}

impl Controller {
    pub fn new(
        settings: Settings,
        store: SettingsStore,
        pipeline: Arc<GenerationPipeline>,
        context: Arc<ContextProvider>,
        sender: mpsc::UnboundedSender<Event>,
    ) -> Self {
        Self {
            settings,
            store,
            pipeline,
            context,
            sender,
            state: GenerationState::Idle,
            task: None,
            auto_change: None,
            status: "Ready".to_string(),
            last_report: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    pub fn is_generating(&self) -> bool {
        self.state.is_generating()
    }

    pub fn auto_change_active(&self) -> bool {
        self.auto_change.as_ref().is_some_and(AutoChange::is_running)
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn last_report(&self) -> Option<&GenerationReport> {
        self.last_report.as_ref()
    }

    /// Whether requests carry an API key, from settings or the environment.
    pub fn is_authenticated(&self) -> bool {
        self.pipeline.client().credentials().is_authenticated()
    }

    /// True when the last run failed while setting the wallpaper.
    pub fn offers_personalization(&self) -> bool {
        self.last_report
            .as_ref()
            .and_then(|r| r.outcome.failure())
            .is_some_and(|f| f.offers_personalization())
    }

    // -- Events -------------------------------------------------------------

    /// Apply one app event. `Quit` is left to the caller.
    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Quit => {}
            AppEvent::Generate => {
                self.request_generation();
            }
            AppEvent::ToggleAutoChange => self.toggle_auto_change(),
            AppEvent::SelectMode(mode) => self.select_mode(mode),
            AppEvent::SaveSettings => {
                let _ = self.save_settings();
            }
            AppEvent::OpenPersonalization => self.open_personalization(),
            AppEvent::AutoChangeElapsed => {
                if !self.auto_change_active() {
                    tracing::debug!("stale auto-change tick ignored, loop is stopped");
                } else if self.is_generating() {
                    tracing::debug!("auto-change tick skipped, generation in flight");
                } else {
                    self.request_generation();
                }
            }
            AppEvent::GenerationFinished(report) => self.finish_generation(*report),
        }
    }

    // -- Generation ---------------------------------------------------------

    /// Start a generation unless one is already running.
    ///
    /// Returns whether a task was spawned.
    pub fn request_generation(&mut self) -> bool {
        if self.is_generating() {
            tracing::debug!("generation already in progress, ignoring request");
            return false;
        }

        let mode = self.settings.mode;
        if mode == Mode::Manual && self.settings.custom_prompt.trim().is_empty() {
            self.status = "Enter a custom prompt first (:prompt <text>)".to_string();
            return false;
        }

        let started = Instant::now();
        self.state = GenerationState::Generating { started };
        self.status = format!("Generating {} wallpaper...", mode.label());
        tracing::info!(?mode, resolution = %self.settings.resolution, "generation started");

        let pipeline = Arc::clone(&self.pipeline);
        let context = Arc::clone(&self.context);
        let sender = self.sender.clone();
        let settings = self.settings.clone();

        let handle = tokio::spawn(async move {
            let ctx = context.gather(mode, &settings.custom_prompt).await;
            let prompt = prompt::select(mode, &ctx);
            let request = request_for(&settings, &prompt);
            let outcome = pipeline.run(&request).await;

            let report = GenerationReport {
                mode,
                prompt,
                outcome,
                elapsed: started.elapsed(),
            };
            let _ = sender.send(event::app(AppEvent::GenerationFinished(Box::new(report))));
        });
        self.task = Some(handle.abort_handle());
        true
    }

    /// Generating -> Idle, recording the outcome.
    pub fn finish_generation(&mut self, report: GenerationReport) {
        self.state = GenerationState::Idle;
        self.task = None;

        self.status = match &report.outcome {
            GenerationOutcome::Success { saved_path, .. } => {
                tracing::info!(
                    path = %saved_path.display(),
                    elapsed_ms = report.elapsed.as_millis() as u64,
                    "wallpaper updated"
                );
                format!("Wallpaper set in {:.1}s", report.elapsed.as_secs_f32())
            }
            GenerationOutcome::Failure(failure) => {
                tracing::warn!(kind = ?failure.kind, stage = ?failure.stage, "generation failed: {}", failure.message);
                if failure.offers_personalization() {
                    format!("{failure} (press o to open personalization settings)")
                } else {
                    failure.to_string()
                }
            }
        };
        self.last_report = Some(report);
    }

    // -- Auto-change --------------------------------------------------------

    /// Start the loop and generate right away.
    pub fn start_auto_change(&mut self) {
        if self.auto_change_active() {
            return;
        }
        let secs = self.settings.auto_change_interval.max(MIN_INTERVAL_SECS);
        self.settings.auto_change_interval = secs;
        let interval = Duration::from_secs(secs);
        self.auto_change = Some(AutoChange::start(interval, self.sender.clone()));
        self.status = format!("Auto-change every {}", format_interval(interval));
        self.request_generation();
    }

    pub fn stop_auto_change(&mut self) {
        if let Some(auto) = self.auto_change.take() {
            auto.stop();
            self.status = "Auto-change stopped".to_string();
        }
    }

    pub fn toggle_auto_change(&mut self) {
        if self.auto_change_active() {
            self.stop_auto_change();
        } else {
            self.start_auto_change();
        }
    }

    // -- Settings -----------------------------------------------------------

    pub fn select_mode(&mut self, mode: Mode) {
        self.settings.mode = mode;
        self.status = format!("Mode: {}", mode.label());
        tracing::info!(?mode, "mode selected");
    }

    /// Set the interval, restarting a running loop without an extra generation.
    pub fn set_interval_secs(&mut self, secs: u64) {
        let secs = secs.max(MIN_INTERVAL_SECS);
        self.settings.auto_change_interval = secs;
        let interval = Duration::from_secs(secs);

        if self.auto_change_active() {
            if let Some(old) = self.auto_change.take() {
                old.stop();
            }
            self.auto_change = Some(AutoChange::start(interval, self.sender.clone()));
        }
        self.status = format!("Interval: {}", format_interval(interval));
    }

    pub fn adjust_interval_minutes(&mut self, delta: i64) {
        let step = delta.unsigned_abs().saturating_mul(60);
        let current = self.settings.auto_change_interval;
        let next = if delta < 0 {
            current.saturating_sub(step)
        } else {
            current.saturating_add(step)
        };
        self.set_interval_secs(next);
    }

    pub fn set_resolution(&mut self, resolution: Resolution) {
        self.settings.resolution = resolution;
        self.status = format!("Resolution: {resolution}");
    }

    /// Store a custom prompt and switch to manual mode.
    pub fn set_custom_prompt(&mut self, text: &str) {
        self.settings.custom_prompt = text.trim().to_string();
        self.select_mode(Mode::Manual);
    }

    pub fn set_model(&mut self, model: &str) {
        self.settings.model = model.trim().to_string();
        self.refresh_credentials();
        self.status = if !MODELS.contains(&self.settings.model.as_str()) {
            format!(
                "Model: {} (not a known model; known: {})",
                self.settings.model,
                MODELS.join(", ")
            )
        } else if self.is_authenticated() {
            format!("Model: {}", self.settings.model)
        } else {
            format!(
                "Model: {} (requires an API key; using default)",
                self.settings.model
            )
        };
    }

    /// Set the API key; an empty key reverts to anonymous access.
    pub fn set_api_key(&mut self, key: &str) {
        self.settings.api_key = key.trim().to_string();
        self.refresh_credentials();
        self.status = if self.settings.api_key.is_empty() {
            "API key cleared".to_string()
        } else {
            "API key updated".to_string()
        };
    }

    fn refresh_credentials(&self) {
        self.pipeline
            .client()
            .update_credentials(credentials::resolve(&self.settings));
    }

    pub fn save_settings(&mut self) -> Result<(), SettingsError> {
        match self.store.save(&self.settings) {
            Ok(()) => {
                self.status = "Settings saved".to_string();
                Ok(())
            }
            Err(e) => {
                tracing::warn!("saving settings failed: {e}");
                self.status = format!("Could not save settings: {e}");
                Err(e)
            }
        }
    }

    pub fn open_personalization(&mut self) {
        if let Err(e) = wallpaper::open_personalization_settings() {
            self.status = e.to_string();
        }
    }

    /// Stop background work and persist settings.
    pub async fn shutdown(&mut self) {
        if let Some(auto) = self.auto_change.take() {
            auto.join().await;
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
        let _ = self.save_settings();
    }
}

/// Request for `prompt` using the size, enhance flag and model from `settings`.
pub fn request_for(settings: &Settings, prompt: &str) -> GenerationRequest {
    GenerationRequest::new(
        prompt,
        settings.resolution.width,
        settings.resolution.height,
    )
    .enhance(settings.enhance_prompts)
    .model(settings.model.clone())
}

pub fn format_interval(interval: Duration) -> String {
    let secs = interval.as_secs();
    match (secs / 3600, (secs % 3600) / 60) {
        (0, m) => format!("{m} min"),
        (h, 0) => format!("{h} h"),
        (h, m) => format!("{h} h {m} min"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{FailureKind, ImageStore};
    use crate::pollinations::client::PollinationsClient;
    use crate::pollinations::types::{ApiCredentials, TransportPolicy};
    use crate::testing::{self, RecordingSetter, Reply, ScriptedServer};

    struct Harness {
        controller: Controller,
        rx: mpsc::UnboundedReceiver<Event>,
        setter: Arc<RecordingSetter>,
        dir: tempfile::TempDir,
    }

    fn harness(server: &ScriptedServer, settings: Settings) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let setter = Arc::new(RecordingSetter::default());
        let (tx, rx) = mpsc::unbounded_channel();
        let controller =
            testing::build_controller(server, dir.path(), settings, setter.clone(), tx);
        Harness {
            controller,
            rx,
            setter,
            dir,
        }
    }

    fn space_settings() -> Settings {
        Settings {
            mode: Mode::Space,
            ..Settings::default()
        }
    }

    /// Wait for the next finished generation and feed it back.
    async fn finish_next(h: &mut Harness) -> GenerationReport {
        loop {
            let Event::App(event) = h.rx.recv().await.unwrap() else {
                continue;
            };
            if let AppEvent::GenerationFinished(report) = *event {
                let copy = (*report).clone();
                h.controller.handle_app_event(AppEvent::GenerationFinished(report));
                return copy;
            }
        }
    }

    #[tokio::test]
    async fn second_request_while_generating_is_a_no_op() {
        let server =
            ScriptedServer::start(vec![Reply::image().delayed(Duration::from_millis(300))]).await;
        let mut h = harness(&server, space_settings());

        assert!(h.controller.request_generation());
        assert!(h.controller.is_generating());
        assert!(!h.controller.request_generation());

        let report = finish_next(&mut h).await;
        assert!(report.outcome.is_success());
        assert_eq!(h.controller.state(), GenerationState::Idle);
        assert_eq!(server.hits(), 1);
        assert_eq!(h.setter.applied().len(), 1);
    }

    #[tokio::test]
    async fn failure_returns_to_idle_with_message() {
        let server = ScriptedServer::start(vec![Reply::text(404, "no such model")]).await;
        let mut h = harness(&server, space_settings());

        assert!(h.controller.request_generation());
        let report = finish_next(&mut h).await;

        let failure = report.outcome.failure().unwrap();
        assert_eq!(failure.kind, FailureKind::HttpError(Some(404)));
        assert!(!h.controller.is_generating());
        assert!(h.controller.status().starts_with("HTTP error 404"));
        // The trigger works again.
        assert!(h.controller.request_generation());
    }

    #[tokio::test]
    async fn manual_mode_without_prompt_is_refused() {
        let server = ScriptedServer::start(vec![Reply::image()]).await;
        let settings = Settings {
            mode: Mode::Manual,
            custom_prompt: "   ".into(),
            ..Settings::default()
        };
        let mut h = harness(&server, settings);

        assert!(!h.controller.request_generation());
        assert_eq!(h.controller.state(), GenerationState::Idle);
        assert!(h.controller.status().contains("custom prompt"));

        h.controller.set_custom_prompt("paper lanterns over a canal");
        assert_eq!(h.controller.settings().mode, Mode::Manual);
        assert!(h.controller.request_generation());
        let report = finish_next(&mut h).await;
        assert_eq!(report.prompt, "paper lanterns over a canal");
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn elapsed_tick_during_generation_is_ignored() {
        let server =
            ScriptedServer::start(vec![Reply::image().delayed(Duration::from_millis(200))]).await;
        let mut h = harness(&server, space_settings());

        h.controller.start_auto_change();
        assert!(h.controller.is_generating());
        h.controller.handle_app_event(AppEvent::AutoChangeElapsed);
        finish_next(&mut h).await;
        assert_eq!(server.hits(), 1);

        h.controller.handle_app_event(AppEvent::AutoChangeElapsed);
        assert!(h.controller.is_generating());
        finish_next(&mut h).await;
        assert_eq!(server.hits(), 2);
        h.controller.stop_auto_change();
    }

    #[tokio::test]
    async fn queued_tick_after_stop_does_not_generate() {
        let server = ScriptedServer::start(vec![Reply::image()]).await;
        let mut h = harness(&server, space_settings());

        h.controller.start_auto_change();
        finish_next(&mut h).await;
        assert_eq!(server.hits(), 1);

        h.controller.stop_auto_change();
        h.controller.handle_app_event(AppEvent::AutoChangeElapsed);
        assert_eq!(h.controller.state(), GenerationState::Idle);
        assert!(h.controller.task.is_none());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn tick_without_auto_change_is_ignored() {
        let server = ScriptedServer::start(vec![Reply::image()]).await;
        let mut h = harness(&server, space_settings());

        h.controller.handle_app_event(AppEvent::AutoChangeElapsed);
        assert!(!h.controller.is_generating());
        assert_eq!(server.hits(), 0);
    }

    #[tokio::test]
    async fn saved_interval_below_minimum_is_clamped_on_start() {
        let server = ScriptedServer::start(vec![Reply::image()]).await;
        let settings = Settings {
            auto_change_interval: 5,
            ..space_settings()
        };
        let mut h = harness(&server, settings);

        h.controller.start_auto_change();
        let interval = h.controller.auto_change.as_ref().unwrap().interval();
        assert_eq!(interval, Duration::from_secs(MIN_INTERVAL_SECS));
        assert_eq!(h.controller.settings().auto_change_interval, MIN_INTERVAL_SECS);
        finish_next(&mut h).await;
        h.controller.stop_auto_change();
    }

    #[tokio::test]
    async fn starting_auto_change_generates_immediately() {
        let server = ScriptedServer::start(vec![Reply::image()]).await;
        let mut h = harness(&server, space_settings());

        h.controller.handle_app_event(AppEvent::ToggleAutoChange);
        assert!(h.controller.auto_change_active());
        assert!(h.controller.is_generating());
        finish_next(&mut h).await;

        h.controller.handle_app_event(AppEvent::ToggleAutoChange);
        assert!(!h.controller.auto_change_active());
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn apply_failure_offers_personalization() {
        let server = ScriptedServer::start(vec![Reply::image()]).await;
        let mut h = harness(&server, space_settings());
        h.controller.pipeline = Arc::new(GenerationPipeline::new(
            Arc::new(
                PollinationsClient::with_base_url(
                    &server.base_url,
                    ApiCredentials::default(),
                    TransportPolicy::default(),
                )
                .unwrap(),
            ),
            ImageStore::new(h.dir.path().join("cache")),
            Arc::new(RecordingSetter::failing()),
        ));

        h.controller.request_generation();
        finish_next(&mut h).await;
        assert!(h.controller.offers_personalization());
        assert!(h.controller.status().contains("press o"));
    }

    #[tokio::test]
    async fn api_key_and_model_reach_the_client() {
        let server = ScriptedServer::start(vec![Reply::image()]).await;
        let mut h = harness(&server, space_settings());

        h.controller.set_api_key(" sk-live ");
        h.controller.set_model("turbo");
        let creds = h.controller.pipeline.client().credentials();
        assert_eq!(creds.key.as_deref(), Some("sk-live"));
        assert_eq!(creds.model, "turbo");
        assert_eq!(h.controller.settings().api_key, "sk-live");

        h.controller.request_generation();
        finish_next(&mut h).await;
        let head = server.requests()[0].to_lowercase();
        assert!(head.contains("authorization: bearer sk-live"));
        assert!(head.contains("model=turbo"));
    }

    #[tokio::test]
    async fn unknown_model_is_flagged_in_status() {
        let server = ScriptedServer::start(vec![Reply::image()]).await;
        let mut h = harness(&server, space_settings());

        h.controller.set_api_key("sk-live");
        h.controller.set_model("flux-pro");
        assert_eq!(h.controller.status(), "Model: flux-pro");

        h.controller.set_model("sdxl-lightning");
        assert_eq!(h.controller.settings().model, "sdxl-lightning");
        assert!(h.controller.status().contains("not a known model"));
        assert!(h.controller.status().contains("turbo"));
    }

    #[tokio::test]
    async fn interval_changes_are_clamped() {
        let server = ScriptedServer::start(vec![Reply::image()]).await;
        let mut h = harness(&server, space_settings());

        h.controller.set_interval_secs(5);
        assert_eq!(h.controller.settings().auto_change_interval, MIN_INTERVAL_SECS);
        h.controller.adjust_interval_minutes(2);
        assert_eq!(h.controller.settings().auto_change_interval, 180);
        h.controller.adjust_interval_minutes(-10);
        assert_eq!(h.controller.settings().auto_change_interval, MIN_INTERVAL_SECS);
    }

    #[tokio::test]
    async fn shutdown_persists_settings() {
        let server = ScriptedServer::start(vec![Reply::image()]).await;
        let mut h = harness(&server, space_settings());

        h.controller.select_mode(Mode::Fantasy);
        h.controller.set_resolution("2560x1440".parse().unwrap());
        h.controller.shutdown().await;

        let saved = h.controller.store.load();
        assert_eq!(saved.mode, Mode::Fantasy);
        assert_eq!(saved.resolution.to_string(), "2560x1440");
    }

    #[test]
    fn interval_formatting() {
        assert_eq!(format_interval(Duration::from_secs(300)), "5 min");
        assert_eq!(format_interval(Duration::from_secs(3600)), "1 h");
        assert_eq!(format_interval(Duration::from_secs(5400)), "1 h 30 min");
    }
}
