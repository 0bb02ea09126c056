//! Best-effort signals for prompt selection: local time, weather, location
//! and running games. Nothing here ever fails a generation; a collaborator
//! that cannot answer leaves its field empty.

pub mod cache;
pub mod games;
pub mod location;
pub mod weather;

use std::time::{Duration, Instant};

use chrono::Timelike;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::prompt::{Mode, PromptContext};
use cache::{LOCATION_TTL, TtlCache, WEATHER_TTL};
use location::Location;

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone)]
pub struct ContextEndpoints {
    pub weather: String,
    pub location_primary: String,
    pub location_fallback: String,
}

impl Default for ContextEndpoints {
    fn default() -> Self {
        Self {
            weather: weather::WTTR_URL.to_string(),
            location_primary: location::PRIMARY_URL.to_string(),
            location_fallback: location::FALLBACK_URL.to_string(),
        }
    }
}

pub struct ContextProvider {
    http: reqwest::Client,
    endpoints: ContextEndpoints,
    weather: Mutex<TtlCache<String>>,
    location: Mutex<TtlCache<Location>>,
}

impl ContextProvider {
    pub fn new() -> Result<Self, ContextError> {
        Self::with_endpoints(ContextEndpoints::default())
    }

    pub fn with_endpoints(endpoints: ContextEndpoints) -> Result<Self, ContextError> {
        let http = reqwest::Client::builder().timeout(LOOKUP_TIMEOUT).build()?;
        Ok(Self {
            http,
            endpoints,
            weather: Mutex::new(TtlCache::new(WEATHER_TTL)),
            location: Mutex::new(TtlCache::new(LOCATION_TTL)),
        })
    }

    /// Collect only what `mode` needs. The hour is always filled in.
    pub async fn gather(&self, mode: Mode, custom_prompt: &str) -> PromptContext {
        let mut context = PromptContext {
            hour: Some(chrono::Local::now().hour()),
            ..Default::default()
        };

        match mode {
            Mode::Weather => context.weather = self.weather().await,
            Mode::Gaming => context.game = self.running_game().await,
            Mode::Manual => context.custom = Some(custom_prompt.to_string()),
            _ => {}
        }

        tracing::debug!(?mode, ?context, "prompt context gathered");
        context
    }

    /// Current weather text, served from cache for 15 minutes.
    pub async fn weather(&self) -> Option<String> {
        let mut cache = self.weather.lock().await;
        if let Some(text) = cache.get(Instant::now()) {
            tracing::debug!(%text, "weather from cache");
            return Some(text);
        }

        let city = self.location().await.map(|l| l.city);
        let city = city.as_deref().filter(|c| *c != "Unknown");
        match weather::fetch(&self.http, &self.endpoints.weather, city).await {
            Ok(text) => {
                tracing::info!(%text, ?city, "weather fetched");
                cache.insert(text.clone(), Instant::now());
                Some(text)
            }
            Err(e) => {
                tracing::warn!("weather lookup failed: {e}");
                None
            }
        }
    }

    /// Location from IP geolocation, served from cache for an hour.
    pub async fn location(&self) -> Option<Location> {
        let mut cache = self.location.lock().await;
        if let Some(location) = cache.get(Instant::now()) {
            return Some(location);
        }

        match location::fetch(
            &self.http,
            &self.endpoints.location_primary,
            &self.endpoints.location_fallback,
        )
        .await
        {
            Ok(location) => {
                tracing::info!(city = %location.city, country = %location.country, "location detected");
                cache.insert(location.clone(), Instant::now());
                Some(location)
            }
            Err(e) => {
                tracing::warn!("all location services failed: {e}");
                None
            }
        }
    }

    pub async fn running_game(&self) -> Option<String> {
        tokio::task::spawn_blocking(games::detect_running_game)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("game detection task failed: {e}");
                None
            })
    }
}
