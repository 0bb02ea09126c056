use std::time::Duration;

use rand::RngExt;

use crate::prompt;

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

pub const DEFAULT_MODEL: &str = "flux";

/// Models selectable with a custom API key.
pub const MODELS: &[&str] = &[
    "flux",
    "flux-realism",
    "flux-coke",
    "flux-schizo",
    "flux-pro",
    "flux-dev",
    "turbo",
    "midjourney",
    "dalle",
    "any-dark",
];

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// API key and preferred model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCredentials {
    pub key: Option<String>,
    pub model: String,
}

impl Default for ApiCredentials {
    fn default() -> Self {
        Self {
            key: None,
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl ApiCredentials {
    pub fn new(key: Option<String>, model: impl Into<String>) -> Self {
        let key = key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        Self {
            key,
            model: model.into(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.key.is_some()
    }

    /// Model actually sent; unauthenticated requests only get the default.
    pub fn model_for<'a>(&self, requested: &'a str) -> &'a str {
        let requested = requested.trim();
        if self.is_authenticated() && !requested.is_empty() {
            requested
        } else {
            DEFAULT_MODEL
        }
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Exclusive upper bound for generated seeds.
pub const SEED_MAX: u64 = 1_000_000_000;

/// What the caller asks for. Seed and variation are resolved by
/// [`GenerationRequest::prepare`].
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub width: u32,
    pub height: u32,
    pub seed: Option<u64>,
    pub enhance: bool,
    pub model_name: String,
    pub apply_variation: bool,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            prompt: prompt.into(),
            width: width.max(1),
            height: height.max(1),
            seed: None,
            enhance: true,
            model_name: DEFAULT_MODEL.to_string(),
            apply_variation: true,
        }
    }

    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn enhance(mut self, enhance: bool) -> Self {
        self.enhance = enhance;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model_name = model.into();
        self
    }

    pub fn variation(mut self, apply: bool) -> Self {
        self.apply_variation = apply;
        self
    }

    /// Draw a seed if none was given and apply prompt variation.
    ///
    /// Called once per outbound request so repeated runs of the same prompt
    /// yield different images.
    pub fn prepare(&self) -> PreparedRequest {
        let seed = self
            .seed
            .unwrap_or_else(|| rand::rng().random_range(1..SEED_MAX));
        let prompt = if self.apply_variation {
            prompt::add_variation(&self.prompt)
        } else {
            self.prompt.clone()
        };
        PreparedRequest {
            prompt,
            width: self.width,
            height: self.height,
            seed,
            enhance: self.enhance,
            model_name: self.model_name.clone(),
        }
    }
}

/// A fully resolved request, ready to put on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub prompt: String,
    pub width: u32,
    pub height: u32,
    pub seed: u64,
    pub enhance: bool,
    pub model_name: String,
}

impl PreparedRequest {
    /// Query parameters for the image endpoint.
    pub fn query(&self, model: &str) -> Vec<(&'static str, String)> {
        vec![
            ("model", model.to_string()),
            ("width", self.width.to_string()),
            ("height", self.height.to_string()),
            ("seed", self.seed.to_string()),
            ("enhance", self.enhance.to_string()),
            ("nologo", "true".into()),
            ("private", "true".into()),
            ("quality", "high".into()),
            ("nofeed", "true".into()),
        ]
    }
}

// ---------------------------------------------------------------------------
// Transport policy
// ---------------------------------------------------------------------------

/// Statuses retried by the transport layer.
pub const RETRY_STATUSES: &[u16] = &[429, 500, 502, 503, 504];

#[derive(Debug, Clone)]
pub struct TransportPolicy {
    pub timeout: Duration,
    /// Extra attempts after the first one.
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each following retry.
    pub backoff: Duration,
    pub max_connections: usize,
}

impl Default for TransportPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            max_retries: 2,
            backoff: Duration::from_millis(500),
            max_connections: 10,
        }
    }
}

impl TransportPolicy {
    /// Backoff schedule consumed by the retry loop.
    pub fn delays(&self) -> Vec<Duration> {
        (0..self.max_retries)
            .map(|n| self.backoff * 2u32.saturating_pow(n))
            .collect()
    }
}
