use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;

use crate::pollinations::PollinationsError;
use crate::pollinations::client::PollinationsClient;
use crate::pollinations::types::GenerationRequest;
use crate::wallpaper::{WallpaperError, WallpaperSetter};

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Timeout,
    /// Non-2xx status after retries, or `None` for transport failures.
    HttpError(Option<u16>),
    NonImageResponse,
    IoError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Request,
    Save,
    Apply,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationFailure {
    pub kind: FailureKind,
    pub stage: FailureStage,
    pub message: String,
}

impl GenerationFailure {
    fn io(stage: FailureStage, err: impl fmt::Display) -> Self {
        Self {
            kind: FailureKind::IoError,
            stage,
            message: err.to_string(),
        }
    }

    /// Only failures of the OS call are worth sending the user to the
    /// personalization settings for.
    pub fn offers_personalization(&self) -> bool {
        self.stage == FailureStage::Apply
    }
}

impl fmt::Display for GenerationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            FailureKind::Timeout => "Request timed out".to_string(),
            FailureKind::HttpError(Some(status)) => format!("HTTP error {status}"),
            FailureKind::HttpError(None) => "Network error".to_string(),
            FailureKind::NonImageResponse => "Server did not return an image".to_string(),
            FailureKind::IoError => match self.stage {
                FailureStage::Apply => "Could not set wallpaper".to_string(),
                _ => "Could not save image".to_string(),
            },
        };
        write!(f, "{what}: {}", self.message)
    }
}

impl From<PollinationsError> for GenerationFailure {
    fn from(err: PollinationsError) -> Self {
        let kind = match &err {
            PollinationsError::Timeout => FailureKind::Timeout,
            PollinationsError::ApiError { status, .. } => FailureKind::HttpError(Some(*status)),
            PollinationsError::Http(e) => FailureKind::HttpError(e.status().map(|s| s.as_u16())),
            PollinationsError::NonImage { .. } => FailureKind::NonImageResponse,
        };
        Self {
            kind,
            stage: FailureStage::Request,
            message: err.to_string(),
        }
    }
}

/// Terminal result of one pipeline run.
#[derive(Debug, Clone)]
pub enum GenerationOutcome {
    Success {
        image_bytes: Bytes,
        saved_path: PathBuf,
        /// Prompt as sent, after variation.
        prompt: String,
        seed: u64,
    },
    Failure(GenerationFailure),
}

impl GenerationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationOutcome::Success { .. })
    }

    pub fn failure(&self) -> Option<&GenerationFailure> {
        match self {
            GenerationOutcome::Failure(f) => Some(f),
            GenerationOutcome::Success { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Image store
// ---------------------------------------------------------------------------

/// Writes generated images into a single directory.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save `bytes` and return the absolute path written.
    pub async fn save(&self, bytes: &[u8], filename: Option<&str>) -> io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let name = filename.map_or_else(default_filename, str::to_string);
        let path = std::path::absolute(self.dir.join(name))?;
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(path = %path.display(), size = bytes.len(), "image saved");
        Ok(path)
    }
}

/// `wallpaper_<unix seconds>.png`
pub fn default_filename() -> String {
    format!("wallpaper_{}.png", chrono::Utc::now().timestamp())
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// request -> validate -> save -> apply.
pub struct GenerationPipeline {
    client: Arc<PollinationsClient>,
    store: ImageStore,
    setter: Arc<dyn WallpaperSetter>,
}

impl GenerationPipeline {
    pub fn new(
        client: Arc<PollinationsClient>,
        store: ImageStore,
        setter: Arc<dyn WallpaperSetter>,
    ) -> Self {
        Self {
            client,
            store,
            setter,
        }
    }

    pub fn client(&self) -> &PollinationsClient {
        &self.client
    }

    /// Generate, save and set as wallpaper.
    pub async fn run(&self, request: &GenerationRequest) -> GenerationOutcome {
        self.execute(request, true).await
    }

    /// Generate and save without touching the desktop.
    pub async fn generate_only(&self, request: &GenerationRequest) -> GenerationOutcome {
        self.execute(request, false).await
    }

    async fn execute(&self, request: &GenerationRequest, apply: bool) -> GenerationOutcome {
        let prepared = request.prepare();

        let image_bytes = match self.client.fetch(&prepared).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("image request failed: {e}");
                return GenerationOutcome::Failure(e.into());
            }
        };

        let saved_path = match self.store.save(&image_bytes, None).await {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(dir = %self.store.dir().display(), "saving image failed: {e}");
                return GenerationOutcome::Failure(GenerationFailure::io(FailureStage::Save, e));
            }
        };

        if apply {
            if let Err(failure) = self.apply(&saved_path).await {
                return GenerationOutcome::Failure(failure);
            }
        }

        GenerationOutcome::Success {
            image_bytes,
            saved_path,
            prompt: prepared.prompt,
            seed: prepared.seed,
        }
    }

    async fn apply(&self, path: &Path) -> Result<(), GenerationFailure> {
        let setter = Arc::clone(&self.setter);
        let owned = path.to_path_buf();
        let result = tokio::task::spawn_blocking(move || setter.set_wallpaper(&owned))
            .await
            .unwrap_or_else(|e| Err(WallpaperError::SetFailed(e.to_string())));

        result.map_err(|e| {
            tracing::warn!(path = %path.display(), "applying wallpaper failed: {e}");
            GenerationFailure::io(FailureStage::Apply, e)
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
