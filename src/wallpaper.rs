use std::path::Path;

use thiserror::Error;

/// Settings page offered when the OS refuses to change the wallpaper.
pub const PERSONALIZATION_URI: &str = "ms-settings:personalization-background";

#[derive(Debug, Error)]
pub enum WallpaperError {
    #[error("image file not found: {0}")]
    FileNotFound(String),
    #[error("failed to set wallpaper: {0}")]
    SetFailed(String),
    #[error("personalization settings are only available on Windows")]
    Unsupported,
}

/// Applies an image file as the desktop background.
pub trait WallpaperSetter: Send + Sync {
    fn set_wallpaper(&self, path: &Path) -> Result<(), WallpaperError>;
}

/// The real desktop, via the `wallpaper` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopWallpaper;

impl WallpaperSetter for DesktopWallpaper {
    fn set_wallpaper(&self, path: &Path) -> Result<(), WallpaperError> {
        if !path.is_file() {
            return Err(WallpaperError::FileNotFound(path.display().to_string()));
        }
        let path_str = path
            .to_str()
            .ok_or_else(|| WallpaperError::SetFailed("path is not valid UTF-8".into()))?;

        wallpaper::set_from_path(path_str).map_err(|e| WallpaperError::SetFailed(e.to_string()))?;
        tracing::info!(path = %path.display(), "wallpaper applied");
        Ok(())
    }
}

/// Open the OS background settings page.
pub fn open_personalization_settings() -> Result<(), WallpaperError> {
    if cfg!(windows) {
        open::that(PERSONALIZATION_URI).map_err(|e| WallpaperError::SetFailed(e.to_string()))
    } else {
        Err(WallpaperError::Unsupported)
    }
}
