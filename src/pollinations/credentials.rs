use std::path::PathBuf;

use crate::config::{self, Settings};

use super::types::ApiCredentials;

pub const API_KEY_ENV: &str = "POLLINATIONS_API_KEY";

/// Return candidate .env paths in priority order.
fn env_file_paths() -> Vec<PathBuf> {
    vec![config::app_dir().join(".env"), PathBuf::from(".env")]
}

/// Load .env files into the process environment.
///
/// Earlier files win because dotenvy never overwrites variables that are
/// already set.
pub fn load_env_files() {
    for path in env_file_paths() {
        if path.exists() {
            let _ = dotenvy::from_path(&path);
        }
    }
}

/// Resolve credentials for the image endpoint.
///
/// Priority: `api_key` in settings > `POLLINATIONS_API_KEY` > none.
pub fn resolve(settings: &Settings) -> ApiCredentials {
    let env_key = std::env::var(API_KEY_ENV).ok();
    resolve_with(settings, env_key)
}

fn resolve_with(settings: &Settings, env_key: Option<String>) -> ApiCredentials {
    let settings_key = Some(settings.api_key.trim())
        .filter(|k| !k.is_empty())
        .map(str::to_string);
    let env_key = env_key.filter(|k| !k.trim().is_empty());
    ApiCredentials::new(settings_key.or(env_key), settings.model.clone())
}
