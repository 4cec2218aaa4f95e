use tracing::warn;

use crate::storage::{KeyValueStorage, Preferences};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Preference keys shared between pages.
pub mod keys {
    pub const API_BASE_URL: &str = "api_base_url";
    pub const THEME: &str = "theme";
    /// Last optimized text, used to pre-fill the evaluation, compare and blind
    /// results pages. Same key the earlier web client wrote.
    pub const OPTIMIZED_OUTPUT: &str = "OptimizedOutput";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: option_env!("PROMPTLAB_API_URL")
                .unwrap_or(DEFAULT_API_URL)
                .to_string(),
            log_level: option_env!("PROMPTLAB_LOG")
                .unwrap_or(DEFAULT_LOG_LEVEL)
                .to_string(),
        }
    }
}

impl AppConfig {
    /// Build-time defaults overridden by whatever the user saved on the
    /// settings page.
    pub fn load<S: KeyValueStorage>(prefs: &Preferences<S>) -> Self {
        let mut config = Self::default();
        match prefs.get(keys::API_BASE_URL) {
            Ok(Some(url)) => config.api_base_url = url,
            Ok(None) => {}
            Err(e) => warn!("Failed to read API URL preference: {}", e),
        }
        config.api_base_url = normalize_base_url(&config.api_base_url);
        config
    }
}

/// Trims whitespace and trailing slashes so paths can be appended verbatim.
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
