use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".threadboard.toml";

/// Backend base URL when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// How often the tick event fires (ms).
pub const TICK_RATE_MS: u64 = 250;

/// Health poll interval (s).
pub const HEALTH_INTERVAL_SECS: u64 = 30;

/// Status token the health endpoint returns when the API is up.
pub const HEALTH_SENTINEL: &str = "ok";

/// Per-request HTTP timeout (s).
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Config watcher debounce interval (ms).
pub const DEBOUNCE_MS: u64 = 200;

/// Project name shown when the API returns none.
pub const PLACEHOLDER_PROJECT_NAME: &str = "Unnamed Project";

pub const API_URL_ENV: &str = "THREADBOARD_API_URL";
pub const API_TOKEN_ENV: &str = "THREADBOARD_API_TOKEN";

// ---------------------------------------------------------------------------
// Dashboard config (.threadboard.toml)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct DashboardConfig {
    pub api: Option<ApiConfig>,
    pub health: Option<HealthConfig>,
    pub threads: Option<ThreadsConfig>,
    pub display: Option<DisplayConfig>,
    pub log: Option<LogConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ApiConfig {
    pub url: Option<String>,
    pub token: Option<String>,
    pub timeout_secs: Option<u64>,
    /// Base URL of the web app, used when opening a thread in the browser.
    pub web_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct HealthConfig {
    pub interval_secs: Option<u64>,
    pub sentinel: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ThreadsConfig {
    /// Number of projects whose threads are fetched at once. 1 = sequential.
    pub fetch_concurrency: Option<usize>,
    pub placeholder_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct DisplayConfig {
    pub tick_rate: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct LogConfig {
    pub file: Option<PathBuf>,
}

impl DashboardConfig {
    pub fn api_url(&self) -> &str {
        self.api
            .as_ref()
            .and_then(|a| a.url.as_deref())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
    }

    pub fn api_token(&self) -> Option<&str> {
        self.api.as_ref().and_then(|a| a.token.as_deref())
    }

    pub fn request_timeout(&self) -> Duration {
        let secs = self
            .api
            .as_ref()
            .and_then(|a| a.timeout_secs)
            .unwrap_or(REQUEST_TIMEOUT_SECS);
        Duration::from_secs(secs.max(1))
    }

    pub fn web_url(&self) -> Option<&str> {
        self.api
            .as_ref()
            .and_then(|a| a.web_url.as_deref())
            .map(|u| u.trim_end_matches('/'))
    }

    pub fn health_interval(&self) -> Duration {
        let secs = self
            .health
            .as_ref()
            .and_then(|h| h.interval_secs)
            .unwrap_or(HEALTH_INTERVAL_SECS);
        Duration::from_secs(secs.max(1))
    }

    pub fn health_sentinel(&self) -> &str {
        self.health
            .as_ref()
            .and_then(|h| h.sentinel.as_deref())
            .unwrap_or(HEALTH_SENTINEL)
    }

    pub fn fetch_concurrency(&self) -> usize {
        self.threads
            .as_ref()
            .and_then(|t| t.fetch_concurrency)
            .unwrap_or(1)
            .max(1)
    }

    pub fn placeholder_name(&self) -> &str {
        self.threads
            .as_ref()
            .and_then(|t| t.placeholder_name.as_deref())
            .unwrap_or(PLACEHOLDER_PROJECT_NAME)
    }

    pub fn tick_rate(&self) -> u64 {
        self.display
            .as_ref()
            .and_then(|d| d.tick_rate)
            .unwrap_or(TICK_RATE_MS)
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.log.as_ref().and_then(|l| l.file.as_deref())
    }

    /// Whether a reload needs the health monitor restarted.
    pub fn health_settings_differ(&self, other: &DashboardConfig) -> bool {
        self.api_url() != other.api_url()
            || self.api_token() != other.api_token()
            || self.request_timeout() != other.request_timeout()
            || self.health_interval() != other.health_interval()
            || self.health_sentinel() != other.health_sentinel()
    }

    /// Apply environment overrides (`THREADBOARD_API_URL`, `THREADBOARD_API_TOKEN`).
    pub fn apply_env(&mut self) {
        let url = std::env::var(API_URL_ENV).ok().filter(|v| !v.is_empty());
        let token = std::env::var(API_TOKEN_ENV).ok().filter(|v| !v.is_empty());
        self.apply_overrides(url, token);
    }

    pub fn apply_overrides(&mut self, url: Option<String>, token: Option<String>) {
        if url.is_none() && token.is_none() {
            return;
        }
        let api = self.api.get_or_insert_with(ApiConfig::default);
        if let Some(url) = url {
            api.url = Some(url);
        }
        if let Some(token) = token {
            api.token = Some(token);
        }
    }
}

/// Resolve the config file path: explicit path, else `.threadboard.toml` in `cwd`.
pub fn config_path(explicit: Option<&Path>, cwd: &Path) -> PathBuf {
    match explicit {
        Some(p) => p.to_path_buf(),
        None => cwd.join(CONFIG_FILE_NAME),
    }
}

/// Load the dashboard config from `path`.
/// Returns default config if the file doesn't exist or can't be parsed.
pub fn load_config(path: &Path) -> DashboardConfig {
    if !path.exists() {
        return DashboardConfig::default();
    }
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read config");
            return DashboardConfig::default();
        }
    };
    match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to parse config");
            DashboardConfig::default()
        }
    }
}
