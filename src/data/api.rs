use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::config::DashboardConfig;
use crate::model::project::Project;
use crate::model::thread::Thread;

/// Body of the health endpoint.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HealthReport {
    pub status: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{url} returned {status}")]
    Status { url: String, status: u16 },
    #[error("invalid response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid API token")]
    InvalidToken,
}

/// Operations the dashboard consumes from the backend.
pub trait Backend: Send + Sync {
    fn check_health(&self) -> Result<HealthReport, ApiError>;
    fn list_projects(&self) -> Result<Vec<Project>, ApiError>;
    fn list_threads(&self, project_id: &str) -> Result<Vec<Thread>, ApiError>;
}

/// Blocking JSON-over-HTTP backend client.
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, token: Option<&str>, timeout: Duration) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ApiError::InvalidToken)?;
            headers.insert(AUTHORIZATION, value);
        }
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;
        Ok(HttpBackend {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self, ApiError> {
        Self::new(
            config.api_url(),
            config.api_token(),
            config.request_timeout(),
        )
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "GET");
        let response = self.client.get(&url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url,
                status: status.as_u16(),
            });
        }
        let body = response.bytes()?;
        serde_json::from_slice(&body).map_err(|source| ApiError::Decode { url, source })
    }
}

impl Backend for HttpBackend {
    fn check_health(&self) -> Result<HealthReport, ApiError> {
        self.get_json("/health")
    }

    fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.get_json("/projects")
    }

    fn list_threads(&self, project_id: &str) -> Result<Vec<Thread>, ApiError> {
        self.get_json(&format!("/projects/{}/threads", project_id))
    }
}

#[cfg(test)]
pub mod fake {
    //! In-memory backend for tests.

    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;

    #[derive(Default)]
    pub struct FakeBackend {
        pub health: Mutex<Vec<Result<String, ()>>>,
        pub projects: Option<Vec<Project>>,
        pub threads: HashMap<String, Vec<Thread>>,
        pub failing_projects: HashSet<String>,
        pub health_calls: AtomicUsize,
        /// Simulated latency of each health call.
        pub health_delay: Duration,
        pub thread_calls: Mutex<Vec<String>>,
    }

    impl FakeBackend {
        /// Queue health results; the last one repeats once the queue drains.
        pub fn with_health(results: Vec<Result<String, ()>>) -> Self {
            FakeBackend {
                health: Mutex::new(results),
                ..Default::default()
            }
        }
    }

    impl Backend for FakeBackend {
        fn check_health(&self) -> Result<HealthReport, ApiError> {
            self.health_calls.fetch_add(1, Ordering::SeqCst);
            if !self.health_delay.is_zero() {
                std::thread::sleep(self.health_delay);
            }
            let mut queue = self.health.lock().unwrap();
            let next = if queue.len() > 1 {
                queue.remove(0)
            } else {
                queue.first().cloned().unwrap_or(Err(()))
            };
            match next {
                Ok(status) => Ok(HealthReport { status }),
                Err(()) => Err(ApiError::Status {
                    url: "/health".to_string(),
                    status: 503,
                }),
            }
        }

        fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
            self.projects.clone().ok_or(ApiError::Status {
                url: "/projects".to_string(),
                status: 500,
            })
        }

        fn list_threads(&self, project_id: &str) -> Result<Vec<Thread>, ApiError> {
            self.thread_calls.lock().unwrap().push(project_id.to_string());
            if self.failing_projects.contains(project_id) {
                return Err(ApiError::Status {
                    url: format!("/projects/{}/threads", project_id),
                    status: 500,
                });
            }
            Ok(self.threads.get(project_id).cloned().unwrap_or_default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_report_ignores_extra_fields() {
        let report: HealthReport =
            serde_json::from_str(r#"{"status":"ok","instance_id":"abc"}"#).unwrap();
        assert_eq!(report.status, "ok");
    }

    #[test]
    fn test_invalid_token_rejected() {
        let result = HttpBackend::new("http://localhost", Some("bad\ntoken"), Duration::from_secs(1));
        assert!(matches!(result, Err(ApiError::InvalidToken)));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let backend = HttpBackend::new("http://localhost:8000/api/", None, Duration::from_secs(1))
            .unwrap();
        assert_eq!(backend.base_url, "http://localhost:8000/api");
    }

    #[test]
    fn test_status_error_message() {
        let err = ApiError::Status {
            url: "http://x/health".to_string(),
            status: 502,
        };
        assert_eq!(err.to_string(), "http://x/health returned 502");
    }
}
