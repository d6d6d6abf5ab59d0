use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::model::project::Project;

#[derive(Debug, Clone, Deserialize)]
pub struct Thread {
    #[serde(alias = "thread_id")]
    pub id: String,
    pub project_id: String,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A thread joined with its project, ready for the sidebar.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayThread {
    pub thread_id: String,
    pub project_id: String,
    pub project_name: String,
    pub url: String,
    pub updated_at: DateTime<Utc>,
}

impl DisplayThread {
    /// Join a thread with its owning project.
    ///
    /// The timestamp falls back from the thread's own, to the project's, to
    /// `now`, so threads that were never updated still sort as fresh.
    pub fn new(thread: &Thread, project: &Project, placeholder: &str, now: DateTime<Utc>) -> Self {
        let updated_at = thread.updated_at.or(project.updated_at).unwrap_or(now);
        DisplayThread {
            thread_id: thread.id.clone(),
            project_id: project.id.clone(),
            project_name: project.display_name(placeholder).to_string(),
            url: thread_url(&project.id, &thread.id),
            updated_at,
        }
    }

    /// Short local date/time label for list rows.
    pub fn age_label(&self) -> String {
        self.updated_at
            .with_timezone(&chrono::Local)
            .format("%b %d %H:%M")
            .to_string()
    }
}

pub fn thread_url(project_id: &str, thread_id: &str) -> String {
    format!("/projects/{}/thread/{}", project_id, thread_id)
}

/// Result of one complete index build.
#[derive(Debug, Clone, Default)]
pub struct ThreadIndex {
    pub threads: Vec<DisplayThread>,
    /// Error text when the project list itself could not be fetched.
    pub error: Option<String>,
    /// Projects whose thread fetch failed, as `(project_id, error)`.
    pub failed_projects: Vec<(String, String)>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn project(updated_at: Option<DateTime<Utc>>) -> Project {
        Project {
            id: "p1".to_string(),
            name: Some("Alpha".to_string()),
            updated_at,
        }
    }

    fn thread(updated_at: Option<DateTime<Utc>>) -> Thread {
        Thread {
            id: "t1".to_string(),
            project_id: "p1".to_string(),
            updated_at,
        }
    }

    #[test]
    fn test_timestamp_prefers_thread() {
        let dt = DisplayThread::new(&thread(Some(ts(300))), &project(Some(ts(200))), "?", ts(100));
        assert_eq!(dt.updated_at, ts(300));
    }

    #[test]
    fn test_timestamp_falls_back_to_project() {
        let dt = DisplayThread::new(&thread(None), &project(Some(ts(200))), "?", ts(100));
        assert_eq!(dt.updated_at, ts(200));
    }

    #[test]
    fn test_timestamp_falls_back_to_now() {
        let dt = DisplayThread::new(&thread(None), &project(None), "?", ts(100));
        assert_eq!(dt.updated_at, ts(100));
    }

    #[test]
    fn test_url_and_name() {
        let dt = DisplayThread::new(&thread(None), &project(None), "?", ts(100));
        assert_eq!(dt.url, "/projects/p1/thread/t1");
        assert_eq!(dt.project_name, "Alpha");
        assert_eq!(dt.thread_id, "t1");
    }

    #[test]
    fn test_deserialize_null_timestamp() {
        let json = r#"{"thread_id":"t9","project_id":"p1","updated_at":null}"#;
        let t: Thread = serde_json::from_str(json).unwrap();
        assert_eq!(t.id, "t9");
        assert!(t.updated_at.is_none());
    }
}
