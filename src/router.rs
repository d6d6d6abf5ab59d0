use std::sync::mpsc;

use anyhow::Result;

use crate::event::AppEvent;
use crate::model::thread::{thread_url, DisplayThread};

/// The view open in the main pane.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Dashboard,
    Thread {
        project_id: String,
        thread_id: String,
    },
}

impl Route {
    /// Parse a navigable URL (`/` or `/projects/{project}/thread/{thread}`).
    pub fn parse(url: &str) -> Result<Route> {
        let path = url.split(['?', '#']).next().unwrap_or("");
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] | ["dashboard"] => Ok(Route::Dashboard),
            ["projects", project_id, "thread", thread_id] => Ok(Route::Thread {
                project_id: project_id.to_string(),
                thread_id: thread_id.to_string(),
            }),
            _ => anyhow::bail!("unknown route: {}", url),
        }
    }

    pub fn url(&self) -> String {
        match self {
            Route::Dashboard => "/dashboard".to_string(),
            Route::Thread {
                project_id,
                thread_id,
            } => thread_url(project_id, thread_id),
        }
    }

    pub fn thread_id(&self) -> Option<&str> {
        match self {
            Route::Thread { thread_id, .. } => Some(thread_id),
            Route::Dashboard => None,
        }
    }
}

/// Client-side router. Transitions complete asynchronously: `navigate` posts
/// `AppEvent::RouteChanged`, and the route is applied when the app loop
/// drains that event.
pub struct Router {
    current: Route,
    tx: Option<mpsc::Sender<AppEvent>>,
}

impl Router {
    pub fn new() -> Self {
        Router {
            current: Route::Dashboard,
            tx: None,
        }
    }

    pub fn set_sender(&mut self, tx: mpsc::Sender<AppEvent>) {
        self.tx = Some(tx);
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    /// Request a transition to `url`.
    ///
    /// A RouteChanged event is posted even when the URL is invalid (carrying
    /// the current route), so observers always see the navigation finish.
    pub fn navigate(&self, url: &str) -> Result<()> {
        let parsed = Route::parse(url);
        let target = match &parsed {
            Ok(route) => route.clone(),
            Err(_) => self.current.clone(),
        };
        tracing::debug!(%url, ?target, "route change requested");
        if let Some(ref tx) = self.tx {
            let _ = tx.send(AppEvent::RouteChanged(target));
        }
        parsed.map(|_| ())
    }

    /// Apply a completed transition.
    pub fn apply(&mut self, route: Route) {
        self.current = route;
    }
}

/// Tracks which list entry is mid-navigation.
pub struct Dispatcher {
    pub router: Router,
    navigating: Option<String>,
}

impl Dispatcher {
    pub fn new(router: Router) -> Self {
        Dispatcher {
            router,
            navigating: None,
        }
    }

    /// Mark `entry` as navigating and request its route.
    pub fn select(&mut self, entry: &DisplayThread) -> Result<()> {
        self.navigating = Some(entry.thread_id.clone());
        self.router.navigate(&entry.url)
    }

    /// Route change finished (any destination): apply it and clear the marker.
    pub fn route_changed(&mut self, route: Route) {
        self.navigating = None;
        self.router.apply(route);
    }

    pub fn navigating(&self) -> Option<&str> {
        self.navigating.as_deref()
    }

    pub fn is_navigating(&self, thread_id: &str) -> bool {
        self.navigating.as_deref() == Some(thread_id)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn entry(thread_id: &str) -> DisplayThread {
        DisplayThread {
            thread_id: thread_id.to_string(),
            project_id: "p1".to_string(),
            project_name: "Alpha".to_string(),
            url: thread_url("p1", thread_id),
            updated_at: Utc.timestamp_opt(0, 0).unwrap(),
        }
    }

    fn dispatcher() -> (Dispatcher, mpsc::Receiver<AppEvent>) {
        let (tx, rx) = mpsc::channel();
        let mut router = Router::new();
        router.set_sender(tx);
        (Dispatcher::new(router), rx)
    }

    #[test]
    fn test_parse_routes() {
        assert_eq!(Route::parse("/").unwrap(), Route::Dashboard);
        assert_eq!(Route::parse("/dashboard").unwrap(), Route::Dashboard);
        assert_eq!(
            Route::parse("/projects/p1/thread/t1?x=1").unwrap(),
            Route::Thread {
                project_id: "p1".to_string(),
                thread_id: "t1".to_string(),
            }
        );
        assert!(Route::parse("/projects/p1").is_err());
        assert!(Route::parse("/settings").is_err());
    }

    #[test]
    fn test_url_round_trip() {
        let route = Route::Thread {
            project_id: "p1".to_string(),
            thread_id: "t1".to_string(),
        };
        assert_eq!(Route::parse(&route.url()).unwrap(), route);
        assert_eq!(Route::parse(&Route::Dashboard.url()).unwrap(), Route::Dashboard);
    }

    #[test]
    fn test_marker_set_until_route_changes() {
        let (mut d, rx) = dispatcher();
        d.select(&entry("t1")).unwrap();
        assert!(d.is_navigating("t1"));
        // Route not applied until the event is drained.
        assert_eq!(*d.router.current(), Route::Dashboard);

        let AppEvent::RouteChanged(route) = rx.try_recv().unwrap() else {
            panic!("expected RouteChanged");
        };
        d.route_changed(route);
        assert!(d.navigating().is_none());
        assert_eq!(d.router.current().thread_id(), Some("t1"));
    }

    #[test]
    fn test_marker_cleared_by_any_destination() {
        let (mut d, _rx) = dispatcher();
        d.select(&entry("t1")).unwrap();
        d.route_changed(Route::Dashboard);
        assert!(!d.is_navigating("t1"));
        assert_eq!(*d.router.current(), Route::Dashboard);
    }

    #[test]
    fn test_invalid_url_still_completes() {
        let (mut d, rx) = dispatcher();
        let mut bad = entry("t2");
        bad.url = "/nowhere".to_string();
        assert!(d.select(&bad).is_err());
        assert!(d.is_navigating("t2"));

        let AppEvent::RouteChanged(route) = rx.try_recv().unwrap() else {
            panic!("expected RouteChanged");
        };
        assert_eq!(route, Route::Dashboard);
        d.route_changed(route);
        assert!(d.navigating().is_none());
    }
}
