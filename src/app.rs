use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;

use chrono::{DateTime, Local};
use crossterm::event::KeyEvent;
use tui_textarea::TextArea;

use crate::config::{self, DashboardConfig};
use crate::data::api::{Backend, HttpBackend};
use crate::data::health::HealthMonitor;
use crate::data::search;
use crate::data::threads::{self, BuildOptions};
use crate::data::api::ApiError;
use crate::event::AppEvent;
use crate::model::health::{select_view, HealthState, ViewState};
use crate::model::thread::{DisplayThread, ThreadIndex};
use crate::router::{Dispatcher, Route, Router};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pane {
    Sidebar,
    Content,
}

/// Settings given on the command line; they win over file and env on reload.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub api_url: Option<String>,
}

pub struct App {
    pub should_quit: bool,
    pub show_help: bool,
    pub pane: Pane,

    // Config
    pub config: DashboardConfig,
    pub config_path: PathBuf,
    pub overrides: CliOverrides,

    // Backend
    pub backend: Arc<dyn Backend>,
    pub event_tx: Option<mpsc::Sender<AppEvent>>,

    // Health
    pub health: HealthState,
    pub health_monitor: Option<HealthMonitor>,
    pub health_generation: u64,
    pub health_checked_at: Option<DateTime<Local>>,

    // Thread index
    pub threads_loading: bool,
    /// Settings changed while a build was running; rebuild when it lands.
    pub rebuild_pending: bool,
    pub all_threads: Vec<DisplayThread>,
    pub filtered_threads: Vec<DisplayThread>,
    pub failed_projects: Vec<(String, String)>,
    pub thread_index: usize,
    pub index_built_at: Option<DateTime<Local>>,

    // Search
    pub search_mode: bool,
    pub search_editor: TextArea<'static>,

    // Navigation
    pub dispatcher: Dispatcher,
    pub content_scroll: usize,

    // Status
    pub spinner_frame: usize,
    pub last_error: Option<String>,
    pub dirty: bool,
}

impl App {
    pub fn new(
        config: DashboardConfig,
        config_path: PathBuf,
        overrides: CliOverrides,
        backend: Arc<dyn Backend>,
    ) -> Self {
        App {
            should_quit: false,
            show_help: false,
            pane: Pane::Sidebar,

            config,
            config_path,
            overrides,

            backend,
            event_tx: None,

            health: HealthState::Checking,
            health_monitor: None,
            health_generation: 0,
            health_checked_at: None,

            threads_loading: false,
            rebuild_pending: false,
            all_threads: Vec::new(),
            filtered_threads: Vec::new(),
            failed_projects: Vec::new(),
            thread_index: 0,
            index_built_at: None,

            search_mode: false,
            search_editor: new_search_editor(String::new()),

            dispatcher: Dispatcher::new(Router::new()),
            content_scroll: 0,

            spinner_frame: 0,
            last_error: None,
            dirty: true,
        }
    }

    /// Wire the event channel, start health polling and the first index build.
    pub fn start(&mut self, tx: mpsc::Sender<AppEvent>) {
        self.dispatcher.router.set_sender(tx.clone());
        self.event_tx = Some(tx);
        self.start_health_monitor();
        self.load_threads();
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn view_state(&self) -> ViewState {
        select_view(self.health, !self.health.is_resolved())
    }

    // --- Health ---

    pub fn start_health_monitor(&mut self) {
        let Some(tx) = self.event_tx.clone() else {
            return;
        };
        // Results still queued from the old poller carry its generation and are dropped.
        self.health_generation += 1;
        self.health_monitor = Some(HealthMonitor::start(
            self.backend.clone(),
            self.config.health_interval(),
            self.config.health_sentinel().to_string(),
            self.health_generation,
            tx,
        ));
    }

    /// Manual re-check from the loading/maintenance screen; the result arrives as an event.
    pub fn recheck_health(&mut self) {
        if let Some(monitor) = &self.health_monitor {
            monitor.probe_now();
        }
    }

    pub fn handle_health_event(&mut self, generation: u64, healthy: bool) {
        if generation != self.health_generation {
            tracing::debug!(generation, current = self.health_generation, "stale health result ignored");
            return;
        }
        self.handle_health_checked(healthy);
    }

    pub fn handle_health_checked(&mut self, healthy: bool) {
        let previous = self.health;
        self.health = previous.resolve(healthy);
        self.health_checked_at = Some(Local::now());
        if previous != self.health {
            tracing::info!(from = previous.label(), to = self.health.label(), "health changed");
        }
        // Coming back from maintenance: the list may be stale or empty.
        if previous == HealthState::Unhealthy && healthy {
            self.load_threads();
        }
    }

    // --- Thread index ---

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            concurrency: self.config.fetch_concurrency(),
            placeholder_name: self.config.placeholder_name().to_string(),
        }
    }

    /// Start a background index build unless one is already running.
    pub fn load_threads(&mut self) {
        if self.threads_loading {
            return;
        }
        let Some(tx) = self.event_tx.clone() else {
            return;
        };
        self.threads_loading = true;
        threads::spawn_index_build(self.backend.clone(), self.build_options(), tx);
    }

    /// Rebuild for new settings, after the running build if there is one.
    pub fn request_rebuild(&mut self) {
        if self.threads_loading {
            self.rebuild_pending = true;
        } else {
            self.load_threads();
        }
    }

    pub fn handle_index_built(&mut self, index: ThreadIndex) {
        self.threads_loading = false;
        self.index_built_at = Some(Local::now());

        self.last_error = match (&index.error, index.failed_projects.len()) {
            (Some(e), _) => Some(e.clone()),
            (None, 0) => None,
            (None, 1) => Some(format!(
                "Threads: 1 project failed to load ({})",
                index.failed_projects[0].1
            )),
            (None, n) => Some(format!("Threads: {} projects failed to load", n)),
        };
        self.failed_projects = index.failed_projects;
        self.all_threads = index.threads;
        self.apply_filter();

        if self.rebuild_pending {
            self.rebuild_pending = false;
            self.load_threads();
        }
    }

    /// Recompute the visible list from the full index and current query.
    pub fn apply_filter(&mut self) {
        self.filtered_threads = search::filter_threads(&self.search_query(), &self.all_threads);
        if self.thread_index >= self.filtered_threads.len() {
            self.thread_index = self.filtered_threads.len().saturating_sub(1);
        }
    }

    pub fn selected_thread(&self) -> Option<&DisplayThread> {
        self.filtered_threads.get(self.thread_index)
    }

    /// Thread shown by the current route, looked up in the full index.
    pub fn routed_thread(&self) -> Option<&DisplayThread> {
        let id = self.dispatcher.router.current().thread_id()?;
        self.all_threads.iter().find(|t| t.thread_id == id)
    }

    // --- Search ---

    pub fn search_query(&self) -> String {
        self.search_editor
            .lines()
            .first()
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_search_query(&mut self, query: &str) {
        self.search_editor = new_search_editor(query.to_string());
        self.search_editor.move_cursor(tui_textarea::CursorMove::End);
        self.apply_filter();
    }

    pub fn start_search(&mut self) {
        self.search_mode = true;
        self.pane = Pane::Sidebar;
    }

    pub fn search_input(&mut self, key: KeyEvent) {
        let before = self.search_query();
        self.search_editor.input(key);
        if self.search_query() != before {
            self.thread_index = 0;
            self.apply_filter();
        }
    }

    /// Leave search mode, keeping the query.
    pub fn finish_search(&mut self) {
        self.search_mode = false;
    }

    /// Leave search mode and drop the query.
    pub fn cancel_search(&mut self) {
        self.search_mode = false;
        self.set_search_query("");
    }

    // --- Navigation ---

    pub fn navigate_down(&mut self) {
        match self.pane {
            Pane::Sidebar => {
                if !self.filtered_threads.is_empty() {
                    self.thread_index =
                        (self.thread_index + 1).min(self.filtered_threads.len() - 1);
                }
            }
            Pane::Content => {
                self.content_scroll = self.content_scroll.saturating_add(1);
            }
        }
    }

    pub fn navigate_up(&mut self) {
        match self.pane {
            Pane::Sidebar => self.thread_index = self.thread_index.saturating_sub(1),
            Pane::Content => self.content_scroll = self.content_scroll.saturating_sub(1),
        }
    }

    pub fn navigate_left(&mut self) {
        self.pane = Pane::Sidebar;
    }

    pub fn navigate_right(&mut self) {
        self.pane = Pane::Content;
    }

    pub fn jump_top(&mut self) {
        match self.pane {
            Pane::Sidebar => self.thread_index = 0,
            Pane::Content => self.content_scroll = 0,
        }
    }

    pub fn jump_bottom(&mut self) {
        match self.pane {
            Pane::Sidebar => self.thread_index = self.filtered_threads.len().saturating_sub(1),
            Pane::Content => self.content_scroll = usize::MAX / 2,
        }
    }

    /// Open the selected thread through the router.
    pub fn select_item(&mut self) {
        let Some(entry) = self.selected_thread().cloned() else {
            return;
        };
        if let Err(e) = self.dispatcher.select(&entry) {
            self.last_error = Some(format!("Navigate: {}", e));
        }
    }

    pub fn go_home(&mut self) {
        if *self.dispatcher.router.current() == Route::Dashboard {
            return;
        }
        if let Err(e) = self.dispatcher.router.navigate(&Route::Dashboard.url()) {
            self.last_error = Some(format!("Navigate: {}", e));
        }
    }

    pub fn handle_route_changed(&mut self, route: Route) {
        tracing::debug!(?route, "route changed");
        if route != *self.dispatcher.router.current() {
            self.content_scroll = 0;
        }
        self.pane = if route == Route::Dashboard {
            Pane::Sidebar
        } else {
            Pane::Content
        };
        self.dispatcher.route_changed(route);
    }

    /// Full web URL for `entry`, when a web base URL is configured.
    pub fn web_link(&self, entry: &DisplayThread) -> Option<String> {
        self.config
            .web_url()
            .map(|base| format!("{}{}", base, entry.url))
    }

    pub fn open_in_browser(&mut self) {
        let Some(entry) = self.selected_thread() else {
            return;
        };
        match self.web_link(entry) {
            Some(link) => open_url(&link),
            None => self.last_error = Some("Set api.web_url to open threads in a browser".to_string()),
        }
    }

    // --- Config ---

    pub fn handle_config_changed(&mut self) {
        let mut config = config::load_config(&self.config_path);
        config.apply_env();
        config.apply_overrides(self.overrides.api_url.clone(), None);
        tracing::info!(path = %self.config_path.display(), "config reloaded");

        let restart_health = config.health_settings_differ(&self.config);
        let rebuild = restart_health || config.fetch_concurrency() != self.config.fetch_concurrency()
            || config.placeholder_name() != self.config.placeholder_name();
        self.config = config;

        if restart_health {
            match HttpBackend::from_config(&self.config) {
                // Health stays resolved; the new monitor's first probe updates it.
                Ok(backend) => {
                    self.backend = Arc::new(backend);
                    self.start_health_monitor();
                }
                Err(e) => self.report_api_error(e),
            }
        }
        if rebuild {
            self.request_rebuild();
        }
    }

    fn report_api_error(&mut self, e: ApiError) {
        tracing::error!(error = %e, "backend setup failed");
        self.last_error = Some(format!("Config: {}", e));
    }

    // --- Tick ---

    pub fn tick(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }

    pub fn spinner(&self) -> &'static str {
        const FRAMES: [&str; 4] = ["|", "/", "-", "\\"];
        FRAMES[self.spinner_frame % FRAMES.len()]
    }
}

fn new_search_editor(query: String) -> TextArea<'static> {
    let mut editor = TextArea::new(vec![query]);
    editor.set_cursor_line_style(ratatui::style::Style::default());
    editor.set_placeholder_text("filter by project name");
    editor
}

/// Open a URL in the default browser.
pub fn open_url(url: &str) {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return;
    }
    let result = if cfg!(target_os = "windows") {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", url])
            .spawn()
    } else if cfg!(target_os = "macos") {
        std::process::Command::new("open").arg(url).spawn()
    } else {
        std::process::Command::new("xdg-open").arg(url).spawn()
    };
    if let Err(e) = result {
        tracing::warn!(%url, error = %e, "failed to open browser");
    }
}
