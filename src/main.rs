mod app;
mod config;
mod data;
mod event;
mod logging;
mod model;
mod router;
mod ui;
mod watcher;

use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self as ct_event, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::app::{App, CliOverrides, Pane};
use crate::config::DashboardConfig;
use crate::data::api::{Backend, HttpBackend};
use crate::data::threads::{build_index, BuildOptions};
use crate::data::{health, search};
use crate::event::AppEvent;
use crate::model::health::ViewState;

#[derive(Parser)]
#[command(
    name = "threadboard",
    version,
    about = "Threadboard - terminal dashboard for agent project threads",
    override_help = HELP_TEXT,
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Backend API base URL (overrides config and THREADBOARD_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Config file (defaults to ./.threadboard.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Probe the health endpoint once; exit status 1 when unhealthy
    Check,
    /// Print the thread index and exit
    List {
        /// Only show threads whose project name contains this text
        #[arg(long, short)]
        query: Option<String>,
    },
}

const HELP_TEXT: &str = "\
Threadboard - terminal dashboard for agent project threads

USAGE:
  threadboard [OPTIONS]              Start the TUI dashboard
  threadboard check [OPTIONS]        Probe API health once
  threadboard list [OPTIONS] [-q Q]  Print all threads, newest first

MODES:
  (default)   Interactive TUI. Polls the API health endpoint and shows a
              maintenance screen while it is down; otherwise lists every
              thread across all projects, newest first.

  check       Prints 'healthy' or 'unhealthy'. Exit status 0 / 1.

  list        Builds the thread index once and prints one line per thread.

GLOBAL OPTIONS:
  --api-url <URL>     Backend API base URL [default: http://localhost:8000/api]
  --config <FILE>     Config file [default: ./.threadboard.toml]
  --log-file <FILE>   Append logs to FILE (level from RUST_LOG)
  -h, --help          Print this help
  -V, --version       Print version

ENVIRONMENT:
  THREADBOARD_API_URL     API base URL
  THREADBOARD_API_TOKEN   Bearer token sent with every request

TUI KEYBINDINGS:
  j/k  Up/Down       Navigate threads / scroll content
  h/l  Left/Right    Switch panes
  Enter              Open thread
  Esc / Backspace    Back to dashboard
  g / G              Jump to top / bottom
  /                  Filter threads by project name
  o                  Open thread in browser (needs api.web_url)
  r                  Refresh threads / re-check health
  ?                  Toggle help overlay
  q / Ctrl+C         Quit

EXAMPLES:
  threadboard --api-url https://agents.example.com/api
  threadboard list -q alpha
  threadboard check && echo up";

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cwd = std::env::current_dir()?;
    let config_path = config::config_path(cli.config.as_deref(), &cwd);
    let mut dashboard_config = config::load_config(&config_path);
    dashboard_config.apply_env();
    dashboard_config.apply_overrides(cli.api_url.clone(), None);

    let log_file = cli
        .log_file
        .clone()
        .or_else(|| dashboard_config.log_file().map(PathBuf::from));
    logging::init(log_file.as_deref())?;

    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::from_config(&dashboard_config)?);

    match cli.command {
        Some(Command::Check) => run_check(backend.as_ref(), &dashboard_config),
        Some(Command::List { query }) => {
            run_list(backend.as_ref(), &dashboard_config, query.as_deref())
        }
        None => run_tui(
            dashboard_config,
            config_path,
            CliOverrides {
                api_url: cli.api_url,
            },
            backend,
        ),
    }
}

fn run_check(backend: &dyn Backend, config: &DashboardConfig) -> Result<()> {
    if health::probe(backend, config.health_sentinel()) {
        println!("healthy");
        Ok(())
    } else {
        println!("unhealthy");
        std::process::exit(1);
    }
}

fn run_list(backend: &dyn Backend, config: &DashboardConfig, query: Option<&str>) -> Result<()> {
    let opts = BuildOptions {
        concurrency: config.fetch_concurrency(),
        placeholder_name: config.placeholder_name().to_string(),
    };
    let index = build_index(backend, &opts);
    if let Some(err) = index.error {
        anyhow::bail!("{}", err);
    }
    for (project_id, err) in &index.failed_projects {
        eprintln!("warning: threads for project {} not loaded: {}", project_id, err);
    }

    let threads = search::filter_threads(query.unwrap_or(""), &index.threads);
    for t in &threads {
        println!(
            "{}  {:<30}  {}",
            t.updated_at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M"),
            ui::util::truncate_chars(&t.project_name, 30),
            t.thread_id
        );
    }
    Ok(())
}

fn run_tui(
    config: DashboardConfig,
    config_path: PathBuf,
    overrides: CliOverrides,
    backend: Arc<dyn Backend>,
) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend_term = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_term)?;

    // Run app
    let result = run_app(&mut terminal, config, config_path, overrides, backend);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!(error = %e, "dashboard exited with error");
        eprintln!("Error: {}", e);
    }
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: DashboardConfig,
    config_path: PathBuf,
    overrides: CliOverrides,
    backend: Arc<dyn Backend>,
) -> Result<()> {
    let mut app = App::new(config, config_path, overrides, backend);

    // Create event channel before starting background work so it can report back
    let (tx, rx) = mpsc::channel::<AppEvent>();
    app.start(tx.clone());

    // Config hot reload; a missing directory just disables it
    let _debouncer = match watcher::start_watcher(app.config_path.clone(), tx) {
        Ok(d) => Some(d),
        Err(e) => {
            tracing::warn!(error = %e, "config watcher not started");
            None
        }
    };

    let mut last_tick = Instant::now();

    loop {
        // Draw only when dirty
        if app.dirty {
            terminal.draw(|f| ui::draw(f, &app))?;
            app.dirty = false;
        }

        let tick_rate = Duration::from_millis(app.config.tick_rate());
        let timeout = tick_rate.saturating_sub(last_tick.elapsed());

        // Check for crossterm events
        if ct_event::poll(timeout)? {
            if let Event::Key(key) = ct_event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(&mut app, key);
                    app.mark_dirty();
                }
            } else {
                app.mark_dirty();
            }
        }

        // Background results
        while let Ok(evt) = rx.try_recv() {
            match evt {
                AppEvent::HealthChecked { generation, healthy } => {
                    app.handle_health_event(generation, healthy)
                }
                AppEvent::IndexBuilt(index) => app.handle_index_built(index),
                AppEvent::RouteChanged(route) => app.handle_route_changed(route),
                AppEvent::ConfigChanged => app.handle_config_changed(),
            }
            app.mark_dirty();
        }

        // Tick
        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
            app.tick();
            // Spinners only move while something is pending
            if app.threads_loading
                || app.dispatcher.navigating().is_some()
                || app.view_state() == ViewState::Loading
            {
                app.mark_dirty();
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keybindings (always active)
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('h') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.show_help = !app.show_help;
            return;
        }
        KeyCode::Esc if app.show_help => {
            app.show_help = false;
            return;
        }
        _ => {}
    }

    // Loading and maintenance screens only take quit and re-check
    match app.view_state() {
        ViewState::Normal => {}
        ViewState::Loading | ViewState::Maintenance => {
            match key.code {
                KeyCode::Char('q') => app.should_quit = true,
                KeyCode::Char('r') => app.recheck_health(),
                _ => {}
            }
            return;
        }
    }

    // Search input mode — pass keys to the filter editor
    if app.search_mode {
        match key.code {
            KeyCode::Enter => app.finish_search(),
            KeyCode::Esc => app.cancel_search(),
            _ => app.search_input(key),
        }
        return;
    }

    if key.code == KeyCode::Char('?') {
        app.show_help = !app.show_help;
        return;
    }

    // Don't process other keys when help is showing
    if app.show_help {
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        // Navigation
        KeyCode::Char('j') | KeyCode::Down => app.navigate_down(),
        KeyCode::Char('k') | KeyCode::Up => app.navigate_up(),
        KeyCode::Char('h') | KeyCode::Left => app.navigate_left(),
        KeyCode::Char('l') | KeyCode::Right => app.navigate_right(),
        KeyCode::Enter => {
            if app.pane == Pane::Sidebar {
                app.select_item();
            }
        }
        KeyCode::Esc | KeyCode::Backspace => app.go_home(),

        // Jump
        KeyCode::Char('g') => app.jump_top(),
        KeyCode::Char('G') => app.jump_bottom(),

        KeyCode::Char('/') => app.start_search(),
        KeyCode::Char('o') => app.open_in_browser(),
        KeyCode::Char('r') => app.load_threads(),

        _ => {}
    }
}
