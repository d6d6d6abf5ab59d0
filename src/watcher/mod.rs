use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Result;
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};

use crate::config::DEBOUNCE_MS;
use crate::event::AppEvent;

/// Watch the config file, sending `ConfigChanged` when it is written.
/// The parent directory is watched so editors that replace the file are seen.
pub fn start_watcher(
    config_path: PathBuf,
    tx: mpsc::Sender<AppEvent>,
) -> Result<notify_debouncer_mini::Debouncer<notify::RecommendedWatcher>> {
    let watched = config_path.clone();

    let mut debouncer = new_debouncer(
        Duration::from_millis(DEBOUNCE_MS),
        move |res: Result<Vec<notify_debouncer_mini::DebouncedEvent>, notify::Error>| {
            let events = match res {
                Ok(events) => events,
                Err(e) => {
                    tracing::warn!(error = %e, "config watcher error");
                    return;
                }
            };

            if events
                .iter()
                .any(|event| event.kind == DebouncedEventKind::Any && is_config_file(&event.path, &watched))
            {
                let _ = tx.send(AppEvent::ConfigChanged);
            }
        },
    )?;

    let dir = match config_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if dir.exists() {
        debouncer
            .watcher()
            .watch(&dir, notify::RecursiveMode::NonRecursive)?;
        tracing::debug!(dir = %dir.display(), "watching config directory");
    }

    Ok(debouncer)
}

fn is_config_file(path: &Path, config_path: &Path) -> bool {
    match (path.file_name(), config_path.file_name()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
