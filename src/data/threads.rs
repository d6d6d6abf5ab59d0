use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use chrono::{DateTime, Utc};

use crate::data::api::{ApiError, Backend};
use crate::event::AppEvent;
use crate::model::project::Project;
use crate::model::thread::{DisplayThread, Thread, ThreadIndex};

/// Options for one index build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Max projects fetched at once. 1 = strictly sequential.
    pub concurrency: usize,
    pub placeholder_name: String,
}

/// Fetch every project's threads and join them into a sorted display index.
///
/// Never fails: a failed project list yields an empty index with `error` set,
/// and a failed per-project fetch drops that project's threads and records it
/// in `failed_projects`.
pub fn build_index(backend: &dyn Backend, opts: &BuildOptions) -> ThreadIndex {
    build_index_at(backend, opts, Utc::now())
}

pub fn build_index_at(backend: &dyn Backend, opts: &BuildOptions, now: DateTime<Utc>) -> ThreadIndex {
    let projects = match backend.list_projects() {
        Ok(p) => p,
        Err(e) => {
            tracing::error!(error = %e, "failed to load projects");
            return ThreadIndex {
                error: Some(format!("Projects: {}", e)),
                ..Default::default()
            };
        }
    };

    if projects.is_empty() {
        tracing::info!("no projects; thread index is empty");
        return ThreadIndex::default();
    }

    let lookup: HashMap<&str, &Project> = projects.iter().map(|p| (p.id.as_str(), p)).collect();

    let results = fetch_all_threads(backend, &projects, opts.concurrency);

    let mut failed_projects = Vec::new();
    let mut all_threads: Vec<Thread> = Vec::new();
    for (project, result) in projects.iter().zip(results) {
        match result {
            Ok(threads) => all_threads.extend(threads),
            Err(e) => {
                tracing::warn!(project_id = %project.id, error = %e, "failed to load threads");
                failed_projects.push((project.id.clone(), e.to_string()));
            }
        }
    }

    let mut entries: Vec<DisplayThread> = all_threads
        .iter()
        .filter_map(|thread| match lookup.get(thread.project_id.as_str()) {
            Some(project) => Some(DisplayThread::new(
                thread,
                project,
                &opts.placeholder_name,
                now,
            )),
            None => {
                tracing::debug!(thread_id = %thread.id, project_id = %thread.project_id, "dropping orphaned thread");
                None
            }
        })
        .collect();

    // Stable: ties keep their fetch order.
    entries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    let thread_count = entries.len();
    tracing::info!(
        projects = projects.len(),
        threads = thread_count,
        failed = failed_projects.len(),
        "thread index built"
    );

    ThreadIndex {
        threads: entries,
        error: None,
        failed_projects,
    }
}

/// Fetch threads for each project, returning results in project order.
///
/// With `concurrency <= 1` projects are fetched one after another on the
/// calling thread; otherwise a pool of at most `concurrency` scoped workers
/// pulls projects off a shared cursor.
fn fetch_all_threads(
    backend: &dyn Backend,
    projects: &[Project],
    concurrency: usize,
) -> Vec<Result<Vec<Thread>, ApiError>> {
    if concurrency <= 1 || projects.len() <= 1 {
        return projects
            .iter()
            .map(|p| backend.list_threads(&p.id))
            .collect();
    }

    let slots: Vec<Mutex<Option<Result<Vec<Thread>, ApiError>>>> =
        projects.iter().map(|_| Mutex::new(None)).collect();
    let cursor = AtomicUsize::new(0);
    let workers = concurrency.min(projects.len());

    thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| loop {
                let i = cursor.fetch_add(1, Ordering::SeqCst);
                let Some(project) = projects.get(i) else {
                    break;
                };
                let result = backend.list_threads(&project.id);
                if let Ok(mut slot) = slots[i].lock() {
                    *slot = Some(result);
                }
            });
        }
    });

    slots
        .into_iter()
        .zip(projects)
        .map(|(slot, project)| {
            slot.into_inner().ok().flatten().unwrap_or_else(|| {
                Err(ApiError::Status {
                    url: format!("/projects/{}/threads", project.id),
                    status: 0,
                })
            })
        })
        .collect()
}

/// Build the index on a background thread and post `AppEvent::IndexBuilt`.
pub fn spawn_index_build(backend: Arc<dyn Backend>, opts: BuildOptions, tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let index = build_index(backend.as_ref(), &opts);
        let _ = tx.send(AppEvent::IndexBuilt(index));
    });
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::TimeZone;

    use super::*;
    use crate::data::api::fake::FakeBackend;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn project(id: &str, name: &str, updated: i64) -> Project {
        Project {
            id: id.to_string(),
            name: Some(name.to_string()),
            updated_at: Some(ts(updated)),
        }
    }

    fn thread(id: &str, project_id: &str, updated: Option<i64>) -> Thread {
        Thread {
            id: id.to_string(),
            project_id: project_id.to_string(),
            updated_at: updated.map(ts),
        }
    }

    fn opts(concurrency: usize) -> BuildOptions {
        BuildOptions {
            concurrency,
            placeholder_name: "Unnamed Project".to_string(),
        }
    }

    fn three_project_backend() -> FakeBackend {
        let mut backend = FakeBackend {
            projects: Some(vec![
                project("p1", "Project Alpha", 10),
                project("p2", "beta", 20),
                project("p3", "My proj Two", 30),
            ]),
            ..Default::default()
        };
        backend
            .threads
            .insert("p1".to_string(), vec![thread("a1", "p1", Some(100)), thread("a2", "p1", None)]);
        backend
            .threads
            .insert("p2".to_string(), vec![thread("b1", "p2", Some(300))]);
        backend
            .threads
            .insert("p3".to_string(), vec![thread("c1", "p3", Some(200))]);
        backend
    }

    fn ids(index: &ThreadIndex) -> Vec<&str> {
        index.threads.iter().map(|t| t.thread_id.as_str()).collect()
    }

    #[test]
    fn test_sorted_descending_by_timestamp() {
        let backend = three_project_backend();
        let index = build_index_at(&backend, &opts(1), ts(1_000));
        assert_eq!(ids(&index), vec!["b1", "c1", "a1", "a2"]);
        assert!(index.error.is_none());
        assert!(index.failed_projects.is_empty());
        for pair in index.threads.windows(2) {
            assert!(pair[0].updated_at >= pair[1].updated_at);
        }
    }

    #[test]
    fn test_ties_keep_fetch_order() {
        let mut backend = FakeBackend {
            projects: Some(vec![project("p1", "One", 0), project("p2", "Two", 0)]),
            ..Default::default()
        };
        backend.threads.insert(
            "p1".to_string(),
            vec![thread("x", "p1", Some(50)), thread("y", "p1", Some(50))],
        );
        backend
            .threads
            .insert("p2".to_string(), vec![thread("z", "p2", Some(50))]);
        let index = build_index_at(&backend, &opts(1), ts(1_000));
        assert_eq!(ids(&index), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_orphaned_threads_dropped() {
        let mut backend = FakeBackend {
            projects: Some(vec![project("p1", "One", 0)]),
            ..Default::default()
        };
        backend.threads.insert(
            "p1".to_string(),
            vec![thread("ok", "p1", Some(1)), thread("orphan", "missing", Some(2))],
        );
        let index = build_index_at(&backend, &opts(1), ts(1_000));
        assert_eq!(ids(&index), vec!["ok"]);
    }

    #[test]
    fn test_partial_failure_keeps_other_projects() {
        let mut backend = three_project_backend();
        backend.failing_projects = HashSet::from(["p2".to_string()]);
        let index = build_index_at(&backend, &opts(1), ts(1_000));
        assert_eq!(ids(&index), vec!["c1", "a1", "a2"]);
        assert_eq!(index.failed_projects.len(), 1);
        assert_eq!(index.failed_projects[0].0, "p2");
        assert!(index.error.is_none());
    }

    #[test]
    fn test_project_list_failure_yields_empty_index() {
        let backend = FakeBackend::default();
        let index = build_index_at(&backend, &opts(1), ts(1_000));
        assert!(index.threads.is_empty());
        assert!(index.error.is_some());
        assert!(backend.thread_calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_no_projects_skips_thread_fetches() {
        let backend = FakeBackend {
            projects: Some(Vec::new()),
            ..Default::default()
        };
        let index = build_index_at(&backend, &opts(4), ts(1_000));
        assert!(index.threads.is_empty());
        assert!(index.error.is_none());
        assert!(backend.thread_calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_sequential_fetch_order() {
        let backend = three_project_backend();
        build_index_at(&backend, &opts(1), ts(1_000));
        assert_eq!(*backend.thread_calls.lock().unwrap(), vec!["p1", "p2", "p3"]);
    }

    #[test]
    fn test_concurrent_fetch_matches_sequential() {
        let sequential = build_index_at(&three_project_backend(), &opts(1), ts(1_000));
        let mut failing = three_project_backend();
        failing.failing_projects = HashSet::from(["p1".to_string()]);

        let concurrent = build_index_at(&three_project_backend(), &opts(3), ts(1_000));
        assert_eq!(sequential.threads, concurrent.threads);

        let concurrent_failing = build_index_at(&failing, &opts(8), ts(1_000));
        assert_eq!(ids(&concurrent_failing), vec!["b1", "c1"]);
        assert_eq!(concurrent_failing.failed_projects[0].0, "p1");
    }

    #[test]
    fn test_spawn_publishes_once() {
        let backend: Arc<dyn Backend> = Arc::new(three_project_backend());
        let (tx, rx) = mpsc::channel();
        spawn_index_build(backend, opts(2), tx);
        match rx.recv_timeout(std::time::Duration::from_secs(5)).unwrap() {
            AppEvent::IndexBuilt(index) => assert_eq!(index.threads.len(), 4),
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(rx.recv_timeout(std::time::Duration::from_millis(50)).is_err());
    }
}
