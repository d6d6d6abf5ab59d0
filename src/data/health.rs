use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::data::api::Backend;
use crate::event::AppEvent;

/// Run one health probe. Any failure counts as unhealthy.
pub fn probe(backend: &dyn Backend, sentinel: &str) -> bool {
    match backend.check_health() {
        Ok(report) if report.status == sentinel => true,
        Ok(report) => {
            tracing::warn!(status = %report.status, expected = %sentinel, "health check returned unexpected status");
            false
        }
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            false
        }
    }
}

enum Control {
    ProbeNow,
    Stop,
}

/// Repeating health poller running on its own thread.
///
/// Probes immediately on start, then once per `interval`, posting
/// `AppEvent::HealthChecked` tagged with the monitor's `generation`.
/// Stopping (or dropping) the monitor interrupts the wait without joining:
/// a probe already in flight finishes on its own and its result carries
/// the old generation.
pub struct HealthMonitor {
    control_tx: mpsc::Sender<Control>,
}

impl HealthMonitor {
    pub fn start(
        backend: Arc<dyn Backend>,
        interval: Duration,
        sentinel: String,
        generation: u64,
        tx: mpsc::Sender<AppEvent>,
    ) -> Self {
        let (control_tx, control_rx) = mpsc::channel::<Control>();
        thread::spawn(move || {
            tracing::info!(interval_secs = interval.as_secs(), generation, "health monitor started");
            loop {
                let healthy = probe(backend.as_ref(), &sentinel);
                if tx
                    .send(AppEvent::HealthChecked { generation, healthy })
                    .is_err()
                {
                    break;
                }
                match control_rx.recv_timeout(interval) {
                    Ok(Control::ProbeNow) | Err(mpsc::RecvTimeoutError::Timeout) => continue,
                    // Stop requested, or the monitor was dropped.
                    Ok(Control::Stop) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
                }
            }
            tracing::info!(generation, "health monitor stopped");
        });
        HealthMonitor { control_tx }
    }

    /// Ask for an extra probe now instead of waiting out the interval.
    pub fn probe_now(&self) {
        let _ = self.control_tx.send(Control::ProbeNow);
    }

    pub fn stop(&self) {
        let _ = self.control_tx.send(Control::Stop);
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::time::Instant;

    use super::*;
    use crate::data::api::fake::FakeBackend;

    #[test]
    fn test_probe_matches_sentinel() {
        let backend = FakeBackend::with_health(vec![Ok("ok".to_string())]);
        assert!(probe(&backend, "ok"));
        assert!(!probe(&backend, "healthy"));
    }

    #[test]
    fn test_probe_failure_is_unhealthy() {
        let backend = FakeBackend::with_health(vec![Err(())]);
        assert!(!probe(&backend, "ok"));
    }

    #[test]
    fn test_monitor_probes_immediately_and_repeats() {
        let backend = Arc::new(FakeBackend::with_health(vec![
            Err(()),
            Ok("ok".to_string()),
        ]));
        let (tx, rx) = mpsc::channel();
        let _monitor = HealthMonitor::start(
            backend.clone(),
            Duration::from_millis(20),
            "ok".to_string(),
            7,
            tx,
        );

        let first = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(matches!(
            first,
            AppEvent::HealthChecked { generation: 7, healthy: false }
        ));
        // A failed tick does not stop the next one.
        let second = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(matches!(
            second,
            AppEvent::HealthChecked { generation: 7, healthy: true }
        ));
    }

    #[test]
    fn test_probe_now_skips_the_wait() {
        let backend = Arc::new(FakeBackend::with_health(vec![Ok("ok".to_string())]));
        let (tx, rx) = mpsc::channel();
        let monitor = HealthMonitor::start(
            backend.clone(),
            Duration::from_secs(3600),
            "ok".to_string(),
            1,
            tx,
        );
        rx.recv_timeout(Duration::from_secs(2)).unwrap();

        monitor.probe_now();
        let again = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(matches!(again, AppEvent::HealthChecked { healthy: true, .. }));
        assert_eq!(backend.health_calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_stop_cancels_long_interval() {
        let backend = Arc::new(FakeBackend::with_health(vec![Ok("ok".to_string())]));
        let (tx, rx) = mpsc::channel();
        let monitor = HealthMonitor::start(
            backend.clone(),
            Duration::from_secs(3600),
            "ok".to_string(),
            1,
            tx,
        );
        rx.recv_timeout(Duration::from_secs(2)).unwrap();

        let started = Instant::now();
        drop(monitor);
        // The thread wakes, exits and drops its sender well before the interval.
        assert!(matches!(
            rx.recv_timeout(Duration::from_secs(5)),
            Err(mpsc::RecvTimeoutError::Disconnected)
        ));
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(backend.health_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_stop_does_not_wait_for_slow_probe() {
        let backend = Arc::new(FakeBackend {
            health_delay: Duration::from_millis(500),
            ..FakeBackend::with_health(vec![Ok("ok".to_string())])
        });
        let (tx, rx) = mpsc::channel();
        let monitor = HealthMonitor::start(
            backend.clone(),
            Duration::from_secs(3600),
            "ok".to_string(),
            1,
            tx,
        );

        let started = Instant::now();
        monitor.stop();
        drop(monitor);
        assert!(started.elapsed() < Duration::from_millis(250));

        // The in-flight probe still reports, then the thread exits.
        let late = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(late, AppEvent::HealthChecked { generation: 1, .. }));
        assert!(matches!(
            rx.recv_timeout(Duration::from_secs(5)),
            Err(mpsc::RecvTimeoutError::Disconnected)
        ));
    }
}
