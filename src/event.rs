use crate::model::thread::ThreadIndex;
use crate::router::Route;

/// All events the app loop handles.
#[derive(Debug)]
pub enum AppEvent {
    /// A health probe resolved. `generation` identifies the monitor that ran it.
    HealthChecked { generation: u64, healthy: bool },
    /// Background thread index build completed.
    IndexBuilt(ThreadIndex),
    /// A route transition finished (any destination).
    RouteChanged(Route),
    /// The config file was created or modified.
    ConfigChanged,
}
