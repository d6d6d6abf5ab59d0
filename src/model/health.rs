/// Liveness of the backing API as seen by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HealthState {
    #[default]
    Checking,
    Healthy,
    Unhealthy,
}

impl HealthState {
    /// Apply a probe result. Once resolved, the state never returns to `Checking`.
    pub fn resolve(self, healthy: bool) -> HealthState {
        if healthy {
            HealthState::Healthy
        } else {
            HealthState::Unhealthy
        }
    }

    pub fn is_resolved(self) -> bool {
        self != HealthState::Checking
    }

    pub fn label(self) -> &'static str {
        match self {
            HealthState::Checking => "checking",
            HealthState::Healthy => "healthy",
            HealthState::Unhealthy => "unhealthy",
        }
    }
}

/// Top-level screen to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Maintenance,
    Normal,
}

/// Choose the screen for the current health signal.
///
/// `loading` is the "first probe still pending" flag; it only matters while
/// health is unresolved. An unhealthy signal always wins.
pub fn select_view(health: HealthState, loading: bool) -> ViewState {
    match health {
        HealthState::Unhealthy => ViewState::Maintenance,
        HealthState::Checking => ViewState::Loading,
        HealthState::Healthy if loading => ViewState::Loading,
        HealthState::Healthy => ViewState::Normal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_until_first_resolution() {
        assert_eq!(select_view(HealthState::Checking, true), ViewState::Loading);
        assert_eq!(select_view(HealthState::Checking, false), ViewState::Loading);
    }

    #[test]
    fn test_tracks_latest_resolution() {
        let mut state = HealthState::default();
        let probes = [true, false, false, true, false];
        for healthy in probes {
            state = state.resolve(healthy);
            let expected = if healthy {
                ViewState::Normal
            } else {
                ViewState::Maintenance
            };
            assert_eq!(select_view(state, false), expected);
            assert!(state.is_resolved());
        }
    }

    #[test]
    fn test_maintenance_overrides_loading() {
        assert_eq!(select_view(HealthState::Unhealthy, true), ViewState::Maintenance);
    }
}
