//! Periodic staleness assessment

use std::time::{Duration, Instant};

use super::state::SessionState;

/// Outcome of one health check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthVerdict {
    /// The scale answered recently enough
    Healthy,
    /// This check crossed the staleness threshold; the session must
    /// publish the disconnect
    WentStale,
    /// The scale was already lost; a retry stays scheduled
    StillDown,
}

/// Decides when a silent scale counts as gone and when to retry it
///
/// The monitor never touches the socket or the sink; it only inspects and
/// updates [`SessionState`], leaving the observable side effects to the
/// session loop.
#[derive(Debug, Clone, Copy)]
pub struct HealthMonitor {
    stale_after: Duration,
    reconnect_delay: Duration,
}

impl HealthMonitor {
    pub fn new(stale_after: Duration, reconnect_delay: Duration) -> Self {
        Self {
            stale_after,
            reconnect_delay,
        }
    }

    /// Run one check against the session state
    ///
    /// A connected scale that has been silent past the threshold is marked
    /// disconnected and gets a retry scheduled `reconnect_delay` from now.
    /// A scale that is already down keeps a retry scheduled, so a link that
    /// never answers is re-prodded on every check rather than given up on.
    pub fn check(&self, state: &mut SessionState, now: Instant) -> HealthVerdict {
        if !state.is_connected() {
            state.schedule_reconnect(now + self.reconnect_delay);
            return HealthVerdict::StillDown;
        }

        let silence = now.duration_since(state.last_response_at());
        if silence <= self.stale_after {
            return HealthVerdict::Healthy;
        }

        state.mark_disconnected();
        state.schedule_reconnect(now + self.reconnect_delay);
        HealthVerdict::WentStale
    }

    pub fn stale_after(&self) -> Duration {
        self.stale_after
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor() -> HealthMonitor {
        HealthMonitor::new(Duration::from_secs(15), Duration::from_secs(2))
    }

    #[test]
    fn test_recent_response_is_healthy() {
        let t0 = Instant::now();
        let mut state = SessionState::new(t0);
        state.on_response(t0);

        let verdict = monitor().check(&mut state, t0 + Duration::from_secs(5));

        assert_eq!(verdict, HealthVerdict::Healthy);
        assert!(state.is_connected());
        assert!(!state.reconnect_pending());
    }

    #[test]
    fn test_silence_at_threshold_is_still_healthy() {
        let t0 = Instant::now();
        let mut state = SessionState::new(t0);
        state.on_response(t0);

        let verdict = monitor().check(&mut state, t0 + Duration::from_secs(15));

        assert_eq!(verdict, HealthVerdict::Healthy);
    }

    #[test]
    fn test_silence_past_threshold_goes_stale() {
        let t0 = Instant::now();
        let mut state = SessionState::new(t0);
        state.on_response(t0);

        let now = t0 + Duration::from_secs(16);
        let verdict = monitor().check(&mut state, now);

        assert_eq!(verdict, HealthVerdict::WentStale);
        assert!(!state.is_connected());
        assert_eq!(state.reconnect_at(), Some(now + Duration::from_secs(2)));
    }

    #[test]
    fn test_stale_is_reported_once() {
        let t0 = Instant::now();
        let mut state = SessionState::new(t0);
        state.on_response(t0);

        let first = monitor().check(&mut state, t0 + Duration::from_secs(16));
        let second = monitor().check(&mut state, t0 + Duration::from_secs(26));

        assert_eq!(first, HealthVerdict::WentStale);
        assert_eq!(second, HealthVerdict::StillDown);
    }

    #[test]
    fn test_down_link_keeps_a_retry_scheduled() {
        let t0 = Instant::now();
        let mut state = SessionState::new(t0);

        // Never answered since session start: first check schedules a retry.
        let verdict = monitor().check(&mut state, t0 + Duration::from_secs(10));

        assert_eq!(verdict, HealthVerdict::StillDown);
        assert!(state.reconnect_pending());

        // The retry fired and the scale stayed silent; the next check
        // schedules another one.
        state.clear_reconnect();
        monitor().check(&mut state, t0 + Duration::from_secs(20));
        assert!(state.reconnect_pending());
    }

    #[test]
    fn test_pending_retry_is_not_postponed() {
        let t0 = Instant::now();
        let mut state = SessionState::new(t0);
        state.schedule_reconnect(t0 + Duration::from_secs(2));

        monitor().check(&mut state, t0 + Duration::from_secs(10));

        assert_eq!(state.reconnect_at(), Some(t0 + Duration::from_secs(2)));
    }
}
