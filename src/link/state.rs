//! Connectivity state for one link session

use std::time::Instant;

/// Connection phase of the link
///
/// UDP gives no connection signal of its own, so this is always a judgment:
/// `Connected` means the scale answered recently, `Disconnected` means it
/// has not answered yet or went silent past the staleness threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

/// What the session knows about the scale at any moment
///
/// The session loop is the only writer. All methods take `now` as a
/// parameter instead of reading the clock, so transitions are deterministic
/// under test.
#[derive(Debug)]
pub struct SessionState {
    connection: ConnectionState,
    last_response_at: Instant,
    reconnect_at: Option<Instant>,
}

impl SessionState {
    /// Create the state for a session that just sent its first start command
    ///
    /// The scale counts as silent-but-expected until it answers, with the
    /// session start as the staleness baseline.
    pub fn new(started_at: Instant) -> Self {
        Self {
            connection: ConnectionState::Disconnected,
            last_response_at: started_at,
            reconnect_at: None,
        }
    }

    /// Record an inbound datagram
    ///
    /// Any traffic from the scale counts as proof of life, control acks
    /// included. Returns `true` when this datagram flipped the link to
    /// connected.
    pub fn on_response(&mut self, now: Instant) -> bool {
        self.last_response_at = now;
        self.reconnect_at = None;

        let was_connected = self.is_connected();
        self.connection = ConnectionState::Connected;
        !was_connected
    }

    /// Mark the scale lost
    ///
    /// Returns `true` when this call did the transition, `false` if it was
    /// already disconnected.
    pub fn mark_disconnected(&mut self) -> bool {
        let was_connected = self.is_connected();
        self.connection = ConnectionState::Disconnected;
        was_connected
    }

    /// Request a start-command retry at `at`
    ///
    /// A deadline already pending wins; retries are never postponed.
    pub fn schedule_reconnect(&mut self, at: Instant) {
        if self.reconnect_at.is_none() {
            self.reconnect_at = Some(at);
        }
    }

    /// Consume the pending reconnect deadline
    ///
    /// The session calls this when the retry timer fires, right before
    /// re-sending the start command.
    pub fn clear_reconnect(&mut self) {
        self.reconnect_at = None;
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn is_connected(&self) -> bool {
        self.connection == ConnectionState::Connected
    }

    /// Instant of the most recent inbound datagram (or session start)
    pub fn last_response_at(&self) -> Instant {
        self.last_response_at
    }

    pub fn reconnect_pending(&self) -> bool {
        self.reconnect_at.is_some()
    }

    pub fn reconnect_at(&self) -> Option<Instant> {
        self.reconnect_at
    }
}
