//! Counters kept by a running link

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters, updated by the session loop and read from anywhere
#[derive(Debug, Default)]
pub struct LinkStats {
    frames_received: AtomicU64,
    bytes_received: AtomicU64,
    readings_decoded: AtomicU64,
    frames_ignored: AtomicU64,
    decode_failures: AtomicU64,
    control_sends: AtomicU64,
    send_failures: AtomicU64,
    disconnects: AtomicU64,
    reconnect_attempts: AtomicU64,
}

impl LinkStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_frame_received(&self, bytes: usize) {
        self.frames_received.fetch_add(1, Ordering::Relaxed);
        self.bytes_received.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn record_reading_decoded(&self) {
        self.readings_decoded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_frame_ignored(&self) {
        self.frames_ignored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_decode_failure(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_control_send(&self) {
        self.control_sends.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_send_failure(&self) {
        self.send_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_disconnect(&self) {
        self.disconnects.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_reconnect_attempt(&self) {
        self.reconnect_attempts.fetch_add(1, Ordering::Relaxed);
    }

    /// Copy all counters at once
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            frames_received: self.frames_received.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            readings_decoded: self.readings_decoded.load(Ordering::Relaxed),
            frames_ignored: self.frames_ignored.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            control_sends: self.control_sends.load(Ordering::Relaxed),
            send_failures: self.send_failures.load(Ordering::Relaxed),
            disconnects: self.disconnects.load(Ordering::Relaxed),
            reconnect_attempts: self.reconnect_attempts.load(Ordering::Relaxed),
        }
    }
}

/// Plain copy of the counters at one moment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Datagrams received on the link socket
    pub frames_received: u64,
    /// Payload bytes received on the link socket
    pub bytes_received: u64,
    /// Frames that decoded into a weight reading
    pub readings_decoded: u64,
    /// Short non-data frames (control acks) that were skipped
    pub frames_ignored: u64,
    /// Data-sized frames that failed to decode
    pub decode_failures: u64,
    /// Control frames handed to the socket
    pub control_sends: u64,
    /// Control frames the socket refused
    pub send_failures: u64,
    /// Connected-to-disconnected transitions
    pub disconnects: u64,
    /// Start commands re-sent after losing the scale
    pub reconnect_attempts: u64,
}
