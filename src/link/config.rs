//! Link configuration

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use crate::protocol::constants::{DEFAULT_RECEIVE_PORT, DEFAULT_SEND_PORT};

/// Factory-default address of the scale's wifi interface
pub const DEFAULT_SCALE_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 168, 4, 1));

/// Scale link configuration options
///
/// The defaults match a factory-configured scale on its own access point;
/// tests shrink the timing knobs to keep runs fast.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Address of the scale
    pub scale_addr: IpAddr,

    /// UDP port on the scale that accepts control frames
    pub send_port: u16,

    /// Local UDP port weight frames arrive on (0 = ephemeral)
    pub receive_port: u16,

    /// Silence longer than this marks the scale disconnected
    pub stale_after: Duration,

    /// Delay between losing the scale and re-sending the start command
    pub reconnect_delay: Duration,

    /// Cadence of the staleness check
    pub health_interval: Duration,

    /// Log every raw frame as a hex dump (diagnostic only)
    pub trace_frames: bool,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            scale_addr: DEFAULT_SCALE_ADDR,
            send_port: DEFAULT_SEND_PORT,
            receive_port: DEFAULT_RECEIVE_PORT,
            stale_after: Duration::from_secs(15),
            reconnect_delay: Duration::from_secs(2),
            health_interval: Duration::from_secs(10),
            trace_frames: false,
        }
    }
}

impl LinkConfig {
    /// Create a new config for a scale at a custom address
    pub fn with_scale_addr(addr: IpAddr) -> Self {
        Self {
            scale_addr: addr,
            ..Default::default()
        }
    }

    /// Set the scale address
    pub fn scale_addr(mut self, addr: IpAddr) -> Self {
        self.scale_addr = addr;
        self
    }

    /// Set the control port on the scale
    pub fn send_port(mut self, port: u16) -> Self {
        self.send_port = port;
        self
    }

    /// Set the local receive port
    pub fn receive_port(mut self, port: u16) -> Self {
        self.receive_port = port;
        self
    }

    /// Set the staleness threshold
    pub fn stale_after(mut self, threshold: Duration) -> Self {
        self.stale_after = threshold;
        self
    }

    /// Set the reconnect delay
    pub fn reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Set the health check cadence
    pub fn health_interval(mut self, interval: Duration) -> Self {
        self.health_interval = interval;
        self
    }

    /// Log every raw frame as a hex dump
    pub fn trace_frames(mut self) -> Self {
        self.trace_frames = true;
        self
    }

    /// Destination for outbound control frames
    pub fn scale_endpoint(&self) -> SocketAddr {
        SocketAddr::new(self.scale_addr, self.send_port)
    }

    /// Local address the receive socket binds to
    pub fn bind_endpoint(&self) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), self.receive_port)
    }
}
