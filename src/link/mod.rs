//! Link lifecycle: session loop, health monitoring, and cached state
//!
//! ```text
//!   +-----------+     datagrams      +--------------+     events
//!   | UDP scale | -----------------> | session loop | --------------> sink
//!   |           | <----------------- |              | --+
//!   +-----------+   start/stop       +--------------+   |   snapshots
//!                                      ^         ^      +-----------> cache
//!                                      |         |
//!                               health ticks   retry timer
//! ```
//!
//! [`session`] owns the socket and runs the loop, [`monitor`] decides when
//! silence means the scale is gone, [`state`] tracks connectivity edges,
//! [`cache`] serves the last value to API callers, and [`config`] carries
//! the knobs for all of it.

pub mod cache;
pub mod config;
pub mod monitor;
pub mod session;
pub mod state;

pub use cache::{ReadingCache, Snapshot};
pub use config::{LinkConfig, DEFAULT_SCALE_ADDR};
pub use monitor::{HealthMonitor, HealthVerdict};
pub use session::ScaleLink;
pub use state::{ConnectionState, SessionState};
