//! Fan-out of link events to subscribers
//!
//! The session loop publishes into a single [`BroadcastSink`] and never
//! waits on consumers:
//!
//! ```text
//!                         +--------------+
//!    session loop ------> | BroadcastSink| ----> subscriber
//!    (one publisher)      |  (fan-out)   | ----> subscriber
//!                         +--------------+ ----> subscriber
//! ```
//!
//! [`ChannelSink`] is the production implementation; [`MemorySink`] captures
//! events for assertions in tests.

pub mod event;
pub mod sink;

pub use event::WeightEvent;
pub use sink::{BroadcastSink, ChannelSink, MemorySink};
