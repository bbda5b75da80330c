//! Bridge between UDP streaming weighing scales and live subscribers
//!
//! A bench scale with a wifi module speaks a tiny UDP dialect: poke it with
//! a start command and it streams fixed-layout ASCII weight frames until
//! told to stop. This crate owns that conversation end to end and turns it
//! into a clean stream of [`WeightEvent`]s plus an always-available
//! last-value [`Snapshot`]:
//!
//! ```text
//!               start/stop                        events
//!   scale <------------------- ScaleLink -------------------> subscribers
//!   (UDP) ------------------->           ------------------->   pollers
//!              weight frames               cached snapshot
//! ```
//!
//! The link survives the scale disappearing: a health monitor notices the
//! silence, reports the disconnect once, and keeps re-sending the start
//! command until the scale answers again.
//!
//! # Example
//!
//! ```no_run
//! use scalelink::{ChannelSink, LinkConfig, ScaleLink};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sink = ChannelSink::default();
//!     let mut events = sink.subscribe();
//!
//!     let link = ScaleLink::start(LinkConfig::default(), sink.clone()).await?;
//!
//!     while let Ok(event) = events.recv().await {
//!         println!("{}", event);
//!     }
//!
//!     link.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod broadcast;
pub mod error;
pub mod link;
pub mod protocol;
pub mod stats;

pub use broadcast::{BroadcastSink, ChannelSink, MemorySink, WeightEvent};
pub use error::{LinkError, Result};
pub use link::{LinkConfig, ScaleLink, Snapshot};
pub use protocol::{DecodeError, WeightReading};
pub use stats::{LinkStats, StatsSnapshot};
