//! Wire protocol for the scale's UDP streaming dialect
//!
//! Two frame shapes travel over the link:
//!
//! ```text
//!   bridge ──────────────────────────────────────▶ scale
//!           STX  "00FFE101x0000"  ETX CR LF            control (17 bytes)
//!
//!   scale ───────────────────────────────────────▶ bridge
//!           short echo of the control frame            ack   (<= 40 bytes)
//!           lead-in | fixed ASCII fields | trailer      data  (>  40 bytes)
//! ```
//!
//! [`control`] builds the outbound frames, [`decoder`] turns inbound data
//! frames into [`WeightReading`]s, and [`constants`] pins down the shared
//! offsets and delimiters.

pub mod constants;
pub mod control;
pub mod decoder;
pub mod hexdump;

pub use control::ControlCommand;
pub use decoder::{decode, encode_data_frame, DecodeError, WeightReading};
pub use hexdump::hexdump;
