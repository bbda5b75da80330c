//! Wire-protocol constants for the scale's UDP streaming dialect

use std::ops::Range;

/// Start-of-text byte framing every control frame
pub const STX: u8 = 0x02;

/// End-of-text byte terminating a control frame payload
pub const ETX: u8 = 0x03;

/// Carriage return, second-to-last byte of a control frame
pub const CR: u8 = 0x0D;

/// Line feed, last byte of a control frame
pub const LF: u8 = 0x0A;

/// Total length of a control frame: STX + 13-byte command payload + ETX CR LF
pub const CONTROL_FRAME_LEN: usize = 17;

/// Length of the ASCII command payload inside a control frame
pub const COMMAND_PAYLOAD_LEN: usize = 13;

/// Inbound frames at or below this length are control acks, not weight data
pub const NON_DATA_FRAME_MAX_LEN: usize = 40;

/// Leading bytes stripped from an inbound data frame before field extraction
pub const FRAME_LEADING_BYTES: usize = 1;

/// Trailing bytes stripped from an inbound data frame before field extraction
pub const FRAME_TRAILING_BYTES: usize = 4;

/// Minimum stripped payload length carrying the full fixed field layout
pub const MIN_PAYLOAD_LEN: usize = 37;

/// Gross weight text, offsets relative to the stripped payload
pub const GROSS_FIELD: Range<usize> = 12..20;

/// Unit code text (2 characters, space padded)
pub const UNIT_FIELD: Range<usize> = 20..22;

/// Tare weight text
pub const TARE_FIELD: Range<usize> = 23..31;

/// UDP port the scale listens on for control frames
pub const DEFAULT_SEND_PORT: u16 = 4444;

/// Local UDP port the scale streams weight frames to
pub const DEFAULT_RECEIVE_PORT: u16 = 5555;
