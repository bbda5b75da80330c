//! Control frames sent to the scale
//!
//! The scale is commanded through a fixed 17-byte vocabulary:
//!
//! ```text
//! +------+---------------------------+------+------+------+
//! | STX  | command payload (13 ch)   | ETX  | CR   | LF   |
//! | 0x02 | "00FFE101" 'x' "0000"     | 0x03 | 0x0D | 0x0A |
//! +------+---------------------------+------+------+------+
//! ```
//!
//! The streaming-enable digit `x` selects the command: `'1'` asks the scale
//! to start autonomously emitting weight frames, `'0'` stops the stream.
//! Only these two commands have been observed; the encoder is table-driven
//! over [`ControlCommand`] so further commands slot in without touching the
//! session code.

use super::constants::{COMMAND_PAYLOAD_LEN, CONTROL_FRAME_LEN, CR, ETX, LF, STX};

/// Command payload with the streaming-enable digit set
const START_PAYLOAD: [u8; COMMAND_PAYLOAD_LEN] = *b"00FFE10110000";

/// Index of the streaming-enable digit within the command payload
const STREAM_ENABLE_IDX: usize = 8;

/// A command the session can issue to the scale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Put the scale into streaming mode; it then emits weight frames on
    /// its own until told otherwise
    StartStream,
    /// Take the scale out of streaming mode
    StopStream,
}

impl ControlCommand {
    /// The ASCII command payload for this command
    fn payload(&self) -> [u8; COMMAND_PAYLOAD_LEN] {
        let mut payload = START_PAYLOAD;
        if *self == ControlCommand::StopStream {
            payload[STREAM_ENABLE_IDX] = b'0';
        }
        payload
    }

    /// Encode the full control frame ready to be sent on the wire
    pub fn encode(&self) -> [u8; CONTROL_FRAME_LEN] {
        let mut frame = [0u8; CONTROL_FRAME_LEN];
        frame[0] = STX;
        frame[1..1 + COMMAND_PAYLOAD_LEN].copy_from_slice(&self.payload());
        frame[CONTROL_FRAME_LEN - 3] = ETX;
        frame[CONTROL_FRAME_LEN - 2] = CR;
        frame[CONTROL_FRAME_LEN - 1] = LF;
        frame
    }
}

impl std::fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlCommand::StartStream => write!(f, "start-stream"),
            ControlCommand::StopStream => write!(f, "stop-stream"),
        }
    }
}
