//! Decoding of streamed weight frames
//!
//! Data frames are fixed-layout ASCII wrapped in a one-byte lead-in and a
//! four-byte trailer. All field offsets below are relative to the stripped
//! payload (lead-in and trailer removed):
//!
//! ```text
//! offset:  0 .............. 12 ........ 20 .... 22    23 ........ 31 ......
//!          +----------------+-----------+-------+-----+------------+------+
//!          | device header  | gross (8) | unit  | pad | tare (8)   | rest |
//!          +----------------+-----------+-------+-----+------------+------+
//! ```
//!
//! Gross and tare are right-aligned decimal text ("  12.345"), the unit is a
//! two-character code padded with spaces ("kg", "g "). Anything at or below
//! 40 bytes on the wire is a control acknowledgement, not weight data, and
//! decodes to `None`.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::constants::{
    CR, ETX, FRAME_LEADING_BYTES, FRAME_TRAILING_BYTES, GROSS_FIELD, LF, MIN_PAYLOAD_LEN,
    NON_DATA_FRAME_MAX_LEN, STX, TARE_FIELD, UNIT_FIELD,
};

/// Error raised when a frame is long enough to be weight data but does not
/// carry the expected layout
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The stripped payload is too short to hold the fixed field layout
    #[error("payload too short: {len} bytes, need {MIN_PAYLOAD_LEN}")]
    TooShort { len: usize },

    /// A numeric field did not parse as a decimal number
    #[error("field {field} is not a number: {text:?}")]
    InvalidNumber { field: &'static str, text: String },
}

/// A single decoded measurement from the scale
#[derive(Debug, Clone, PartialEq)]
pub struct WeightReading {
    /// Gross weight as shown on the scale display
    pub gross: f64,
    /// Tare currently subtracted by the scale
    pub tare: f64,
    /// Net weight, always `gross - tare`
    pub net: f64,
    /// Unit code with padding removed, e.g. "kg" or "g"
    pub unit: String,
    /// Wall-clock time at which the frame was decoded
    pub captured_at: SystemTime,
}

impl WeightReading {
    fn new(gross: f64, tare: f64, unit: String) -> Self {
        Self {
            gross,
            tare,
            net: gross - tare,
            unit,
            captured_at: SystemTime::now(),
        }
    }

    /// Capture time as milliseconds since the Unix epoch
    pub fn timestamp_ms(&self) -> u64 {
        self.captured_at
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_millis() as u64
    }
}

impl std::fmt::Display for WeightReading {
    /// Format the gross value the way the scale's own display shows it
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3} {}", self.gross, self.unit)
    }
}

/// Decode one inbound datagram
///
/// Returns `Ok(None)` for control acknowledgements (40 bytes or less),
/// `Ok(Some(reading))` for a well-formed data frame, and an error for a
/// data-sized frame that does not match the layout.
pub fn decode(frame: &[u8]) -> Result<Option<WeightReading>, DecodeError> {
    if frame.len() <= NON_DATA_FRAME_MAX_LEN {
        return Ok(None);
    }

    let payload = &frame[FRAME_LEADING_BYTES..frame.len() - FRAME_TRAILING_BYTES];
    if payload.len() < MIN_PAYLOAD_LEN {
        return Err(DecodeError::TooShort { len: payload.len() });
    }

    let gross = parse_weight(&payload[GROSS_FIELD], "gross")?;
    let tare = parse_weight(&payload[TARE_FIELD], "tare")?;
    let unit = String::from_utf8_lossy(&payload[UNIT_FIELD]).trim().to_string();

    Ok(Some(WeightReading::new(gross, tare, unit)))
}

/// Build the wire form of a data frame
///
/// The bridge never sends these itself; the encoder backs the scale
/// simulator and the tests. Values wider than their field keep the
/// rightmost characters, matching the fixed width of the scale display.
pub fn encode_data_frame(gross: f64, unit: &str, tare: f64) -> Vec<u8> {
    let mut payload = vec![b' '; MIN_PAYLOAD_LEN];
    payload[..12].copy_from_slice(b"000000000000");
    write_right_aligned(&mut payload[GROSS_FIELD], &format!("{:.3}", gross));
    write_left_aligned(&mut payload[UNIT_FIELD], unit);
    write_right_aligned(&mut payload[TARE_FIELD], &format!("{:.3}", tare));

    let mut frame = Vec::with_capacity(FRAME_LEADING_BYTES + MIN_PAYLOAD_LEN + FRAME_TRAILING_BYTES);
    frame.push(STX);
    frame.extend_from_slice(&payload);
    frame.extend_from_slice(&[b'0', ETX, CR, LF]);
    frame
}

fn write_right_aligned(field: &mut [u8], text: &str) {
    let bytes = text.as_bytes();
    let n = bytes.len().min(field.len());
    let start = field.len() - n;
    field[start..].copy_from_slice(&bytes[bytes.len() - n..]);
}

fn write_left_aligned(field: &mut [u8], text: &str) {
    let bytes = text.as_bytes();
    let n = bytes.len().min(field.len());
    field[..n].copy_from_slice(&bytes[..n]);
}

fn parse_weight(raw: &[u8], field: &'static str) -> Result<f64, DecodeError> {
    let text = std::str::from_utf8(raw).map_err(|_| DecodeError::InvalidNumber {
        field,
        text: String::from_utf8_lossy(raw).into_owned(),
    })?;

    text.trim().parse::<f64>().map_err(|_| DecodeError::InvalidNumber {
        field,
        text: text.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a 42-byte data frame around the given field texts
    fn build_frame(gross: &str, unit: &str, tare: &str) -> Vec<u8> {
        let mut frame = Vec::new();
        frame.push(0x02);
        frame.extend_from_slice(b"000000000000");
        frame.extend_from_slice(format!("{:>8}", gross).as_bytes());
        frame.extend_from_slice(format!("{:<2}", unit).as_bytes());
        frame.push(b' ');
        frame.extend_from_slice(format!("{:>8}", tare).as_bytes());
        frame.extend_from_slice(b"      ");
        frame.extend_from_slice(&[b'0', 0x03, 0x0D, 0x0A]);
        frame
    }

    #[test]
    fn test_decode_typical_frame() {
        let frame = build_frame("12.345", "kg", "1.000");
        assert_eq!(frame.len(), 42);

        let reading = decode(&frame).unwrap().unwrap();
        assert_eq!(reading.gross, 12.345);
        assert_eq!(reading.tare, 1.000);
        assert!((reading.net - 11.345).abs() < 1e-9);
        assert_eq!(reading.unit, "kg");
    }

    #[test]
    fn test_decode_literal_frame() {
        let frame = b"\x02000000000000  12.345kg    1.000      0\x03\r\n";
        assert_eq!(frame.len(), 42);

        let reading = decode(frame).unwrap().unwrap();
        assert_eq!(reading.gross, 12.345);
        assert_eq!(reading.unit, "kg");
    }

    #[test]
    fn test_short_frames_are_not_data() {
        assert_eq!(decode(&[]).unwrap(), None);
        assert_eq!(decode(&[0x02, 0x03]).unwrap(), None);

        // A control acknowledgement echoed by the scale.
        let ack = crate::protocol::ControlCommand::StartStream.encode();
        assert_eq!(decode(&ack).unwrap(), None);

        // Exactly at the threshold still counts as non-data.
        assert_eq!(decode(&[b'x'; 40]).unwrap(), None);
    }

    #[test]
    fn test_truncated_payload_is_too_short() {
        let frame = [b'x'; 41];
        assert_eq!(decode(&frame), Err(DecodeError::TooShort { len: 36 }));
    }

    #[test]
    fn test_invalid_gross_text() {
        let frame = build_frame("1x.345", "kg", "1.000");
        assert_eq!(
            decode(&frame),
            Err(DecodeError::InvalidNumber {
                field: "gross",
                text: "1x.345".to_string(),
            })
        );
    }

    #[test]
    fn test_invalid_tare_text() {
        let frame = build_frame("12.345", "kg", "");
        assert_eq!(
            decode(&frame),
            Err(DecodeError::InvalidNumber {
                field: "tare",
                text: String::new(),
            })
        );
    }

    #[test]
    fn test_non_ascii_gross_rejected() {
        let mut frame = build_frame("12.345", "kg", "1.000");
        frame[13 + 3] = 0xFF;

        match decode(&frame) {
            Err(DecodeError::InvalidNumber { field: "gross", .. }) => {}
            other => panic!("expected gross error, got {:?}", other),
        }
    }

    #[test]
    fn test_unit_padding_is_trimmed() {
        let frame = build_frame("100.0", "g", "0.0");
        let reading = decode(&frame).unwrap().unwrap();
        assert_eq!(reading.unit, "g");
    }

    #[test]
    fn test_negative_net_weight() {
        let frame = build_frame("-0.500", "kg", "0.000");
        let reading = decode(&frame).unwrap().unwrap();
        assert!((reading.net + 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_display_shows_gross_value() {
        let frame = build_frame("12.345", "kg", "1.000");
        let reading = decode(&frame).unwrap().unwrap();
        assert_eq!(reading.to_string(), "12.345 kg");
    }

    #[test]
    fn test_encoded_frame_decodes() {
        let frame = encode_data_frame(0.162, "kg", 0.0);
        assert_eq!(frame.len(), 42);

        let reading = decode(&frame).unwrap().unwrap();
        assert_eq!(reading.gross, 0.162);
        assert_eq!(reading.tare, 0.0);
        assert_eq!(reading.unit, "kg");
        assert_eq!(reading.to_string(), "0.162 kg");
    }

    #[test]
    fn test_encoder_truncates_overwide_values() {
        // "123456.789" is ten characters; the field keeps the rightmost eight.
        let frame = encode_data_frame(123456.789, "kg", 0.0);
        let reading = decode(&frame).unwrap().unwrap();
        assert_eq!(reading.gross, 3456.789);
    }

    #[test]
    fn test_timestamp_is_current() {
        let frame = build_frame("0.162", "kg", "0.000");
        let reading = decode(&frame).unwrap().unwrap();

        // Well past 2020-01-01 in epoch milliseconds.
        assert!(reading.timestamp_ms() > 1_577_836_800_000);
    }
}
