//! Hex rendering of raw frames for trace-level logging

/// Render bytes as rows of 16 with an offset column and an ASCII gutter
///
/// ```text
/// 0000  02 30 30 46 46 45 31 30 31 31 30 30 30 30 03 0d  .00FFE10110000..
/// 0010  0a                                               .
/// ```
pub fn hexdump(bytes: &[u8]) -> String {
    let mut out = String::new();
    for (row, chunk) in bytes.chunks(16).enumerate() {
        if row > 0 {
            out.push('\n');
        }
        out.push_str(&format!("{:04x}  ", row * 16));
        for i in 0..16 {
            match chunk.get(i) {
                Some(b) => out.push_str(&format!("{:02x} ", b)),
                None => out.push_str("   "),
            }
        }
        out.push(' ');
        for &b in chunk {
            out.push(if (0x20..0x7f).contains(&b) { b as char } else { '.' });
        }
    }
    out
}
