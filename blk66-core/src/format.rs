//! Number formatting, hex parsing, readout easing and text rendering of
//! blocks.

use crossterm::style::{Color, Stylize};

use crate::block::{BLOCK_BYTES, ByteTag, ProtocolBlock, SyncHeader};
use crate::error::Blk66Error;

/// `0x`-prefixed upper-case hex, zero-padded to `digits`.
pub fn hex(n: u64, digits: usize) -> String {
    format!("0x{n:0digits$X}")
}

/// Binary, zero-padded to `bits`.
pub fn bin(n: u64, bits: usize) -> String {
    format!("{n:0bits$b}")
}

/// Two upper-case hex digits, no prefix.
pub fn byte_hex(b: u8) -> String {
    format!("{b:02X}")
}

/// Number of differing bits between `a` and `b`.
pub fn hamming_distance(a: u64, b: u64) -> u32 {
    (a ^ b).count_ones()
}

/// Cubic ease-out: fast start, slow finish. `progress` is clamped to `0..=1`.
pub fn ease_out_cubic(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(3)
}

/// Value of a numeric readout animating from `from` to `to` at `progress`.
pub fn interpolate(from: f64, to: f64, progress: f64) -> f64 {
    from + (to - from) * ease_out_cubic(progress)
}

/// Parse one byte written as hex, with or without a `0x` prefix.
pub fn parse_hex_byte(s: &str) -> Result<u8, Blk66Error> {
    let t = s.trim();
    let digits = t
        .strip_prefix("0x")
        .or_else(|| t.strip_prefix("0X"))
        .unwrap_or(t);
    if digits.is_empty() || digits.len() > 2 {
        return Err(Blk66Error::InvalidByte(s.to_string()));
    }
    u8::from_str_radix(digits, 16).map_err(|_| Blk66Error::InvalidByte(s.to_string()))
}

/// Parse exactly eight hex bytes separated by commas and/or whitespace.
pub fn parse_data_bytes(s: &str) -> Result<[u8; BLOCK_BYTES], Blk66Error> {
    let parsed = s
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .map(parse_hex_byte)
        .collect::<Result<Vec<u8>, _>>()?;
    let actual = parsed.len();
    parsed
        .try_into()
        .map_err(|_| Blk66Error::InvalidBlockLength {
            expected: BLOCK_BYTES,
            actual,
        })
}

fn cell_text(byte: u8, tag: ByteTag) -> String {
    match tag {
        ByteTag::Placeholder => "XX".to_string(),
        _ => byte_hex(byte),
    }
}

/// Plain one-line rendering: `[10] 78 17 23 45 55 55 55 D5  Start (eligible) seq=0x12345`.
pub fn render_block(block: &ProtocolBlock) -> String {
    let cells: Vec<String> = block.cells().map(|(b, t)| cell_text(b, t)).collect();
    format!("[{}] {}  {}", block.sync(), cells.join(" "), block.label())
}

fn tag_color(tag: ByteTag) -> Color {
    match tag {
        ByteTag::Start | ByteTag::Term => Color::Magenta,
        ByteTag::Seq => Color::Yellow,
        ByteTag::Preamble | ByteTag::Sfd => Color::Blue,
        ByteTag::Data => Color::Green,
        ByteTag::Ctrl | ByteTag::OCode => Color::Red,
        ByteTag::Idle | ByteTag::Placeholder => Color::DarkGrey,
    }
}

/// ANSI-coloured rendering, one colour per [`ByteTag`].
pub fn render_block_styled(block: &ProtocolBlock) -> String {
    let sync_color = match block.sync() {
        SyncHeader::Data => Color::Green,
        SyncHeader::Control => Color::Cyan,
    };
    let cells: Vec<String> = block
        .cells()
        .map(|(b, t)| cell_text(b, t).with(tag_color(t)).to_string())
        .collect();
    format!(
        "[{}] {}  {}",
        block.sync().bits().with(sync_color).bold(),
        cells.join(" "),
        block.label().italic()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder;

    #[test]
    fn hex_pads_and_uppercases() {
        assert_eq!(hex(0x1e, 2), "0x1E");
        assert_eq!(hex(0x5, 4), "0x0005");
        assert_eq!(hex(0x12345, 2), "0x12345");
    }

    #[test]
    fn bin_pads() {
        assert_eq!(bin(0b101, 8), "00000101");
        assert_eq!(bin(2, 2), "10");
    }

    #[test]
    fn parse_hex_byte_accepts_prefix() {
        assert_eq!(parse_hex_byte("0x4B").unwrap(), 0x4B);
        assert_eq!(parse_hex_byte("d5").unwrap(), 0xD5);
        assert_eq!(parse_hex_byte(" 7 ").unwrap(), 0x07);
    }

    #[test]
    fn parse_hex_byte_rejects_garbage() {
        assert!(parse_hex_byte("XX").is_err());
        assert!(parse_hex_byte("0x").is_err());
        assert!(parse_hex_byte("100").is_err());
    }

    #[test]
    fn parse_data_bytes_counts() {
        let bytes = parse_data_bytes("DE,AD BE EF, 01 02 03 04").unwrap();
        assert_eq!(bytes, [0xDE, 0xAD, 0xBE, 0xEF, 0x01, 0x02, 0x03, 0x04]);

        let err = parse_data_bytes("01 02 03").unwrap_err();
        assert!(matches!(
            err,
            Blk66Error::InvalidBlockLength {
                expected: 8,
                actual: 3
            }
        ));
    }

    #[test]
    fn hamming_counts_differing_bits() {
        assert_eq!(hamming_distance(0, 0), 0);
        assert_eq!(hamming_distance(0b1011, 0b0001), 2);
        assert_eq!(hamming_distance(0x55, 0xAA), 8);
        assert_eq!(hamming_distance(0, u64::MAX), 64);
    }

    #[test]
    fn ease_out_cubic_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(0.5), 0.875);
        assert_eq!(ease_out_cubic(2.5), 1.0);
        assert_eq!(ease_out_cubic(-1.0), 0.0);
    }

    #[test]
    fn interpolate_settles_on_target() {
        assert_eq!(interpolate(12.0, 15.0, 0.0), 12.0);
        assert_eq!(interpolate(12.0, 15.0, 1.0), 15.0);
        assert_eq!(interpolate(12.0, 15.0, 3.0), 15.0);
        assert_eq!(interpolate(15.0, 11.0, 0.5), 11.5);
        let mid = interpolate(0.0, 100.0, 0.25);
        assert!(mid > 25.0 && mid < 100.0);
    }

    #[test]
    fn render_eligible_start() {
        let text = render_block(&encoder::eligible_start_block(0x12345));
        assert_eq!(text, "[10] 78 17 23 45 55 55 55 D5  Start (eligible) seq=0x12345");
    }

    #[test]
    fn render_placeholder_data() {
        let text = render_block(&encoder::data_block(None));
        assert_eq!(text, "[01] XX XX XX XX XX XX XX XX  Data Block");
    }

    #[test]
    fn styled_render_keeps_cells() {
        let text = render_block_styled(&encoder::idle_block());
        assert!(text.contains("1E"));
        assert!(text.contains("IDLE Block"));
    }
}
