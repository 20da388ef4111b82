//! Block encoders.
//!
//! Each function lays protocol fields out into a fixed 8-byte
//! [`ProtocolBlock`]. Nothing here fails: sequence numbers are masked to
//! 20 bits and an out-of-range /T/ position falls back to
//! [`TERMINATE_FALLBACK`].
//!
//! ```text
//! eligible start   78 | s19..16 7 | s15..8 | s7..0 | 55 55 55 | D5
//! CtlOS            4B | kind | s19..12 | s11..4 | s3..0 6 | init15..8 | init7..0 | 00
//! ```

use crate::block::{
    BLOCK_BYTES, ByteTag, CTLOS_CONTROL, CTLOS_OCODE, ELIGIBLE_START_NIBBLE, IDLE_CONTROL,
    PREAMBLE, ProtocolBlock, SEQ_MASK, SFD, START_BLOCK_TYPE, SyncHeader, TERMINATE_FALLBACK,
    TERMINATE_TYPES,
};
use crate::message::ControlKind;

const START_TAGS_ELIGIBLE: [ByteTag; BLOCK_BYTES] = [
    ByteTag::Start,
    ByteTag::Seq,
    ByteTag::Seq,
    ByteTag::Seq,
    ByteTag::Preamble,
    ByteTag::Preamble,
    ByteTag::Preamble,
    ByteTag::Sfd,
];

const START_TAGS_INELIGIBLE: [ByteTag; BLOCK_BYTES] = [
    ByteTag::Start,
    ByteTag::Preamble,
    ByteTag::Preamble,
    ByteTag::Preamble,
    ByteTag::Preamble,
    ByteTag::Preamble,
    ByteTag::Preamble,
    ByteTag::Sfd,
];

const CTLOS_TAGS: [ByteTag; BLOCK_BYTES] = [
    ByteTag::Ctrl,
    ByteTag::OCode,
    ByteTag::Seq,
    ByteTag::Seq,
    ByteTag::OCode,
    ByteTag::Data,
    ByteTag::Data,
    ByteTag::Idle,
];

/// Leading tag followed by seven idle tags.
const fn lead_then_idle(lead: ByteTag) -> [ByteTag; BLOCK_BYTES] {
    let mut tags = [ByteTag::Idle; BLOCK_BYTES];
    tags[0] = lead;
    tags
}

/// Start block carrying an LLR frame sequence number.
pub fn eligible_start_block(frame_seq: u32) -> ProtocolBlock {
    let seq = frame_seq & SEQ_MASK;
    let d1 = (((seq >> 16) & 0xF) as u8) << 4 | ELIGIBLE_START_NIBBLE;
    let d2 = ((seq >> 8) & 0xFF) as u8;
    let d3 = (seq & 0xFF) as u8;

    ProtocolBlock::new(
        SyncHeader::Control,
        Some(START_BLOCK_TYPE),
        [START_BLOCK_TYPE, d1, d2, d3, PREAMBLE, PREAMBLE, PREAMBLE, SFD],
        START_TAGS_ELIGIBLE,
        format!("Start (eligible) seq=0x{seq:X}"),
    )
}

/// Start block for a frame that is not covered by LLR.
pub fn ineligible_start_block() -> ProtocolBlock {
    ProtocolBlock::new(
        SyncHeader::Control,
        Some(START_BLOCK_TYPE),
        [START_BLOCK_TYPE, PREAMBLE, PREAMBLE, PREAMBLE, PREAMBLE, PREAMBLE, PREAMBLE, SFD],
        START_TAGS_INELIGIBLE,
        "Start (ineligible)",
    )
}

/// Data block wrapping `bytes` unchanged, or eight placeholders.
pub fn data_block(bytes: Option<[u8; BLOCK_BYTES]>) -> ProtocolBlock {
    let (bytes, tags) = match bytes {
        Some(bytes) => (bytes, [ByteTag::Data; BLOCK_BYTES]),
        None => ([0; BLOCK_BYTES], [ByteTag::Placeholder; BLOCK_BYTES]),
    };
    ProtocolBlock::new(SyncHeader::Data, None, bytes, tags, "Data Block")
}

pub fn idle_block() -> ProtocolBlock {
    let mut bytes = [0; BLOCK_BYTES];
    bytes[0] = IDLE_CONTROL;
    ProtocolBlock::new(
        SyncHeader::Control,
        None,
        bytes,
        lead_then_idle(ByteTag::Ctrl),
        "IDLE Block",
    )
}

/// Terminate block for a frame whose last byte lands at `position`.
///
/// Positions outside `0..8`, negative ones included, use `/T0/`.
pub fn terminate_block(position: i64) -> ProtocolBlock {
    let mut bytes = [0; BLOCK_BYTES];
    bytes[0] = usize::try_from(position)
        .ok()
        .and_then(|p| TERMINATE_TYPES.get(p).copied())
        .unwrap_or(TERMINATE_FALLBACK);
    ProtocolBlock::new(
        SyncHeader::Control,
        None,
        bytes,
        lead_then_idle(ByteTag::Term),
        format!("Terminate (pos={position})"),
    )
}

/// LLR control ordered set block.
pub fn control_block(kind: ControlKind, seq: u32, init_payload: u16) -> ProtocolBlock {
    let s = seq & SEQ_MASK;
    let d2 = ((s >> 12) & 0xFF) as u8;
    let d3 = ((s >> 4) & 0xFF) as u8;
    let d4 = ((s & 0xF) as u8) << 4 | CTLOS_OCODE;
    let [d5, d6] = init_payload.to_be_bytes();

    ProtocolBlock::new(
        SyncHeader::Control,
        None,
        [CTLOS_CONTROL, kind as u8, d2, d3, d4, d5, d6, 0x00],
        CTLOS_TAGS,
        format!("CtlOS {} seq=0x{s:x}", kind.name()),
    )
}

/// [`control_block`] for callers holding a wider init value; keeps the low 16 bits.
pub fn control_block_masked(kind: ControlKind, seq: u32, init_payload: u32) -> ProtocolBlock {
    control_block(kind, seq, (init_payload & 0xFFFF) as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eligible_start_packs_sequence() {
        let block = eligible_start_block(0x12345);
        assert_eq!(
            block.bytes(),
            &[0x78, 0x17, 0x23, 0x45, 0x55, 0x55, 0x55, 0xD5]
        );
        assert_eq!(block.sync(), SyncHeader::Control);
        assert_eq!(block.block_type(), Some(0x78));
        assert_eq!(block.label(), "Start (eligible) seq=0x12345");
    }

    #[test]
    fn eligible_start_masks_to_20_bits() {
        let block = eligible_start_block(0xFFF1_2345);
        assert_eq!(block.bytes(), eligible_start_block(0x12345).bytes());
    }

    #[test]
    fn eligible_start_sequence_roundtrip() {
        for seq in (0..=SEQ_MASK).step_by(4099).chain([0, 1, SEQ_MASK]) {
            let block = eligible_start_block(seq);
            assert_eq!(block.bytes()[0], 0x78);
            assert_eq!(block.bytes()[1] & 0x0F, 0x7);
            assert_eq!(block.start_sequence().unwrap(), seq);
        }
    }

    #[test]
    fn ineligible_start_is_constant() {
        let a = ineligible_start_block();
        assert_eq!(a, ineligible_start_block());
        assert_eq!(a.bytes(), &[0x78, 0x55, 0x55, 0x55, 0x55, 0x55, 0x55, 0xD5]);
        assert_eq!(a.tags()[0], ByteTag::Start);
        assert_eq!(a.tags()[7], ByteTag::Sfd);
    }

    #[test]
    fn data_block_passes_bytes_through() {
        let raw = [0xDE, 0xAD, 0xBE, 0xEF, 0x01, 0x02, 0x03, 0x04];
        let block = data_block(Some(raw));
        assert_eq!(block.sync(), SyncHeader::Data);
        assert_eq!(block.bytes(), &raw);
        assert!(block.tags().iter().all(|t| *t == ByteTag::Data));
    }

    #[test]
    fn data_block_placeholder() {
        let block = data_block(None);
        assert!(block.tags().iter().all(|t| *t == ByteTag::Placeholder));
        assert_eq!(block.label(), "Data Block");
    }

    #[test]
    fn idle_block_is_constant() {
        let block = idle_block();
        assert_eq!(block.bytes(), &[0x1E, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(block.sync(), SyncHeader::Control);
        assert_eq!(block.tags()[0], ByteTag::Ctrl);
        assert_eq!(block.tags()[1], ByteTag::Idle);
    }

    #[test]
    fn terminate_block_uses_table() {
        for (pos, expected) in TERMINATE_TYPES.iter().enumerate() {
            let block = terminate_block(pos as i64);
            assert_eq!(block.bytes()[0], *expected);
            assert!(block.bytes()[1..].iter().all(|b| *b == 0));
        }
    }

    #[test]
    fn terminate_block_out_of_range_falls_back() {
        assert_eq!(terminate_block(8).bytes()[0], 0x87);
        assert_eq!(terminate_block(i64::MAX).bytes()[0], 0x87);
        assert_eq!(terminate_block(8).label(), "Terminate (pos=8)");
    }

    #[test]
    fn terminate_block_negative_falls_back() {
        assert_eq!(terminate_block(-1).bytes()[0], 0x87);
        assert_eq!(terminate_block(i64::MIN).bytes()[0], 0x87);
        assert_eq!(terminate_block(-1).label(), "Terminate (pos=-1)");
    }

    #[test]
    fn control_block_layout() {
        let block = control_block(ControlKind::Ack, 0x12345, 0xBEEF);
        assert_eq!(
            block.bytes(),
            &[0x4B, 0x01, 0x12, 0x34, 0x56, 0xBE, 0xEF, 0x00]
        );
        assert_eq!(block.label(), "CtlOS ACK seq=0x12345");
    }

    #[test]
    fn control_block_label_uses_lower_hex() {
        let block = control_block(ControlKind::InitEcho, 0xABCDE, 0);
        assert_eq!(block.label(), "CtlOS INIT_ECHO seq=0xabcde");
    }

    #[test]
    fn control_block_roundtrip() {
        for kind in ControlKind::ALL {
            for seq in [0, 1, 0x0F, 0x10, 0x12345, SEQ_MASK] {
                for payload in [0u16, 0x00FF, 0xFF00, 0xFFFF] {
                    let block = control_block(kind, seq, payload);
                    assert_eq!(block.bytes()[4] & 0x0F, 0x6);
                    assert_eq!(block.control_fields().unwrap(), (kind, seq, payload));
                }
            }
        }
    }

    #[test]
    fn control_block_masked_truncates_payload() {
        let block = control_block_masked(ControlKind::Init, 0x1_00001, 0x1_2345);
        assert_eq!(
            block.control_fields().unwrap(),
            (ControlKind::Init, 0x00001, 0x2345)
        );
    }
}
