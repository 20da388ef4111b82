//! Value types for 66B visualisation blocks.
//!
//! A [`ProtocolBlock`] is one 66-bit code cycle drawn as a 2-bit sync header
//! and 8 payload bytes. Each byte carries a [`ByteTag`] that only tells a
//! renderer how to colour it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Blk66Error;
use crate::message::ControlKind;

/// Number of payload bytes in every block.
pub const BLOCK_BYTES: usize = 8;

// ── Protocol constants ───────────────────────────────────────────

/// Block type byte of a start block.
pub const START_BLOCK_TYPE: u8 = 0x78;
/// Low nibble of byte 1 in an LLR-eligible start block.
pub const ELIGIBLE_START_NIBBLE: u8 = 0x7;
/// Preamble filler byte.
pub const PREAMBLE: u8 = 0x55;
/// Start frame delimiter.
pub const SFD: u8 = 0xD5;
/// Control byte of an idle block.
pub const IDLE_CONTROL: u8 = 0x1E;
/// Control byte of a CtlOS block.
pub const CTLOS_CONTROL: u8 = 0x4B;
/// Low nibble of byte 4 in a CtlOS block (O-code).
pub const CTLOS_OCODE: u8 = 0x6;
/// Terminate block type bytes, indexed by /T/ position.
pub const TERMINATE_TYPES: [u8; 8] = [0x87, 0x99, 0xAA, 0xB4, 0xCC, 0xD2, 0xE1, 0xFF];
/// Terminate block type used when the position is out of range.
pub const TERMINATE_FALLBACK: u8 = 0x87;
/// Mask applied to LLR frame sequence numbers.
pub const SEQ_MASK: u32 = 0xF_FFFF;

// ── SyncHeader ───────────────────────────────────────────────────

/// The 2-bit sync header prefixed to every 66B block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyncHeader {
    /// `01`: all eight bytes are data.
    #[serde(rename = "01")]
    Data,
    /// `10`: byte 0 is a block type field.
    #[serde(rename = "10")]
    Control,
}

impl SyncHeader {
    /// Bit pattern as drawn on the page.
    pub const fn bits(self) -> &'static str {
        match self {
            SyncHeader::Data => "01",
            SyncHeader::Control => "10",
        }
    }
}

impl fmt::Display for SyncHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.bits())
    }
}

// ── ByteTag ──────────────────────────────────────────────────────

/// Display classification of a single block byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ByteTag {
    Start,
    Seq,
    Preamble,
    Sfd,
    Data,
    Ctrl,
    Idle,
    Term,
    OCode,
    /// No real value yet; rendered as `XX`.
    Placeholder,
}

impl ByteTag {
    /// CSS class used by the HTML pages for this tag.
    pub const fn css_class(self) -> &'static str {
        match self {
            ByteTag::Start => "byte-start",
            ByteTag::Seq => "byte-seq",
            ByteTag::Preamble => "byte-preamble",
            ByteTag::Sfd => "byte-sfd",
            ByteTag::Data | ByteTag::Placeholder => "byte-data",
            ByteTag::Ctrl => "byte-ctrl",
            ByteTag::Idle => "byte-idle",
            ByteTag::Term => "byte-term",
            ByteTag::OCode => "byte-ocode",
        }
    }
}

// ── ProtocolBlock ────────────────────────────────────────────────

/// An immutable 66B block description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolBlock {
    sync: SyncHeader,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    block_type: Option<u8>,
    bytes: [u8; BLOCK_BYTES],
    tags: [ByteTag; BLOCK_BYTES],
    label: String,
}

impl ProtocolBlock {
    pub(crate) fn new(
        sync: SyncHeader,
        block_type: Option<u8>,
        bytes: [u8; BLOCK_BYTES],
        tags: [ByteTag; BLOCK_BYTES],
        label: impl Into<String>,
    ) -> Self {
        Self {
            sync,
            block_type,
            bytes,
            tags,
            label: label.into(),
        }
    }

    pub fn sync(&self) -> SyncHeader {
        self.sync
    }

    /// Block type advertised by the block kind (start blocks only).
    pub fn block_type(&self) -> Option<u8> {
        self.block_type
    }

    pub fn bytes(&self) -> &[u8; BLOCK_BYTES] {
        &self.bytes
    }

    pub fn tags(&self) -> &[ByteTag; BLOCK_BYTES] {
        &self.tags
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Iterate `(byte, tag)` pairs in wire order.
    pub fn cells(&self) -> impl Iterator<Item = (u8, ByteTag)> + '_ {
        self.bytes.iter().copied().zip(self.tags.iter().copied())
    }

    /// Recover the 20-bit frame sequence from an LLR-eligible start block.
    pub fn start_sequence(&self) -> Result<u32, Blk66Error> {
        let b = &self.bytes;
        if self.sync != SyncHeader::Control || b[0] != START_BLOCK_TYPE {
            return Err(Blk66Error::BlockMismatch("not a start block"));
        }
        if b[1] & 0x0F != ELIGIBLE_START_NIBBLE {
            return Err(Blk66Error::BlockMismatch("start block is not LLR-eligible"));
        }
        Ok(((b[1] as u32 >> 4) << 16) | ((b[2] as u32) << 8) | b[3] as u32)
    }

    /// Recover `(kind, seq, init_payload)` from a CtlOS block.
    pub fn control_fields(&self) -> Result<(ControlKind, u32, u16), Blk66Error> {
        let b = &self.bytes;
        if self.sync != SyncHeader::Control || b[0] != CTLOS_CONTROL {
            return Err(Blk66Error::BlockMismatch("not a CtlOS block"));
        }
        if b[4] & 0x0F != CTLOS_OCODE {
            return Err(Blk66Error::BlockMismatch("CtlOS O-code mismatch"));
        }
        let kind = ControlKind::try_from(b[1])?;
        let seq = ((b[2] as u32) << 12) | ((b[3] as u32) << 4) | (b[4] as u32 >> 4);
        let payload = u16::from_be_bytes([b[5], b[6]]);
        Ok((kind, seq, payload))
    }
}
