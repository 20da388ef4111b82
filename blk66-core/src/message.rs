//! LLR control ordered set message kinds.
//!
//! Uses proper enums with `TryFrom`, no panics on unknown values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Blk66Error;

// ── ControlKind ──────────────────────────────────────────────────

/// Message carried in byte 1 of a CtlOS block.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlKind {
    /// Frames up to the carried sequence were received.
    Ack = 0x01,
    /// Retransmit from the carried sequence.
    Nack = 0x02,
    /// Link initialisation request.
    Init = 0x03,
    /// Echo of a received INIT.
    InitEcho = 0x04,
}

impl ControlKind {
    /// Every kind, in discriminant order.
    pub const ALL: [ControlKind; 4] = [
        ControlKind::Ack,
        ControlKind::Nack,
        ControlKind::Init,
        ControlKind::InitEcho,
    ];

    /// Upper-case name as printed in block labels.
    pub const fn name(self) -> &'static str {
        match self {
            ControlKind::Ack => "ACK",
            ControlKind::Nack => "NACK",
            ControlKind::Init => "INIT",
            ControlKind::InitEcho => "INIT_ECHO",
        }
    }

    /// Returns `true` for the kinds that carry init data in bytes 5..7.
    pub fn carries_init_data(self) -> bool {
        matches!(self, ControlKind::Init | ControlKind::InitEcho)
    }
}

impl TryFrom<u8> for ControlKind {
    type Error = Blk66Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(ControlKind::Ack),
            0x02 => Ok(ControlKind::Nack),
            0x03 => Ok(ControlKind::Init),
            0x04 => Ok(ControlKind::InitEcho),
            _ => Err(Blk66Error::UnknownVariant {
                type_name: "ControlKind",
                value: value as u64,
            }),
        }
    }
}

impl FromStr for ControlKind {
    type Err = Blk66Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ack" => Ok(ControlKind::Ack),
            "nack" => Ok(ControlKind::Nack),
            "init" => Ok(ControlKind::Init),
            "init_echo" | "init-echo" => Ok(ControlKind::InitEcho),
            _ => Err(Blk66Error::UnknownName {
                type_name: "control kind",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_kind_roundtrip() {
        for kind in ControlKind::ALL {
            assert_eq!(ControlKind::try_from(kind as u8).unwrap(), kind);
        }
    }

    #[test]
    fn control_kind_invalid() {
        assert!(ControlKind::try_from(0x00).is_err());
        assert!(ControlKind::try_from(0x05).is_err());
    }

    #[test]
    fn control_kind_from_str() {
        assert_eq!("ACK".parse::<ControlKind>().unwrap(), ControlKind::Ack);
        assert_eq!(
            "init-echo".parse::<ControlKind>().unwrap(),
            ControlKind::InitEcho
        );
        assert!("retry".parse::<ControlKind>().is_err());
    }

    #[test]
    fn only_init_kinds_carry_data() {
        assert!(!ControlKind::Ack.carries_init_data());
        assert!(!ControlKind::Nack.carries_init_data());
        assert!(ControlKind::Init.carries_init_data());
        assert!(ControlKind::InitEcho.carries_init_data());
    }
}
