//! # blk66-core
//!
//! Helpers behind the 64/66B, LLR and IPG/DIC teaching pages.
//!
//! This crate contains:
//! - **Block types**: `ProtocolBlock`, `SyncHeader`, `ByteTag`
//! - **Encoders**: start / data / idle / terminate / CtlOS block builders
//! - **Control messages**: `ControlKind` (ACK, NACK, INIT, INIT_ECHO)
//! - **DIC**: one-step `calculate` and the running `DicCounter`
//! - **Format**: hex / binary helpers and text rendering of blocks
//! - **Animation**: `AnimationController` with explicit play / pause state
//! - **Shortcuts**: `ShortcutMap` keyboard registry
//! - **Sample**: seeded random frames and MAC addresses
//! - **Error**: `Blk66Error`, typed, `thiserror`-based

pub mod animation;
pub mod block;
pub mod dic;
pub mod encoder;
pub mod error;
pub mod format;
pub mod message;
pub mod sample;
pub mod shortcut;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use animation::AnimationController;
pub use block::{BLOCK_BYTES, ByteTag, ProtocolBlock, SyncHeader};
pub use dic::{DEFAULT_NOMINAL_GAP, DeficitResult, DicCounter};
pub use encoder::{
    control_block, control_block_masked, data_block, eligible_start_block, idle_block,
    ineligible_start_block, terminate_block,
};
pub use error::Blk66Error;
pub use message::ControlKind;
pub use shortcut::{Modifiers, ShortcutMap, key_id};
