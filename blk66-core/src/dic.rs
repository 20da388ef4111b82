//! Deficit Idle Count (DIC) compensation.
//!
//! A 64/66B transmitter can only start a frame on a 4-byte lane boundary, so
//! it trims the inter-packet gap by the frame's alignment remainder and keeps
//! the running deficit in a modulo-4 counter. When the counter wraps, four
//! idle bytes are paid back. Over a stream the average gap stays at the
//! nominal value.

use serde::{Deserialize, Serialize};

/// Nominal IPG in bytes supplied by the MAC.
pub const DEFAULT_NOMINAL_GAP: u32 = 12;

/// Lane width the gap is aligned to.
const LANES: u64 = 4;

/// Outcome of one DIC step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeficitResult {
    /// Frame length modulo 4.
    pub terminate_position: u8,
    /// Idle bytes removed from this gap; equal to `terminate_position`.
    pub deficit: u8,
    /// DIC register after this frame (0..=3).
    pub new_counter: u8,
    /// The register wrapped past 3.
    pub overflowed: bool,
    /// Idle bytes added back on wrap (0 or 4).
    pub gap_adjustment: u8,
    /// Gap actually transmitted after this frame.
    pub effective_gap: i64,
}

/// Run one DIC step for a frame of `frame_length` bytes.
///
/// `current_counter` is expected in 0..=3; larger values are still reduced
/// modulo 4 so `new_counter` always stays in range.
pub fn calculate(frame_length: u64, current_counter: u8, nominal_gap: u32) -> DeficitResult {
    let terminate_position = (frame_length % LANES) as u8;
    let deficit = terminate_position;

    let raw_next = current_counter as u64 + deficit as u64;
    let overflowed = raw_next >= LANES;
    let new_counter = (raw_next % LANES) as u8;
    let gap_adjustment = if overflowed { LANES as u8 } else { 0 };
    let effective_gap = nominal_gap as i64 - deficit as i64 + gap_adjustment as i64;

    DeficitResult {
        terminate_position,
        deficit,
        new_counter,
        overflowed,
        gap_adjustment,
        effective_gap,
    }
}

/// [`calculate`] with the standard 12-byte gap.
pub fn calculate_default(frame_length: u64, current_counter: u8) -> DeficitResult {
    calculate(frame_length, current_counter, DEFAULT_NOMINAL_GAP)
}

// ── DicCounter ───────────────────────────────────────────────────

/// DIC register driven across a stream of frames.
#[derive(Debug, Clone)]
pub struct DicCounter {
    nominal_gap: u32,
    counter: u8,
    frames: u64,
    total_gap: i64,
}

impl Default for DicCounter {
    fn default() -> Self {
        Self::new(DEFAULT_NOMINAL_GAP)
    }
}

impl DicCounter {
    pub fn new(nominal_gap: u32) -> Self {
        Self {
            nominal_gap,
            counter: 0,
            frames: 0,
            total_gap: 0,
        }
    }

    /// Account for one transmitted frame and return the step result.
    pub fn push(&mut self, frame_length: u64) -> DeficitResult {
        let result = calculate(frame_length, self.counter, self.nominal_gap);
        self.counter = result.new_counter;
        self.frames += 1;
        self.total_gap += result.effective_gap;
        result
    }

    pub fn nominal_gap(&self) -> u32 {
        self.nominal_gap
    }

    /// Current register value.
    pub fn counter(&self) -> u8 {
        self.counter
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Sum of effective gaps over all pushed frames.
    pub fn total_gap(&self) -> i64 {
        self.total_gap
    }

    /// Mean effective gap, or `None` before the first frame.
    pub fn average_gap(&self) -> Option<f64> {
        (self.frames > 0).then(|| self.total_gap as f64 / self.frames as f64)
    }

    pub fn reset(&mut self) {
        self.counter = 0;
        self.frames = 0;
        self.total_gap = 0;
    }
}
