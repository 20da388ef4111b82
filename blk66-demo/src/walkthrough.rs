//! Frame-by-frame DIC walkthrough.
//!
//! Each step transmits the next frame of a prepared stream: the frame opens
//! with an LLR-eligible start block carrying its sequence number, and the DIC
//! register decides how many idle bytes follow it.

use serde::Serialize;

use blk66_core::format::{render_block, render_block_styled};
use blk66_core::{DeficitResult, DicCounter, ProtocolBlock, eligible_start_block};

/// One transmitted frame.
#[derive(Debug, Clone, Serialize)]
pub struct Step {
    /// Position in the stream, doubling as the LLR frame sequence.
    pub index: usize,
    pub length: u64,
    /// Register value before this frame.
    pub counter_before: u8,
    pub result: DeficitResult,
    pub start: ProtocolBlock,
}

impl Step {
    /// One-line DIC readout.
    pub fn describe(&self) -> String {
        let r = &self.result;
        format!(
            "frame {:>3}  len {:>4}  /T/ {}  DIC {} -> {}{}  IPG {:>2}",
            self.index,
            self.length,
            r.terminate_position,
            self.counter_before,
            r.new_counter,
            if r.overflowed { " (wrap +4)" } else { "" },
            r.effective_gap,
        )
    }

    /// Readout followed by the frame's start block.
    pub fn render(&self, color: bool) -> String {
        let block = if color {
            render_block_styled(&self.start)
        } else {
            render_block(&self.start)
        };
        format!("{}\n    {block}", self.describe())
    }
}

/// A frame stream and the DIC register it drives.
#[derive(Debug, Clone)]
pub struct Walkthrough {
    lengths: Vec<u64>,
    next: usize,
    dic: DicCounter,
}

impl Walkthrough {
    pub fn new(lengths: Vec<u64>, dic: DicCounter) -> Self {
        Self {
            lengths,
            next: 0,
            dic,
        }
    }

    /// Transmit the next frame, or `None` once the stream is exhausted.
    pub fn advance(&mut self) -> Option<Step> {
        let length = *self.lengths.get(self.next)?;
        let index = self.next;
        let counter_before = self.dic.counter();
        let result = self.dic.push(length);
        self.next += 1;
        Some(Step {
            index,
            length,
            counter_before,
            result,
            start: eligible_start_block(index as u32),
        })
    }

    /// Back to the first frame with a cleared register.
    pub fn rewind(&mut self) {
        self.next = 0;
        self.dic.reset();
    }

    pub fn remaining(&self) -> usize {
        self.lengths.len() - self.next
    }

    pub fn dic(&self) -> &DicCounter {
        &self.dic
    }

    /// Closing line: frames sent, register and mean gap.
    pub fn summary(&self) -> String {
        match self.dic.average_gap() {
            Some(avg) => format!(
                "{} frames  DIC {}  average IPG {avg:.3} (nominal {})",
                self.dic.frames(),
                self.dic.counter(),
                self.dic.nominal_gap()
            ),
            None => "no frames sent".to_string(),
        }
    }
}

impl Iterator for Walkthrough {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        self.advance()
    }
}
