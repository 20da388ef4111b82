//! # blk66-demo: terminal walkthrough
//!
//! Terminal stand-in for the 64/66B and IPG/DIC documentation pages:
//! prints individual blocks, evaluates single DIC steps, runs random frame
//! streams through the DIC register, and plays them back interactively.

pub mod config;
pub mod player;
pub mod walkthrough;
