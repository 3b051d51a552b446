//! MC68332 Background Debug Mode probe core.
//!
//! Drives the CPU32 BDM pins of an MC68332 and exposes register, memory and
//! run-control operations over a line-oriented ASCII channel. Layers, from
//! the wire up:
//!
//! - [`link`] clocks one 17-bit word per exchange over the three-signal
//!   serial link and owns all protocol timing.
//! - [`mode`] sequences the reset/halt-request/freeze lines to force, sense
//!   and leave debug mode.
//! - [`target`] composes exchanges into register and memory accesses.
//! - [`dispatch`] parses one ASCII request line into one CRLF response line.
//!
//! The physical pins sit behind the [`Wires`] trait; everything above the
//! bit level sits behind [`BdmPort`], which [`sim::SimTarget`] implements
//! in memory so the command path can be exercised without hardware.

use std::num::ParseIntError;
use thiserror::Error;

pub mod constants;
pub mod dispatch;
pub mod link;
pub mod mode;
pub mod sim;
pub mod target;
pub mod timing;
pub mod wires;

#[cfg(test)]
pub(crate) mod testutil;

pub use dispatch::{Dispatcher, BANNER};
pub use link::Link;
pub use sim::{SimSeed, SimTarget};
pub use timing::BdmTiming;
pub use wires::Wires;

pub type Result<T> = std::result::Result<T, BdmError>;

#[derive(Debug, Error)]
pub enum BdmError {
    #[error("Unknown or malformed command")]
    UnknownCommand,
    #[error("Failed to halt CPU")]
    HaltFailed,
    #[error("invalid hex argument '{raw}'")]
    InvalidHex {
        raw: String,
        #[source]
        source: ParseIntError,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("seed error: {0}")]
    Seed(#[from] serde_json::Error),
}

/// Parse an unprefixed hexadecimal command argument.
pub fn parse_hex(raw: &str) -> Result<u32> {
    u32::from_str_radix(raw, 16).map_err(|source| BdmError::InvalidHex {
        raw: raw.to_string(),
        source,
    })
}

/// Seam between command handling and a live target.
///
/// [`Link`] implements this over real signal lines; [`sim::SimTarget`]
/// implements it word-for-word in memory. Exactly one exchange is in
/// flight at a time; the link is half-duplex and unpipelined.
pub trait BdmPort {
    /// One 17-bit exchange; returns the 16-bit response payload.
    fn transfer_word(&mut self, outgoing: u16) -> u16;

    /// Force debug mode, wait the calibrated settle time, report FREEZE.
    fn stop(&mut self) -> bool;

    /// Pulse reset without a halt request, letting the target boot and run.
    fn reset(&mut self);

    /// Whether the target is halted in BDM right now.
    fn halted(&mut self) -> bool;
}
