//! Physical signal lines of the BDM header.

use std::time::Duration;

/// The five lines the probe touches, plus the busy-wait primitive.
///
/// Directions are fixed by the wiring: DSI, DSCLK and RESET are probe
/// outputs, DSO and FREEZE are probe inputs. Implementations bind these to
/// real GPIO pins. All waiting in the crate flows through [`delay`], so a
/// bound implementation controls how time actually passes.
///
/// [`delay`]: Wires::delay
pub trait Wires {
    /// Drive the serial data line toward the target (DSI).
    fn set_dsi(&mut self, high: bool);

    /// Sample the serial data line from the target (DSO).
    fn dso(&mut self) -> bool;

    /// Drive the serial clock (DSCLK). Low doubles as the BKPT halt request.
    fn set_dsclk(&mut self, high: bool);

    /// Drive the active-low RESET line.
    fn set_reset(&mut self, high: bool);

    /// Sample the FREEZE line; high means halted in BDM.
    fn freeze(&mut self) -> bool;

    /// Busy-wait for `wait`.
    fn delay(&mut self, wait: Duration);
}
