//! Run-control sequencing: forcing, sensing and leaving debug mode.

use crate::link::Link;
use crate::wires::Wires;
use crate::BdmPort;

impl<W: Wires> Link<W> {
    /// Force the target into BDM by resetting it with the halt request held.
    ///
    /// DSCLK doubles as BKPT on this wiring, so driving the clock low *is*
    /// the halt request. It must be low before RESET asserts or the target
    /// boots normally; the order here is load-bearing. The clock stays low
    /// afterwards (the request keeps holding) until the first exchange
    /// raises it again. Nothing here confirms that entry succeeded.
    pub fn enter_debug_mode(&mut self) {
        self.wires.set_dsclk(false);
        self.wires.set_reset(false);
        self.wires.delay(self.timing.reset_settle());
        self.wires.set_reset(true);
        self.wires.delay(self.timing.reset_settle());
    }

    /// Sample FREEZE. Purely observational; drives no output line.
    pub fn is_halted(&mut self) -> bool {
        self.wires.freeze()
    }

    /// Pulse RESET low then high without a halt request, so the target
    /// comes up running from a clean reset.
    pub fn pulse_reset(&mut self) {
        self.wires.set_reset(false);
        self.wires.delay(self.timing.reset_pulse());
        self.wires.set_reset(true);
        self.wires.delay(self.timing.reset_pulse());
    }
}

impl<W: Wires> BdmPort for Link<W> {
    fn transfer_word(&mut self, outgoing: u16) -> u16 {
        Link::transfer_word(self, outgoing)
    }

    /// The only primitive that verifies mode entry, via a single point
    /// sample after a fixed settle. No polling, no retry: if the settle
    /// delay is mis-calibrated this reports a live target as failed.
    fn stop(&mut self) -> bool {
        self.enter_debug_mode();
        self.wires.delay(self.timing.halt_settle());
        self.is_halted()
    }

    fn reset(&mut self) {
        self.pulse_reset();
    }

    fn halted(&mut self) -> bool {
        self.is_halted()
    }
}
