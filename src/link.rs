//! Bit-level driver for the synchronous BDM serial link.

use crate::constants::TRANSFER_BITS;
use crate::timing::BdmTiming;
use crate::wires::Wires;

/// Owns the signal lines and all protocol timing.
///
/// One `Link` is constructed per probe. The mode controller and the access
/// layer borrow it; nothing else touches the pins, which keeps the link
/// strictly half-duplex with exactly one exchange in flight.
pub struct Link<W: Wires> {
    pub(crate) wires: W,
    pub(crate) timing: BdmTiming,
}

impl<W: Wires> Link<W> {
    /// Take ownership of the pins and drive them to their idle levels:
    /// clock high, data-out low, reset released.
    pub fn new(mut wires: W, timing: BdmTiming) -> Self {
        wires.set_dsclk(true);
        wires.set_dsi(false);
        wires.set_reset(true);
        Self { wires, timing }
    }

    pub fn wires(&self) -> &W {
        &self.wires
    }

    pub fn wires_mut(&mut self) -> &mut W {
        &mut self.wires
    }

    pub fn timing(&self) -> &BdmTiming {
        &self.timing
    }

    /// Clock one word out while sampling the response, MSB first.
    ///
    /// Every exchange moves 17 bits. Bit 16 is always driven low; the
    /// status bit clocked back in its place is dropped before returning.
    /// The target latches DSI on each rising edge and presents DSO on the
    /// same edge. There is no handshake and no retry: with the target
    /// absent or out of sync the returned word is garbage, and that only
    /// surfaces as a wrong result in a caller.
    pub fn transfer_word(&mut self, outgoing: u16) -> u16 {
        let mut incoming: u32 = 0;
        for bit in (0..TRANSFER_BITS).rev() {
            let drive = bit < 16 && (outgoing >> bit) & 1 == 1;
            self.wires.set_dsi(drive);
            self.wires.delay(self.timing.bit_setup());
            self.wires.set_dsclk(false);
            self.wires.delay(self.timing.clock_low());
            self.wires.set_dsclk(true);
            incoming = (incoming << 1) | u32::from(self.wires.dso());
            self.wires.delay(self.timing.bit_hold());
        }
        (incoming & 0xFFFF) as u16
    }
}
