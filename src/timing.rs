//! Calibration delays for the BDM link and run-control sequencing.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Named delay constants, tunable per target clock speed without touching
/// protocol logic. The microsecond fields bound the serial clock rate; the
/// millisecond fields cover reset and mode-entry settling. Defaults match
/// the original probe calibration for a stock MC68332 board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BdmTiming {
    /// Hold time between driving DSI and the falling clock edge, in µs.
    pub bit_setup_us: u64,
    /// Clock-low phase of each bit, in µs.
    pub clock_low_us: u64,
    /// Hold time after the rising edge before the next bit, in µs.
    pub bit_hold_us: u64,
    /// RESET assert/release hold while forcing debug mode, in ms.
    pub reset_settle_ms: u64,
    /// Each phase of a plain reset pulse, in ms.
    pub reset_pulse_ms: u64,
    /// Wait between forcing debug mode and sampling FREEZE, in ms.
    pub halt_settle_ms: u64,
}

impl Default for BdmTiming {
    fn default() -> Self {
        Self {
            bit_setup_us: 10,
            clock_low_us: 10,
            bit_hold_us: 10,
            reset_settle_ms: 20,
            reset_pulse_ms: 10,
            halt_settle_ms: 50,
        }
    }
}

impl BdmTiming {
    pub fn bit_setup(&self) -> Duration {
        Duration::from_micros(self.bit_setup_us)
    }

    pub fn clock_low(&self) -> Duration {
        Duration::from_micros(self.clock_low_us)
    }

    pub fn bit_hold(&self) -> Duration {
        Duration::from_micros(self.bit_hold_us)
    }

    pub fn reset_settle(&self) -> Duration {
        Duration::from_millis(self.reset_settle_ms)
    }

    pub fn reset_pulse(&self) -> Duration {
        Duration::from_millis(self.reset_pulse_ms)
    }

    pub fn halt_settle(&self) -> Duration {
        Duration::from_millis(self.halt_settle_ms)
    }
}
