//! Word-level access operations composed from link exchanges.

use crate::constants::{CMD_GO, CMD_READ, CMD_RSREG, CMD_WRITE, CMD_WSREG, REG_INDEX_MASK};
use crate::BdmPort;

/// Read a system register by its 6-bit index.
pub fn read_register(port: &mut impl BdmPort, index: u8) -> u16 {
    port.transfer_word(CMD_RSREG | (u16::from(index) & REG_INDEX_MASK))
}

/// Write a system register: command exchange, then data exchange.
///
/// Nothing confirms the write. The two phases are not atomic; an
/// interruption between them leaves the target expecting the data word.
pub fn write_register(port: &mut impl BdmPort, index: u8, value: u16) {
    port.transfer_word(CMD_WSREG | (u16::from(index) & REG_INDEX_MASK));
    port.transfer_word(value);
}

/// Read `length` bytes starting at `address`, one 16-bit word per step.
///
/// Each step arms a read, then exchanges the address and takes the reply
/// as the big-endian word at that location. Only whole words travel the
/// link, so an odd `length` is rounded down; callers are expected to pass
/// an even count at an even address.
pub fn read_memory(port: &mut impl BdmPort, address: u32, length: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(length & !1);
    for step in 0..length / 2 {
        let addr = address.wrapping_add(step as u32 * 2);
        port.transfer_word(CMD_READ);
        // Only the low half of the address fits in one transfer word.
        let word = port.transfer_word(addr as u16);
        data.extend_from_slice(&word.to_be_bytes());
    }
    data
}

/// Write `data` as big-endian words: per word, an arm exchange then the
/// data exchange.
///
/// The stream carries no address; the target commits each word at its
/// current memory pointer, which a preceding read positions. A trailing
/// odd byte is never sent. Same non-atomicity caveat as
/// [`write_register`].
pub fn write_memory(port: &mut impl BdmPort, _address: u32, data: &[u8]) {
    for chunk in data.chunks_exact(2) {
        port.transfer_word(CMD_WRITE);
        port.transfer_word(u16::from_be_bytes([chunk[0], chunk[1]]));
    }
}

/// Issue GO. The reply is whatever the target shifts out while leaving
/// debug mode and is discarded.
pub fn resume(port: &mut impl BdmPort) {
    let _ = port.transfer_word(CMD_GO);
}
