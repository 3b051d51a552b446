//! In-memory MC68332 stand-in for exercising the probe without hardware.

use crate::constants::{
    CMD_FAMILY_MASK, CMD_GO, CMD_READ, CMD_RSREG, CMD_WRITE, CMD_WSREG, REG_INDEX_MASK,
};
use crate::{parse_hex, BdmPort, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const REGISTER_COUNT: usize = 64;

/// The address word on the wire is 16 bits, so the simulated RAM spans 64 KiB.
const MEMORY_SIZE: usize = 0x10000;

/// What the data phase of a two-phase command will carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    WriteRegister(u8),
    ReadAddress,
    WriteData,
}

/// One decoded exchange, recorded in wire order for test assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exchange {
    ReadRegister(u8),
    ArmWriteRegister(u8),
    RegisterData(u16),
    ArmRead,
    ArmWrite,
    Address(u16),
    MemoryData(u16),
    Go,
    Unrecognized(u16),
}

/// Simulated target CPU behind the [`BdmPort`] seam.
///
/// Decodes command words the way the MC68332 debug state machine would:
/// register reads answer in the same exchange, two-phase commands latch
/// their pending data phase, GO clears the halted state. Memory writes
/// land at the target-side pointer, which address exchanges position and
/// each written word advances.
#[derive(Debug)]
pub struct SimTarget {
    registers: [u16; REGISTER_COUNT],
    memory: Vec<u8>,
    cursor: u16,
    halted: bool,
    fail_halt: bool,
    pending: Option<Pending>,
    exchanges: Vec<Exchange>,
}

impl Default for SimTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl SimTarget {
    pub fn new() -> Self {
        Self {
            registers: [0; REGISTER_COUNT],
            memory: vec![0; MEMORY_SIZE],
            cursor: 0,
            halted: false,
            fail_halt: false,
            pending: None,
            exchanges: Vec::new(),
        }
    }

    /// Make every halt attempt fail, emulating a target that never reaches
    /// debug mode (absent, unpowered, or mis-wired BKPT).
    pub fn set_fail_halt(&mut self, fail: bool) {
        self.fail_halt = fail;
    }

    pub fn force_halted(&mut self, halted: bool) {
        self.halted = halted;
    }

    pub fn register(&self, index: u8) -> u16 {
        self.registers[(u16::from(index) & REG_INDEX_MASK) as usize]
    }

    pub fn set_register(&mut self, index: u8, value: u16) {
        self.registers[(u16::from(index) & REG_INDEX_MASK) as usize] = value;
    }

    pub fn memory_word(&self, address: u16) -> u16 {
        let hi = self.memory[address as usize];
        let lo = self.memory[address.wrapping_add(1) as usize];
        u16::from_be_bytes([hi, lo])
    }

    pub fn set_memory_word(&mut self, address: u16, word: u16) {
        let [hi, lo] = word.to_be_bytes();
        self.memory[address as usize] = hi;
        self.memory[address.wrapping_add(1) as usize] = lo;
    }

    /// Position the target-side memory pointer, as a prior read would.
    pub fn set_cursor(&mut self, address: u16) {
        self.cursor = address;
    }

    pub fn cursor(&self) -> u16 {
        self.cursor
    }

    /// Drain the decoded-exchange log.
    pub fn take_exchanges(&mut self) -> Vec<Exchange> {
        std::mem::take(&mut self.exchanges)
    }

    pub fn apply_seed(&mut self, seed: &SimSeed) -> Result<()> {
        for (index, value) in &seed.registers {
            let index = parse_hex(index)? as u8;
            self.set_register(index, *value);
        }
        for (address, word) in &seed.memory {
            let address = parse_hex(address)? as u16;
            self.set_memory_word(address, *word);
        }
        self.halted = seed.halted;
        Ok(())
    }

    fn begin_command(&mut self, word: u16) -> u16 {
        match word & CMD_FAMILY_MASK {
            CMD_RSREG => {
                let index = (word & REG_INDEX_MASK) as u8;
                self.exchanges.push(Exchange::ReadRegister(index));
                self.registers[index as usize]
            }
            CMD_WSREG => {
                let index = (word & REG_INDEX_MASK) as u8;
                self.exchanges.push(Exchange::ArmWriteRegister(index));
                self.pending = Some(Pending::WriteRegister(index));
                0
            }
            CMD_READ => {
                self.exchanges.push(Exchange::ArmRead);
                self.pending = Some(Pending::ReadAddress);
                0
            }
            CMD_WRITE => {
                self.exchanges.push(Exchange::ArmWrite);
                self.pending = Some(Pending::WriteData);
                0
            }
            CMD_GO => {
                self.exchanges.push(Exchange::Go);
                self.halted = false;
                0
            }
            _ => {
                self.exchanges.push(Exchange::Unrecognized(word));
                0
            }
        }
    }
}

impl BdmPort for SimTarget {
    fn transfer_word(&mut self, outgoing: u16) -> u16 {
        match self.pending.take() {
            Some(Pending::WriteRegister(index)) => {
                self.exchanges.push(Exchange::RegisterData(outgoing));
                self.registers[index as usize] = outgoing;
                0
            }
            Some(Pending::ReadAddress) => {
                self.exchanges.push(Exchange::Address(outgoing));
                self.cursor = outgoing.wrapping_add(2);
                self.memory_word(outgoing)
            }
            Some(Pending::WriteData) => {
                self.exchanges.push(Exchange::MemoryData(outgoing));
                self.set_memory_word(self.cursor, outgoing);
                self.cursor = self.cursor.wrapping_add(2);
                0
            }
            None => self.begin_command(outgoing),
        }
    }

    fn stop(&mut self) -> bool {
        if !self.fail_halt {
            self.halted = true;
        }
        self.halted
    }

    fn reset(&mut self) {
        self.halted = false;
        self.pending = None;
    }

    fn halted(&mut self) -> bool {
        self.halted
    }
}

/// Initial simulator state, loadable from a JSON file by the probe binary.
///
/// Register indices and memory addresses are unprefixed hex strings,
/// matching the command-channel argument syntax; memory values are
/// 16-bit words stored big-endian at their (even) address.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSeed {
    pub registers: HashMap<String, u16>,
    pub memory: HashMap<String, u16>,
    pub halted: bool,
}

impl SimSeed {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
