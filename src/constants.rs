//! BDM command words for the MC68332 (CPU32 core).

/// Read System Register; OR the 6-bit register index into the low bits.
pub const CMD_RSREG: u16 = 0x6000;

/// Write System Register; the data word follows in a second transfer.
pub const CMD_WSREG: u16 = 0x7000;

/// Arm a word read at the address sent in the next transfer.
pub const CMD_READ: u16 = 0x8000;

/// Arm a word write; the data word follows in the next transfer.
pub const CMD_WRITE: u16 = 0x9000;

/// Resume execution and leave debug mode.
pub const CMD_GO: u16 = 0xA000;

/// Mask selecting the command family from a transfer word.
pub const CMD_FAMILY_MASK: u16 = 0xF000;

/// Mask for the register index operand carried by RSREG/WSREG.
pub const REG_INDEX_MASK: u16 = 0x003F;

/// Bits clocked per exchange: 16 payload bits plus the leading status bit.
pub const TRANSFER_BITS: u32 = 17;
