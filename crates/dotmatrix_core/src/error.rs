use std::fmt;

use thiserror::Error;

/// Convenience alias used throughout the core.
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

/// Fatal conditions surfaced by the core.
///
/// Configuration errors are raised while a cartridge is being built; execution
/// faults unwind out of `Cpu::step` and end the session. Quirky-but-legal
/// writes (unusable memory, read-only registers, disabled cartridge RAM) are
/// never reported here.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unsupported cartridge type 0x{0:02X}")]
    UnsupportedMapper(u8),

    #[error("ROM image is {len} bytes, too small to hold a cartridge header")]
    RomTooSmall { len: usize },

    #[error("unknown opcode {opcode} at PC=0x{pc:04X}\nrecent instructions:\n{history}")]
    UnknownOpcode {
        pc: u16,
        opcode: OpcodeBytes,
        history: History,
    },
}

/// Opcode bytes of a faulting instruction (one byte, or `CB xx`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpcodeBytes {
    Base(u8),
    Prefixed(u8),
}

impl fmt::Display for OpcodeBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpcodeBytes::Base(op) => write!(f, "0x{op:02X}"),
            OpcodeBytes::Prefixed(op) => write!(f, "0xCB 0x{op:02X}"),
        }
    }
}

/// One executed instruction kept for fault diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub pc: u16,
    pub mnemonic: String,
}

/// Snapshot of the most recent instructions, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History(pub Vec<HistoryEntry>);

impl fmt::Display for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "  (none)");
        }
        for (i, entry) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  0x{:04X}: {}", entry.pc, entry.mnemonic)?;
        }
        Ok(())
    }
}
