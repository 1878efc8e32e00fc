use std::fmt;

use crate::DelegateId;

/// Memory map configuration errors. None of them can happen during
/// emulation; they come from wiring peripherals up wrongly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemoryError {
    /// `address` already has a read delegate.
    ReadDelegateConflict { address: u16 },
    /// `address` already has a write delegate.
    WriteDelegateConflict { address: u16 },
    InvalidRange { start: u16, end: u16 },
    /// The id was not handed out by this memory.
    UnknownDelegate { id: DelegateId },
    /// `len` bytes at `offset` would run past 0xFFFF.
    ImageTooLarge { offset: u16, len: usize },
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryError::ReadDelegateConflict { address } => {
                write!(f, "address 0x{address:04X} already has a read delegate")
            }
            MemoryError::WriteDelegateConflict { address } => {
                write!(f, "address 0x{address:04X} already has a write delegate")
            }
            MemoryError::InvalidRange { start, end } => {
                write!(f, "invalid address range: 0x{start:04X} - 0x{end:04X}")
            }
            MemoryError::UnknownDelegate { id } => write!(f, "unknown memory delegate {id}"),
            MemoryError::ImageTooLarge { offset, len } => write!(
                f,
                "image of {len} bytes at 0x{offset:04X} does not fit in the address space"
            ),
        }
    }
}

impl std::error::Error for MemoryError {}
