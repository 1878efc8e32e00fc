use std::fmt;

/// An opcode byte with no defined behaviour.
///
/// Pandocs lists eleven such "holes" in the unprefixed table (D3, DB, DD,
/// E3, E4, EB, EC, ED, F4, FC, FD). They hard-lock the real CPU until
/// power-off. The prefixed table has none.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnknownOpcode(pub u8);

impl fmt::Display for UnknownOpcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown opcode 0x{:02X}", self.0)
    }
}

impl std::error::Error for UnknownOpcode {}

/// Failures surfaced by the CPU core's driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CpuError {
    /// `opcode` was fetched from `pc` and does not decode. The core stays
    /// locked on this error until it is reset.
    UnknownOpcode { opcode: u8, pc: u16 },
}

impl CpuError {
    pub(crate) fn at(err: UnknownOpcode, pc: u16) -> Self {
        CpuError::UnknownOpcode { opcode: err.0, pc }
    }
}

impl fmt::Display for CpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CpuError::UnknownOpcode { opcode, pc } => {
                write!(f, "unknown opcode 0x{opcode:02X} at PC=0x{pc:04X}")
            }
        }
    }
}

impl std::error::Error for CpuError {}
