//! Machine-cycle stepped core for the SM83, the CPU of the Game Boy.
//!
//! The host owns a [`Bus`] implementation and calls
//! [`CpuCore::advance_machine_cycle`] once per machine cycle, stepping its
//! peripherals in between.

mod bus;
mod decode;
mod driver;
mod error;
mod instr;
mod regs;
mod state;

pub use bus::Bus;
pub use decode::{decode, decode_prefixed};
pub use driver::CpuCore;
pub use error::{CpuError, UnknownOpcode};
pub use instr::{
    AluOp, Condition, Indirect, Instruction, InstructionKind, Pair, ShiftOp, StackPair,
};
pub use regs::{Flags, Registers, HL_INDEX};
pub use state::{CpuState, ENTRY_POINT, INITIAL_SP};

/// Base clock ticks per machine cycle.
pub const TICKS_PER_MACHINE_CYCLE: u32 = 4;
