//! `(HL)` forms of the 0xCB table.
//!
//! Read-modify-write operations read on one cycle and write back on the
//! next; BIT only reads.

use crate::{Bus, CpuState};

use super::ShiftOp;

/// Shared read-modify-write sequence (3 cycles): read (HL), write the
/// transformed byte, idle.
#[inline]
fn modify_hl<B: Bus>(
    state: &mut CpuState,
    bus: &mut B,
    cycle: u8,
    value: &mut u8,
    f: impl FnOnce(&mut CpuState, u8) -> u8,
) {
    match cycle {
        3 => *value = bus.read8(state.regs.hl()),
        2 => {
            let result = f(state, *value);
            bus.write8(state.regs.hl(), result);
        }
        _ => {}
    }
}

pub(super) fn shift_hl<B: Bus>(state: &mut CpuState, bus: &mut B, cycle: u8, op: ShiftOp, value: &mut u8) {
    modify_hl(state, bus, cycle, value, |state, v| state.regs.alu_shift(op, v));
}

pub(super) fn res_hl<B: Bus>(state: &mut CpuState, bus: &mut B, cycle: u8, bit: u8, value: &mut u8) {
    modify_hl(state, bus, cycle, value, |_, v| v & !(1 << bit));
}

pub(super) fn set_hl<B: Bus>(state: &mut CpuState, bus: &mut B, cycle: u8, bit: u8, value: &mut u8) {
    modify_hl(state, bus, cycle, value, |_, v| v | (1 << bit));
}

/// `BIT b,(HL)` (2 cycles).
pub(super) fn bit_hl<B: Bus>(state: &mut CpuState, bus: &mut B, cycle: u8, bit: u8) {
    if cycle == 2 {
        let value = bus.read8(state.regs.hl());
        state.regs.alu_bit(bit, value);
    }
}
