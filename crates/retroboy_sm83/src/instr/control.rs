//! Jumps, calls, returns and restarts.
//!
//! Conditional forms evaluate their condition exactly once, on the cycle
//! that completes the operand read (or on the first cycle for RET cc), and
//! cut straight to the final idle cycle when it fails. That reproduces the
//! short timings: JR cc 2, JP cc 3, CALL cc 3, RET cc 2.

use crate::{Bus, CpuState};

use super::load::fetch_imm16;
use super::stack::{pop_byte, push_return_byte};
use super::{skip_to_last_cycle, Condition};

#[inline]
fn evaluate(state: &CpuState, cond: Option<Condition>) -> bool {
    cond.map_or(true, |cond| cond.holds(&state.regs))
}

/// `JR e8` / `JR cc,e8` (3 / 2 cycles).
///
/// The displacement is signed and relative to the address following the
/// operand.
pub(super) fn jr<B: Bus>(
    state: &mut CpuState,
    bus: &mut B,
    cycle: u8,
    cond: Option<Condition>,
    offset: &mut u8,
    remaining: &mut u8,
) {
    match cycle {
        3 => {
            *offset = state.fetch8(bus);
            if !evaluate(state, cond) {
                skip_to_last_cycle(remaining);
            }
        }
        2 => state.pc = state.pc.wrapping_add(*offset as i8 as i16 as u16),
        _ => {}
    }
}

/// `JP a16` / `JP cc,a16` (4 / 3 cycles).
pub(super) fn jp<B: Bus>(
    state: &mut CpuState,
    bus: &mut B,
    cycle: u8,
    cond: Option<Condition>,
    target: &mut u16,
    remaining: &mut u8,
) {
    match cycle {
        4 => fetch_imm16(state, bus, cycle, 4, target),
        3 => {
            fetch_imm16(state, bus, cycle, 4, target);
            if !evaluate(state, cond) {
                skip_to_last_cycle(remaining);
            }
        }
        2 => state.pc = *target,
        _ => {}
    }
}

/// `CALL a16` / `CALL cc,a16` (6 / 3 cycles).
///
/// After the target is read: one internal cycle moving SP, two stack
/// writes (return address high, then low), and the jump lands together
/// with the low byte write.
pub(super) fn call<B: Bus>(
    state: &mut CpuState,
    bus: &mut B,
    cycle: u8,
    cond: Option<Condition>,
    target: &mut u16,
    remaining: &mut u8,
) {
    match cycle {
        6 => fetch_imm16(state, bus, cycle, 6, target),
        5 => {
            fetch_imm16(state, bus, cycle, 6, target);
            if !evaluate(state, cond) {
                skip_to_last_cycle(remaining);
            }
        }
        4 => state.sp = state.sp.wrapping_sub(1),
        3 => push_return_byte(state, bus, cycle, 3),
        2 => {
            push_return_byte(state, bus, cycle, 3);
            state.pc = *target;
        }
        _ => {}
    }
}

/// `RET` / `RET cc` / `RETI` (4 / 5 / 4 cycles).
///
/// RET cc spends its first cycle on the condition check; the unconditional
/// forms start directly at the stack reads.
pub(super) fn ret<B: Bus>(
    state: &mut CpuState,
    bus: &mut B,
    cycle: u8,
    cond: Option<Condition>,
    target: &mut u16,
    remaining: &mut u8,
) {
    match cycle {
        5 => {
            if !evaluate(state, cond) {
                skip_to_last_cycle(remaining);
            }
        }
        4 => *target = pop_byte(state, bus) as u16,
        3 => *target |= (pop_byte(state, bus) as u16) << 8,
        2 => state.pc = *target,
        _ => {}
    }
}

/// `RST n` (4 cycles): a one byte CALL to a fixed vector.
pub(super) fn rst<B: Bus>(state: &mut CpuState, bus: &mut B, cycle: u8, vector: u16) {
    match cycle {
        4 => state.sp = state.sp.wrapping_sub(1),
        3 => push_return_byte(state, bus, cycle, 3),
        2 => {
            push_return_byte(state, bus, cycle, 3);
            state.pc = vector;
        }
        _ => {}
    }
}
