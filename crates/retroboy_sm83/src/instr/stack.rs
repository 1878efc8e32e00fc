use crate::{Bus, CpuState};

use super::StackPair;

/// `PUSH rr` (4 cycles).
///
/// The pair is latched on the first cycle. The stack grows downward, so
/// the high byte lands at SP-1 and the low byte at SP-2.
pub(super) fn push<B: Bus>(state: &mut CpuState, bus: &mut B, cycle: u8, src: StackPair, value: &mut u16) {
    match cycle {
        4 => {
            *value = src.get(&state.regs);
            state.sp = state.sp.wrapping_sub(1);
        }
        3 => {
            bus.write8(state.sp, (*value >> 8) as u8);
            state.sp = state.sp.wrapping_sub(1);
        }
        2 => bus.write8(state.sp, *value as u8),
        _ => {}
    }
}

/// `POP rr` (3 cycles). Popping into AF drops the low nibble of F.
pub(super) fn pop<B: Bus>(state: &mut CpuState, bus: &mut B, cycle: u8, dst: StackPair, value: &mut u16) {
    match cycle {
        3 => *value = pop_byte(state, bus) as u16,
        2 => *value |= (pop_byte(state, bus) as u16) << 8,
        _ => dst.set(&mut state.regs, *value),
    }
}

#[inline]
pub(super) fn pop_byte<B: Bus>(state: &mut CpuState, bus: &mut B) -> u8 {
    let value = bus.read8(state.sp);
    state.sp = state.sp.wrapping_add(1);
    value
}

/// Push one byte of the return address: the high byte on `hi_cycle`, the
/// low byte on the cycle after it. The stack pointer must already have
/// been moved onto the first free slot by an earlier internal cycle.
#[inline]
pub(super) fn push_return_byte<B: Bus>(state: &mut CpuState, bus: &mut B, cycle: u8, hi_cycle: u8) {
    let [hi, lo] = state.pc.to_be_bytes();
    if cycle == hi_cycle {
        bus.write8(state.sp, hi);
        state.sp = state.sp.wrapping_sub(1);
    } else if cycle + 1 == hi_cycle {
        bus.write8(state.sp, lo);
    }
}
