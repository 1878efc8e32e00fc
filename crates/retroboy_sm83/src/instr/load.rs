//! 8-bit and 16-bit loads.
//!
//! Operand bytes are read on the earliest cycles, memory is accessed next,
//! and register writes land on the final cycle.

use crate::{Bus, CpuState};

use super::{Indirect, Pair};

const HIGH_PAGE: u16 = 0xFF00;

#[inline]
pub(super) fn ld_r_r(state: &mut CpuState, dst: u8, src: u8) {
    let value = state.regs.reg8(src);
    state.regs.set_reg8(dst, value);
}

pub(super) fn ld_r_hl<B: Bus>(state: &mut CpuState, bus: &mut B, cycle: u8, dst: u8, value: &mut u8) {
    match cycle {
        2 => *value = bus.read8(state.regs.hl()),
        1 => state.regs.set_reg8(dst, *value),
        _ => {}
    }
}

pub(super) fn ld_hl_r<B: Bus>(state: &mut CpuState, bus: &mut B, cycle: u8, src: u8) {
    if cycle == 2 {
        bus.write8(state.regs.hl(), state.regs.reg8(src));
    }
}

pub(super) fn ld_r_imm<B: Bus>(state: &mut CpuState, bus: &mut B, cycle: u8, dst: u8, value: &mut u8) {
    match cycle {
        2 => *value = state.fetch8(bus),
        1 => state.regs.set_reg8(dst, *value),
        _ => {}
    }
}

pub(super) fn ld_hl_imm<B: Bus>(state: &mut CpuState, bus: &mut B, cycle: u8, value: &mut u8) {
    match cycle {
        3 => *value = state.fetch8(bus),
        2 => bus.write8(state.regs.hl(), *value),
        _ => {}
    }
}

pub(super) fn ld_a_indirect<B: Bus>(
    state: &mut CpuState,
    bus: &mut B,
    cycle: u8,
    src: Indirect,
    value: &mut u8,
) {
    match cycle {
        2 => {
            let addr = src.resolve(&mut state.regs);
            *value = bus.read8(addr);
        }
        1 => state.regs.a = *value,
        _ => {}
    }
}

pub(super) fn ld_indirect_a<B: Bus>(state: &mut CpuState, bus: &mut B, cycle: u8, dst: Indirect) {
    if cycle == 2 {
        let addr = dst.resolve(&mut state.regs);
        bus.write8(addr, state.regs.a);
    }
}

/// Latch one byte of a little-endian 16-bit operand from PC: the low byte
/// on `lo_cycle`, the high byte on the cycle after it.
#[inline]
pub(super) fn fetch_imm16<B: Bus>(state: &mut CpuState, bus: &mut B, cycle: u8, lo_cycle: u8, imm: &mut u16) {
    if cycle == lo_cycle {
        *imm = state.fetch8(bus) as u16;
    } else if cycle + 1 == lo_cycle {
        *imm |= (state.fetch8(bus) as u16) << 8;
    }
}

/// `LD A,(a16)` (4 cycles).
pub(super) fn ld_a_abs<B: Bus>(state: &mut CpuState, bus: &mut B, cycle: u8, addr: &mut u16, value: &mut u8) {
    match cycle {
        4 | 3 => fetch_imm16(state, bus, cycle, 4, addr),
        2 => *value = bus.read8(*addr),
        _ => state.regs.a = *value,
    }
}

/// `LD (a16),A` (4 cycles).
pub(super) fn ld_abs_a<B: Bus>(state: &mut CpuState, bus: &mut B, cycle: u8, addr: &mut u16) {
    match cycle {
        4 | 3 => fetch_imm16(state, bus, cycle, 4, addr),
        2 => bus.write8(*addr, state.regs.a),
        _ => {}
    }
}

/// `LDH A,(a8)` (3 cycles): offset read, then a read from 0xFF00 + a8.
pub(super) fn ldh_a_imm<B: Bus>(state: &mut CpuState, bus: &mut B, cycle: u8, offset: &mut u8, value: &mut u8) {
    match cycle {
        3 => *offset = state.fetch8(bus),
        2 => *value = bus.read8(HIGH_PAGE | *offset as u16),
        _ => state.regs.a = *value,
    }
}

/// `LDH (a8),A` (3 cycles).
pub(super) fn ldh_imm_a<B: Bus>(state: &mut CpuState, bus: &mut B, cycle: u8, offset: &mut u8) {
    match cycle {
        3 => *offset = state.fetch8(bus),
        2 => bus.write8(HIGH_PAGE | *offset as u16, state.regs.a),
        _ => {}
    }
}

pub(super) fn ldh_a_c<B: Bus>(state: &mut CpuState, bus: &mut B, cycle: u8, value: &mut u8) {
    match cycle {
        2 => *value = bus.read8(HIGH_PAGE | state.regs.c as u16),
        _ => state.regs.a = *value,
    }
}

pub(super) fn ldh_c_a<B: Bus>(state: &mut CpuState, bus: &mut B, cycle: u8) {
    if cycle == 2 {
        bus.write8(HIGH_PAGE | state.regs.c as u16, state.regs.a);
    }
}

/// `LD rr,d16` (3 cycles).
pub(super) fn ld_rr_imm<B: Bus>(state: &mut CpuState, bus: &mut B, cycle: u8, dst: Pair, value: &mut u16) {
    match cycle {
        3 | 2 => fetch_imm16(state, bus, cycle, 3, value),
        _ => dst.set(state, *value),
    }
}

/// `LD (a16),SP` (5 cycles): address read, then SP low and high bytes
/// written on separate cycles.
pub(super) fn ld_abs_sp<B: Bus>(state: &mut CpuState, bus: &mut B, cycle: u8, addr: &mut u16) {
    let [sp_hi, sp_lo] = state.sp.to_be_bytes();
    match cycle {
        5 | 4 => fetch_imm16(state, bus, cycle, 5, addr),
        3 => bus.write8(*addr, sp_lo),
        2 => bus.write8(addr.wrapping_add(1), sp_hi),
        _ => {}
    }
}

/// `LD SP,HL` (2 cycles): one internal cycle, then the copy.
pub(super) fn ld_sp_hl(state: &mut CpuState, cycle: u8) {
    if cycle == 1 {
        state.sp = state.regs.hl();
    }
}

/// `LD HL,SP+e8` (3 cycles).
pub(super) fn ld_hl_sp_offset<B: Bus>(state: &mut CpuState, bus: &mut B, cycle: u8, offset: &mut u8) {
    match cycle {
        3 => *offset = state.fetch8(bus),
        1 => {
            let sp = state.sp;
            let value = state.regs.alu_add16_signed(sp, *offset);
            state.regs.set_hl(value);
        }
        _ => {}
    }
}
