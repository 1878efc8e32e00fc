use crate::regs::Registers;
use crate::{Bus, CpuState};

use super::{AluOp, ShiftOp};

impl Registers {
    /// Dispatch an accumulator operation.
    pub(crate) fn alu(&mut self, op: AluOp, value: u8) {
        match op {
            AluOp::Add => self.alu_add(value, false),
            AluOp::Adc => self.alu_add(value, true),
            AluOp::Sub => self.alu_sub(value, true, false),
            AluOp::Sbc => self.alu_sub(value, true, true),
            AluOp::And => self.alu_and(value),
            AluOp::Xor => self.alu_xor(value),
            AluOp::Or => self.alu_or(value),
            AluOp::Cp => self.alu_sub(value, false, false),
        }
    }

    /// Core 8-bit ADD/ADC operation on A.
    ///
    /// `use_carry` selects between ADD (false) and ADC (true).
    pub(crate) fn alu_add(&mut self, value: u8, use_carry: bool) {
        let a = self.a;
        let carry_in = u8::from(use_carry && self.carry());

        let half = (a & 0x0F) + (value & 0x0F) + carry_in;
        let full = a as u16 + value as u16 + carry_in as u16;
        let result = full as u8;

        self.a = result;
        self.set_flags(result == 0, false, half > 0x0F, full > 0xFF);
    }

    /// Core 8-bit SUB/SBC/CP operation on A.
    ///
    /// `store` is false for CP, which only sets flags. `use_carry` selects
    /// SBC.
    pub(crate) fn alu_sub(&mut self, value: u8, store: bool, use_carry: bool) {
        let a = self.a;
        let carry_in = i16::from(use_carry && self.carry());

        let half = (a & 0x0F) as i16 - (value & 0x0F) as i16 - carry_in;
        let full = a as i16 - value as i16 - carry_in;
        let result = full as u8;

        if store {
            self.a = result;
        }
        self.set_flags(result == 0, true, half < 0, full < 0);
    }

    #[inline]
    pub(crate) fn alu_and(&mut self, value: u8) {
        self.a &= value;
        self.set_flags(self.a == 0, false, true, false);
    }

    #[inline]
    pub(crate) fn alu_or(&mut self, value: u8) {
        self.a |= value;
        self.set_flags(self.a == 0, false, false, false);
    }

    #[inline]
    pub(crate) fn alu_xor(&mut self, value: u8) {
        self.a ^= value;
        self.set_flags(self.a == 0, false, false, false);
    }

    /// Decimal adjust accumulator after BCD addition/subtraction.
    ///
    /// Uses C, H, N and A to compute a correction value. Updates A, Z, H,
    /// C; leaves N unchanged.
    pub(crate) fn alu_daa(&mut self) {
        let mut a = self.a;
        let mut adjust: u8 = if self.carry() { 0x60 } else { 0x00 };
        if self.half_carry() {
            adjust |= 0x06;
        }

        if !self.subtract() {
            // After an addition.
            if (a & 0x0F) > 0x09 {
                adjust |= 0x06;
            }
            if a > 0x99 {
                adjust |= 0x60;
            }
            a = a.wrapping_add(adjust);
        } else {
            // After a subtraction.
            a = a.wrapping_sub(adjust);
        }

        self.set_carry(adjust >= 0x60);
        self.set_half_carry(false);
        self.set_zero(a == 0);
        self.a = a;
    }

    /// 8-bit increment used by INC r and INC (HL).
    ///
    /// Updates Z, N, H while leaving C unchanged.
    #[inline]
    pub(crate) fn alu_inc8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.set_zero(result == 0);
        self.set_subtract(false);
        self.set_half_carry((value & 0x0F) == 0x0F);
        result
    }

    /// 8-bit decrement used by DEC r and DEC (HL).
    ///
    /// Updates Z, N, H while leaving C unchanged.
    #[inline]
    pub(crate) fn alu_dec8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.set_zero(result == 0);
        self.set_subtract(true);
        self.set_half_carry((value & 0x0F) == 0);
        result
    }

    /// `ADD HL,rr`: Z is unaffected, N is cleared, H and C come from bits 11
    /// and 15.
    #[inline]
    pub(crate) fn alu_add16_hl(&mut self, value: u16) {
        let hl = self.hl();

        self.set_subtract(false);
        self.set_half_carry((hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF);
        self.set_carry(hl as u32 + value as u32 > 0xFFFF);

        self.set_hl(hl.wrapping_add(value));
    }

    /// Add a signed 8-bit immediate to a 16-bit base (ADD SP,e8 and
    /// LD HL,SP+e8).
    ///
    /// Z and N are cleared; H and C are computed from the unsigned low byte
    /// addition.
    #[inline]
    pub(crate) fn alu_add16_signed(&mut self, base: u16, imm8: u8) -> u16 {
        let offset = imm8 as i8 as i16 as u16;
        self.set_flags(
            false,
            false,
            (base & 0x000F) + (offset & 0x000F) > 0x000F,
            (base & 0x00FF) + (offset & 0x00FF) > 0x00FF,
        );
        base.wrapping_add(offset)
    }

    /// Rotate/shift/swap used by the prefixed table and (with Z forced
    /// clear by the caller) by RLCA/RRCA/RLA/RRA.
    pub(crate) fn alu_shift(&mut self, op: ShiftOp, value: u8) -> u8 {
        let carry_in = self.carry();
        let (result, carry) = match op {
            ShiftOp::Rlc => (value.rotate_left(1), value & 0x80 != 0),
            ShiftOp::Rrc => (value.rotate_right(1), value & 0x01 != 0),
            ShiftOp::Rl => ((value << 1) | u8::from(carry_in), value & 0x80 != 0),
            ShiftOp::Rr => ((value >> 1) | (u8::from(carry_in) << 7), value & 0x01 != 0),
            ShiftOp::Sla => (value << 1, value & 0x80 != 0),
            ShiftOp::Sra => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
            ShiftOp::Swap => (value.rotate_left(4), false),
            ShiftOp::Srl => (value >> 1, value & 0x01 != 0),
        };
        self.set_flags(result == 0, false, false, carry);
        result
    }

    /// `BIT b`: Z is the complement of the tested bit, N=0, H=1, C kept.
    #[inline]
    pub(crate) fn alu_bit(&mut self, bit: u8, value: u8) {
        self.set_zero(value & (1 << bit) == 0);
        self.set_subtract(false);
        self.set_half_carry(true);
    }
}

pub(super) fn inc_hl<B: Bus>(state: &mut CpuState, bus: &mut B, cycle: u8, value: &mut u8) {
    match cycle {
        3 => *value = bus.read8(state.regs.hl()),
        2 => {
            let result = state.regs.alu_inc8(*value);
            bus.write8(state.regs.hl(), result);
        }
        _ => {}
    }
}

pub(super) fn dec_hl<B: Bus>(state: &mut CpuState, bus: &mut B, cycle: u8, value: &mut u8) {
    match cycle {
        3 => *value = bus.read8(state.regs.hl()),
        2 => {
            let result = state.regs.alu_dec8(*value);
            bus.write8(state.regs.hl(), result);
        }
        _ => {}
    }
}

pub(super) fn alu_hl<B: Bus>(state: &mut CpuState, bus: &mut B, cycle: u8, op: AluOp, value: &mut u8) {
    match cycle {
        2 => *value = bus.read8(state.regs.hl()),
        1 => state.regs.alu(op, *value),
        _ => {}
    }
}

pub(super) fn alu_imm<B: Bus>(state: &mut CpuState, bus: &mut B, cycle: u8, op: AluOp, value: &mut u8) {
    match cycle {
        2 => *value = state.fetch8(bus),
        1 => state.regs.alu(op, *value),
        _ => {}
    }
}

/// `ADD SP,e8` (4 cycles): operand read, two internal cycles, then SP is
/// updated.
pub(super) fn add_sp_offset<B: Bus>(state: &mut CpuState, bus: &mut B, cycle: u8, offset: &mut u8) {
    match cycle {
        4 => *offset = state.fetch8(bus),
        1 => {
            let sp = state.sp;
            state.sp = state.regs.alu_add16_signed(sp, *offset);
        }
        _ => {}
    }
}
