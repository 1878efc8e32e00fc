//! Instructions as small per-opcode state machines.
//!
//! The decoder builds one [`Instruction`] per opcode occurrence. The driver
//! calls [`Instruction::execute_cycle`] once per machine cycle until
//! [`Instruction::is_fetch_necessary`] reports that the last cycle has run.
//! Cycle counts include the opcode fetch, which the SM83 overlaps with the
//! final cycle of the previous instruction; NOP is therefore one cycle.
//!
//! Each cycle action is selected by the remaining-cycle counter, so for a
//! four cycle instruction the arms run in the order 4, 3, 2, 1.

mod alu;
mod control;
mod display;
mod load;
mod prefixed;
mod stack;


use crate::regs::Registers;
use crate::{Bus, CpuState};

/// Branch condition encoded in bits 4-3 of JR/JP/CALL/RET cc opcodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    NotZero,
    Zero,
    NotCarry,
    Carry,
}

impl Condition {
    pub(crate) fn from_opcode(opcode: u8) -> Self {
        match (opcode >> 3) & 0x03 {
            0 => Condition::NotZero,
            1 => Condition::Zero,
            2 => Condition::NotCarry,
            _ => Condition::Carry,
        }
    }

    #[inline]
    pub fn holds(self, regs: &Registers) -> bool {
        match self {
            Condition::NotZero => !regs.zero(),
            Condition::Zero => regs.zero(),
            Condition::NotCarry => !regs.carry(),
            Condition::Carry => regs.carry(),
        }
    }
}

/// Register pair encoded in bits 5-4 of 16-bit load and arithmetic opcodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pair {
    BC,
    DE,
    HL,
    SP,
}

impl Pair {
    pub(crate) fn from_opcode(opcode: u8) -> Self {
        match (opcode >> 4) & 0x03 {
            0 => Pair::BC,
            1 => Pair::DE,
            2 => Pair::HL,
            _ => Pair::SP,
        }
    }

    pub(crate) fn get(self, state: &CpuState) -> u16 {
        match self {
            Pair::BC => state.regs.bc(),
            Pair::DE => state.regs.de(),
            Pair::HL => state.regs.hl(),
            Pair::SP => state.sp,
        }
    }

    pub(crate) fn set(self, state: &mut CpuState, value: u16) {
        match self {
            Pair::BC => state.regs.set_bc(value),
            Pair::DE => state.regs.set_de(value),
            Pair::HL => state.regs.set_hl(value),
            Pair::SP => state.sp = value,
        }
    }
}

/// Register pair operand of PUSH/POP. Same bit positions as [`Pair`], but
/// slot 3 selects AF instead of SP.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackPair {
    BC,
    DE,
    HL,
    AF,
}

impl StackPair {
    pub(crate) fn from_opcode(opcode: u8) -> Self {
        match (opcode >> 4) & 0x03 {
            0 => StackPair::BC,
            1 => StackPair::DE,
            2 => StackPair::HL,
            _ => StackPair::AF,
        }
    }

    pub(crate) fn get(self, regs: &Registers) -> u16 {
        match self {
            StackPair::BC => regs.bc(),
            StackPair::DE => regs.de(),
            StackPair::HL => regs.hl(),
            StackPair::AF => regs.af(),
        }
    }

    pub(crate) fn set(self, regs: &mut Registers, value: u16) {
        match self {
            StackPair::BC => regs.set_bc(value),
            StackPair::DE => regs.set_de(value),
            StackPair::HL => regs.set_hl(value),
            StackPair::AF => regs.set_af(value),
        }
    }
}

/// Address operand of `LD A,(rr)` / `LD (rr),A`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Indirect {
    BC,
    DE,
    /// `(HL+)`: use HL, then increment it.
    HlInc,
    /// `(HL-)`: use HL, then decrement it.
    HlDec,
}

impl Indirect {
    pub(crate) fn from_opcode(opcode: u8) -> Self {
        match (opcode >> 4) & 0x03 {
            0 => Indirect::BC,
            1 => Indirect::DE,
            2 => Indirect::HlInc,
            _ => Indirect::HlDec,
        }
    }

    /// Resolve the address and apply the HL post-increment/decrement.
    pub(crate) fn resolve(self, regs: &mut Registers) -> u16 {
        match self {
            Indirect::BC => regs.bc(),
            Indirect::DE => regs.de(),
            Indirect::HlInc => {
                let hl = regs.hl();
                regs.set_hl(hl.wrapping_add(1));
                hl
            }
            Indirect::HlDec => {
                let hl = regs.hl();
                regs.set_hl(hl.wrapping_sub(1));
                hl
            }
        }
    }
}

/// Accumulator operation selected by bits 5-3 of the 0x80-0xBF block and of
/// the `op A,d8` opcodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

impl AluOp {
    pub(crate) fn from_opcode(opcode: u8) -> Self {
        match (opcode >> 3) & 0x07 {
            0 => AluOp::Add,
            1 => AluOp::Adc,
            2 => AluOp::Sub,
            3 => AluOp::Sbc,
            4 => AluOp::And,
            5 => AluOp::Xor,
            6 => AluOp::Or,
            _ => AluOp::Cp,
        }
    }
}

/// Rotate/shift selected by bits 5-3 of the prefixed 0x00-0x3F block. The
/// first four also name the unprefixed accumulator rotates (RLCA..RRA).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShiftOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
}

impl ShiftOp {
    pub(crate) fn from_opcode(opcode: u8) -> Self {
        match (opcode >> 3) & 0x07 {
            0 => ShiftOp::Rlc,
            1 => ShiftOp::Rrc,
            2 => ShiftOp::Rl,
            3 => ShiftOp::Rr,
            4 => ShiftOp::Sla,
            5 => ShiftOp::Sra,
            6 => ShiftOp::Swap,
            _ => ShiftOp::Srl,
        }
    }
}

/// Every opcode family the SM83 implements, with the scratch state each one
/// carries between machine cycles.
///
/// Register operands are 3-bit indices as understood by
/// [`Registers::get`]; the decoder never stores index 6 in them since `(HL)`
/// operands get their own variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstructionKind {
    Nop,
    Stop,
    Halt,
    /// 0xCB escape into the prefixed table.
    Prefix,
    Di,
    Ei,
    Daa,
    Cpl,
    Scf,
    Ccf,
    /// RLCA/RRCA/RLA/RRA.
    RotateA { op: ShiftOp },

    LdRR { dst: u8, src: u8 },
    LdRHl { dst: u8, value: u8 },
    LdHlR { src: u8 },
    LdRImm { dst: u8, value: u8 },
    LdHlImm { value: u8 },
    LdAIndirect { src: Indirect, value: u8 },
    LdIndirectA { dst: Indirect },
    LdAAbs { addr: u16, value: u8 },
    LdAbsA { addr: u16 },
    /// LDH A,(a8)
    LdhAImm { offset: u8, value: u8 },
    /// LDH (a8),A
    LdhImmA { offset: u8 },
    /// LD A,(C)
    LdhAC { value: u8 },
    /// LD (C),A
    LdhCA,
    LdRrImm { dst: Pair, value: u16 },
    /// LD (a16),SP
    LdAbsSp { addr: u16 },
    LdSpHl,
    /// LD HL,SP+e8
    LdHlSpOffset { offset: u8 },

    Push { src: StackPair, value: u16 },
    Pop { dst: StackPair, value: u16 },

    IncR { r: u8 },
    DecR { r: u8 },
    IncHl { value: u8 },
    DecHl { value: u8 },
    IncRr { pair: Pair },
    DecRr { pair: Pair },
    AddHlRr { src: Pair },
    AddSpOffset { offset: u8 },
    Alu { op: AluOp, src: u8 },
    AluHl { op: AluOp, value: u8 },
    AluImm { op: AluOp, value: u8 },

    Jr { cond: Option<Condition>, offset: u8 },
    Jp { cond: Option<Condition>, target: u16 },
    JpHl,
    Call { cond: Option<Condition>, target: u16 },
    Ret { cond: Option<Condition>, target: u16 },
    Reti { target: u16 },
    Rst { vector: u16 },

    // Prefixed table.
    Shift { op: ShiftOp, r: u8 },
    ShiftHl { op: ShiftOp, value: u8 },
    Bit { bit: u8, r: u8 },
    BitHl { bit: u8 },
    Res { bit: u8, r: u8 },
    ResHl { bit: u8, value: u8 },
    Set { bit: u8, r: u8 },
    SetHl { bit: u8, value: u8 },
}

impl InstructionKind {
    /// Total machine cycles, including the overlapped fetch. Conditional
    /// control flow reports its taken length here and shortens itself at
    /// run time when the condition fails.
    pub fn cycles(&self) -> u8 {
        use InstructionKind::*;
        match self {
            Nop | Stop | Halt | Prefix | Di | Ei | Daa | Cpl | Scf | Ccf | RotateA { .. } => 1,
            LdRR { .. } | IncR { .. } | DecR { .. } | Alu { .. } | JpHl => 1,
            Shift { .. } | Bit { .. } | Res { .. } | Set { .. } => 1,

            LdRHl { .. } | LdHlR { .. } | LdRImm { .. } => 2,
            LdAIndirect { .. } | LdIndirectA { .. } | LdhAC { .. } | LdhCA => 2,
            IncRr { .. } | DecRr { .. } | AddHlRr { .. } | LdSpHl => 2,
            AluHl { .. } | AluImm { .. } | BitHl { .. } => 2,

            LdHlImm { .. } | LdhAImm { .. } | LdhImmA { .. } | LdRrImm { .. } => 3,
            LdHlSpOffset { .. } | Pop { .. } | IncHl { .. } | DecHl { .. } => 3,
            Jr { .. } | ShiftHl { .. } | ResHl { .. } | SetHl { .. } => 3,

            LdAAbs { .. } | LdAbsA { .. } | Push { .. } | AddSpOffset { .. } => 4,
            Jp { .. } | Reti { .. } | Rst { .. } => 4,
            Ret { cond: None, .. } => 4,
            Ret { cond: Some(_), .. } => 5,
            LdAbsSp { .. } => 5,
            Call { .. } => 6,
        }
    }
}

/// One in-flight opcode occurrence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    opcode: u8,
    prefixed: bool,
    length: u8,
    remaining: u8,
    kind: InstructionKind,
}

impl Instruction {
    pub(crate) fn new(opcode: u8, kind: InstructionKind) -> Self {
        let length = kind.cycles();
        Self {
            opcode,
            prefixed: false,
            length,
            remaining: length,
            kind,
        }
    }

    pub(crate) fn new_prefixed(opcode: u8, kind: InstructionKind) -> Self {
        Self {
            prefixed: true,
            ..Self::new(opcode, kind)
        }
    }

    #[inline]
    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    /// `true` for instructions decoded from the 0xCB table.
    #[inline]
    pub fn is_prefixed(&self) -> bool {
        self.prefixed
    }

    #[inline]
    pub fn kind(&self) -> &InstructionKind {
        &self.kind
    }

    /// Nominal length in machine cycles (the taken length for conditional
    /// control flow).
    #[inline]
    pub fn length(&self) -> u8 {
        self.length
    }

    #[inline]
    pub fn remaining(&self) -> u8 {
        self.remaining
    }

    /// `true` once the final cycle has run and the driver must fetch.
    #[inline]
    pub fn is_fetch_necessary(&self) -> bool {
        self.remaining == 0
    }

    /// Run one machine cycle of this instruction.
    ///
    /// Calling this after the instruction has finished is a no-op.
    pub fn execute_cycle<B: Bus>(&mut self, state: &mut CpuState, bus: &mut B) {
        if self.remaining == 0 {
            return;
        }
        let cycle = self.remaining;
        let remaining = &mut self.remaining;

        use InstructionKind::*;
        match &mut self.kind {
            Nop => {}
            Stop => state.stopped = true,
            Halt => state.halted = true,
            Prefix => state.prefixed = true,
            Di => {
                state.ime = false;
                state.ime_scheduled = false;
            }
            Ei => state.ime_scheduled = true,
            Daa => state.regs.alu_daa(),
            Cpl => {
                state.regs.a = !state.regs.a;
                state.regs.set_subtract(true);
                state.regs.set_half_carry(true);
            }
            Scf => {
                state.regs.set_subtract(false);
                state.regs.set_half_carry(false);
                state.regs.set_carry(true);
            }
            Ccf => {
                let carry = state.regs.carry();
                state.regs.set_subtract(false);
                state.regs.set_half_carry(false);
                state.regs.set_carry(!carry);
            }
            RotateA { op } => {
                let a = state.regs.a;
                state.regs.a = state.regs.alu_shift(*op, a);
                // Unlike the prefixed forms, the accumulator rotates always
                // clear Z.
                state.regs.set_zero(false);
            }

            LdRR { dst, src } => load::ld_r_r(state, *dst, *src),
            LdRHl { dst, value } => load::ld_r_hl(state, bus, cycle, *dst, value),
            LdHlR { src } => load::ld_hl_r(state, bus, cycle, *src),
            LdRImm { dst, value } => load::ld_r_imm(state, bus, cycle, *dst, value),
            LdHlImm { value } => load::ld_hl_imm(state, bus, cycle, value),
            LdAIndirect { src, value } => load::ld_a_indirect(state, bus, cycle, *src, value),
            LdIndirectA { dst } => load::ld_indirect_a(state, bus, cycle, *dst),
            LdAAbs { addr, value } => load::ld_a_abs(state, bus, cycle, addr, value),
            LdAbsA { addr } => load::ld_abs_a(state, bus, cycle, addr),
            LdhAImm { offset, value } => load::ldh_a_imm(state, bus, cycle, offset, value),
            LdhImmA { offset } => load::ldh_imm_a(state, bus, cycle, offset),
            LdhAC { value } => load::ldh_a_c(state, bus, cycle, value),
            LdhCA => load::ldh_c_a(state, bus, cycle),
            LdRrImm { dst, value } => load::ld_rr_imm(state, bus, cycle, *dst, value),
            LdAbsSp { addr } => load::ld_abs_sp(state, bus, cycle, addr),
            LdSpHl => load::ld_sp_hl(state, cycle),
            LdHlSpOffset { offset } => load::ld_hl_sp_offset(state, bus, cycle, offset),

            Push { src, value } => stack::push(state, bus, cycle, *src, value),
            Pop { dst, value } => stack::pop(state, bus, cycle, *dst, value),

            IncR { r } => {
                let value = state.regs.reg8(*r);
                let result = state.regs.alu_inc8(value);
                state.regs.set_reg8(*r, result);
            }
            DecR { r } => {
                let value = state.regs.reg8(*r);
                let result = state.regs.alu_dec8(value);
                state.regs.set_reg8(*r, result);
            }
            IncHl { value } => alu::inc_hl(state, bus, cycle, value),
            DecHl { value } => alu::dec_hl(state, bus, cycle, value),
            IncRr { pair } => {
                if cycle == 1 {
                    let value = pair.get(state).wrapping_add(1);
                    pair.set(state, value);
                }
            }
            DecRr { pair } => {
                if cycle == 1 {
                    let value = pair.get(state).wrapping_sub(1);
                    pair.set(state, value);
                }
            }
            AddHlRr { src } => {
                if cycle == 1 {
                    let value = src.get(state);
                    state.regs.alu_add16_hl(value);
                }
            }
            AddSpOffset { offset } => alu::add_sp_offset(state, bus, cycle, offset),
            Alu { op, src } => {
                let value = state.regs.reg8(*src);
                state.regs.alu(*op, value);
            }
            AluHl { op, value } => alu::alu_hl(state, bus, cycle, *op, value),
            AluImm { op, value } => alu::alu_imm(state, bus, cycle, *op, value),

            Jr { cond, offset } => control::jr(state, bus, cycle, *cond, offset, remaining),
            Jp { cond, target } => control::jp(state, bus, cycle, *cond, target, remaining),
            JpHl => state.pc = state.regs.hl(),
            Call { cond, target } => control::call(state, bus, cycle, *cond, target, remaining),
            Ret { cond, target } => control::ret(state, bus, cycle, *cond, target, remaining),
            Reti { target } => {
                control::ret(state, bus, cycle, None, target, remaining);
                if cycle == 2 {
                    state.ime = true;
                }
            }
            Rst { vector } => control::rst(state, bus, cycle, *vector),

            Shift { op, r } => {
                let value = state.regs.reg8(*r);
                let result = state.regs.alu_shift(*op, value);
                state.regs.set_reg8(*r, result);
            }
            ShiftHl { op, value } => prefixed::shift_hl(state, bus, cycle, *op, value),
            Bit { bit, r } => {
                let value = state.regs.reg8(*r);
                state.regs.alu_bit(*bit, value);
            }
            BitHl { bit } => prefixed::bit_hl(state, bus, cycle, *bit),
            Res { bit, r } => {
                let value = state.regs.reg8(*r) & !(1 << *bit);
                state.regs.set_reg8(*r, value);
            }
            ResHl { bit, value } => prefixed::res_hl(state, bus, cycle, *bit, value),
            Set { bit, r } => {
                let value = state.regs.reg8(*r) | (1 << *bit);
                state.regs.set_reg8(*r, value);
            }
            SetHl { bit, value } => prefixed::set_hl(state, bus, cycle, *bit, value),
        }

        self.remaining -= 1;
    }
}

/// Shorten a conditional instruction whose condition failed: after the
/// current cycle only the final idle cycle is left.
#[inline]
fn skip_to_last_cycle(remaining: &mut u8) {
    *remaining = 2;
}
