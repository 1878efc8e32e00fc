//! Opcode decoding for both instruction tables.
//!
//! The unprefixed map is irregular, so it is matched as an ordered list of
//! bit-mask rules: exact opcodes and the most specific exclusions come
//! first, whole-family patterns after them. Field layout used throughout:
//!
//! ```text
//!   7 6 | 5 4 3 | 2 1 0
//!   grp |   y   |   z        y: destination register / ALU op / bit index
//!         p  q               p: register pair (bits 5-4), cc: bits 4-3
//! ```

#[cfg(test)]
mod tests;

use crate::error::UnknownOpcode;
use crate::instr::{
    AluOp, Condition, Indirect, Instruction, InstructionKind, Pair, ShiftOp, StackPair,
};
use crate::regs::HL_INDEX;

#[inline]
fn dst_field(opcode: u8) -> u8 {
    (opcode >> 3) & 0x07
}

#[inline]
fn src_field(opcode: u8) -> u8 {
    opcode & 0x07
}

/// Decode an opcode from the unprefixed table.
///
/// Fails for the eleven opcode holes (D3, DB, DD, E3, E4, EB, EC, ED, F4,
/// FC, FD).
pub fn decode(opcode: u8) -> Result<Instruction, UnknownOpcode> {
    use InstructionKind::*;

    let kind = match opcode {
        // Single opcodes.
        0x00 => Nop,
        0x10 => Stop,
        0x76 => Halt,
        0xCB => Prefix,
        0xF3 => Di,
        0xFB => Ei,
        0x07 => RotateA { op: ShiftOp::Rlc },
        0x0F => RotateA { op: ShiftOp::Rrc },
        0x17 => RotateA { op: ShiftOp::Rl },
        0x1F => RotateA { op: ShiftOp::Rr },
        0x27 => Daa,
        0x2F => Cpl,
        0x37 => Scf,
        0x3F => Ccf,
        0x08 => LdAbsSp { addr: 0 },
        0x18 => Jr { cond: None, offset: 0 },
        0x34 => IncHl { value: 0 },
        0x35 => DecHl { value: 0 },
        0x36 => LdHlImm { value: 0 },
        0xC3 => Jp { cond: None, target: 0 },
        0xC9 => Ret { cond: None, target: 0 },
        0xCD => Call { cond: None, target: 0 },
        0xD9 => Reti { target: 0 },
        0xE0 => LdhImmA { offset: 0 },
        0xF0 => LdhAImm { offset: 0, value: 0 },
        0xE2 => LdhCA,
        0xF2 => LdhAC { value: 0 },
        0xE8 => AddSpOffset { offset: 0 },
        0xF8 => LdHlSpOffset { offset: 0 },
        0xE9 => JpHl,
        0xF9 => LdSpHl,
        0xEA => LdAbsA { addr: 0 },
        0xFA => LdAAbs { addr: 0, value: 0 },

        // 16-bit pair families: pair in bits 5-4, fixed low nibble.
        op if op & 0xCF == 0x01 => LdRrImm { dst: Pair::from_opcode(op), value: 0 },
        op if op & 0xCF == 0x02 => LdIndirectA { dst: Indirect::from_opcode(op) },
        op if op & 0xCF == 0x0A => LdAIndirect { src: Indirect::from_opcode(op), value: 0 },
        op if op & 0xCF == 0x03 => IncRr { pair: Pair::from_opcode(op) },
        op if op & 0xCF == 0x0B => DecRr { pair: Pair::from_opcode(op) },
        op if op & 0xCF == 0x09 => AddHlRr { src: Pair::from_opcode(op) },
        op if op & 0xCF == 0xC1 => Pop { dst: StackPair::from_opcode(op), value: 0 },
        op if op & 0xCF == 0xC5 => Push { src: StackPair::from_opcode(op), value: 0 },

        // 8-bit register families in the 0x00-0x3F block; the (HL) rows
        // (0x34/0x35/0x36) were matched above.
        op if op & 0xC7 == 0x04 => IncR { r: dst_field(op) },
        op if op & 0xC7 == 0x05 => DecR { r: dst_field(op) },
        op if op & 0xC7 == 0x06 => LdRImm { dst: dst_field(op), value: 0 },

        // Conditional control flow: condition in bits 4-3.
        op if op & 0xE7 == 0x20 => Jr { cond: Some(Condition::from_opcode(op)), offset: 0 },
        op if op & 0xE7 == 0xC0 => Ret { cond: Some(Condition::from_opcode(op)), target: 0 },
        op if op & 0xE7 == 0xC2 => Jp { cond: Some(Condition::from_opcode(op)), target: 0 },
        op if op & 0xE7 == 0xC4 => Call { cond: Some(Condition::from_opcode(op)), target: 0 },

        op if op & 0xC7 == 0xC7 => Rst { vector: (op & 0x38) as u16 },
        op if op & 0xC7 == 0xC6 => AluImm { op: AluOp::from_opcode(op), value: 0 },

        // 0x40-0x7F loads (0x76 is HALT, matched above).
        op if op & 0xC0 == 0x40 => match (dst_field(op), src_field(op)) {
            (dst, HL_INDEX) => LdRHl { dst, value: 0 },
            (HL_INDEX, src) => LdHlR { src },
            (dst, src) => LdRR { dst, src },
        },

        // 0x80-0xBF accumulator arithmetic.
        op if op & 0xC0 == 0x80 => match src_field(op) {
            HL_INDEX => AluHl { op: AluOp::from_opcode(op), value: 0 },
            src => Alu { op: AluOp::from_opcode(op), src },
        },

        op => return Err(UnknownOpcode(op)),
    };

    Ok(Instruction::new(opcode, kind))
}

/// Decode the byte following a 0xCB escape. Every value is defined.
///
/// Bits 7-6 select the group (rotate/shift, BIT, RES, SET), bits 5-3 the
/// shift operation or bit index, bits 2-0 the operand.
pub fn decode_prefixed(opcode: u8) -> Instruction {
    use InstructionKind::*;

    let bit = dst_field(opcode);
    let operand = src_field(opcode);
    let on_hl = operand == HL_INDEX;

    let kind = match opcode >> 6 {
        0 => {
            let op = ShiftOp::from_opcode(opcode);
            if on_hl {
                ShiftHl { op, value: 0 }
            } else {
                Shift { op, r: operand }
            }
        }
        1 if on_hl => BitHl { bit },
        1 => Bit { bit, r: operand },
        2 if on_hl => ResHl { bit, value: 0 },
        2 => Res { bit, r: operand },
        _ if on_hl => SetHl { bit, value: 0 },
        _ => Set { bit, r: operand },
    };

    Instruction::new_prefixed(opcode, kind)
}
