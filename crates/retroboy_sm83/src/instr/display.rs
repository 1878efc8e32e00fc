use std::fmt;

use super::{AluOp, Condition, Indirect, Instruction, InstructionKind, Pair, ShiftOp, StackPair};

const REG_NAMES: [&str; 8] = ["B", "C", "D", "E", "H", "L", "(HL)", "A"];

fn reg(index: u8) -> &'static str {
    REG_NAMES[(index & 0x07) as usize]
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Condition::NotZero => "NZ",
            Condition::Zero => "Z",
            Condition::NotCarry => "NC",
            Condition::Carry => "C",
        })
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Pair::BC => "BC",
            Pair::DE => "DE",
            Pair::HL => "HL",
            Pair::SP => "SP",
        })
    }
}

impl fmt::Display for StackPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StackPair::BC => "BC",
            StackPair::DE => "DE",
            StackPair::HL => "HL",
            StackPair::AF => "AF",
        })
    }
}

impl fmt::Display for Indirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Indirect::BC => "(BC)",
            Indirect::DE => "(DE)",
            Indirect::HlInc => "(HL+)",
            Indirect::HlDec => "(HL-)",
        })
    }
}

impl AluOp {
    /// Mnemonic including the implied accumulator operand where the
    /// assembler spells it out.
    fn prefix(self) -> &'static str {
        match self {
            AluOp::Add => "ADD A,",
            AluOp::Adc => "ADC A,",
            AluOp::Sub => "SUB ",
            AluOp::Sbc => "SBC A,",
            AluOp::And => "AND ",
            AluOp::Xor => "XOR ",
            AluOp::Or => "OR ",
            AluOp::Cp => "CP ",
        }
    }
}

impl ShiftOp {
    fn mnemonic(self) -> &'static str {
        match self {
            ShiftOp::Rlc => "RLC",
            ShiftOp::Rrc => "RRC",
            ShiftOp::Rl => "RL",
            ShiftOp::Rr => "RR",
            ShiftOp::Sla => "SLA",
            ShiftOp::Sra => "SRA",
            ShiftOp::Swap => "SWAP",
            ShiftOp::Srl => "SRL",
        }
    }
}

fn with_cond(f: &mut fmt::Formatter<'_>, name: &str, cond: Option<Condition>, operand: &str) -> fmt::Result {
    match (cond, operand.is_empty()) {
        (Some(cond), true) => write!(f, "{name} {cond}"),
        (Some(cond), false) => write!(f, "{name} {cond},{operand}"),
        (None, true) => f.write_str(name),
        (None, false) => write!(f, "{name} {operand}"),
    }
}

/// Assembler mnemonic of the opcode family with operand placeholders, e.g.
/// `LD B,d8` or `CALL NZ,a16`. Scratch values are not shown.
impl fmt::Display for InstructionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use InstructionKind::*;
        match *self {
            Nop => f.write_str("NOP"),
            Stop => f.write_str("STOP"),
            Halt => f.write_str("HALT"),
            Prefix => f.write_str("PREFIX CB"),
            Di => f.write_str("DI"),
            Ei => f.write_str("EI"),
            Daa => f.write_str("DAA"),
            Cpl => f.write_str("CPL"),
            Scf => f.write_str("SCF"),
            Ccf => f.write_str("CCF"),
            RotateA { op } => write!(f, "{}A", op.mnemonic()),

            LdRR { dst, src } => write!(f, "LD {},{}", reg(dst), reg(src)),
            LdRHl { dst, .. } => write!(f, "LD {},(HL)", reg(dst)),
            LdHlR { src } => write!(f, "LD (HL),{}", reg(src)),
            LdRImm { dst, .. } => write!(f, "LD {},d8", reg(dst)),
            LdHlImm { .. } => f.write_str("LD (HL),d8"),
            LdAIndirect { src, .. } => write!(f, "LD A,{src}"),
            LdIndirectA { dst } => write!(f, "LD {dst},A"),
            LdAAbs { .. } => f.write_str("LD A,(a16)"),
            LdAbsA { .. } => f.write_str("LD (a16),A"),
            LdhAImm { .. } => f.write_str("LDH A,(a8)"),
            LdhImmA { .. } => f.write_str("LDH (a8),A"),
            LdhAC { .. } => f.write_str("LD A,(C)"),
            LdhCA => f.write_str("LD (C),A"),
            LdRrImm { dst, .. } => write!(f, "LD {dst},d16"),
            LdAbsSp { .. } => f.write_str("LD (a16),SP"),
            LdSpHl => f.write_str("LD SP,HL"),
            LdHlSpOffset { .. } => f.write_str("LD HL,SP+e8"),

            Push { src, .. } => write!(f, "PUSH {src}"),
            Pop { dst, .. } => write!(f, "POP {dst}"),

            IncR { r } => write!(f, "INC {}", reg(r)),
            DecR { r } => write!(f, "DEC {}", reg(r)),
            IncHl { .. } => f.write_str("INC (HL)"),
            DecHl { .. } => f.write_str("DEC (HL)"),
            IncRr { pair } => write!(f, "INC {pair}"),
            DecRr { pair } => write!(f, "DEC {pair}"),
            AddHlRr { src } => write!(f, "ADD HL,{src}"),
            AddSpOffset { .. } => f.write_str("ADD SP,e8"),
            Alu { op, src } => write!(f, "{}{}", op.prefix(), reg(src)),
            AluHl { op, .. } => write!(f, "{}(HL)", op.prefix()),
            AluImm { op, .. } => write!(f, "{}d8", op.prefix()),

            Jr { cond, .. } => with_cond(f, "JR", cond, "e8"),
            Jp { cond, .. } => with_cond(f, "JP", cond, "a16"),
            JpHl => f.write_str("JP HL"),
            Call { cond, .. } => with_cond(f, "CALL", cond, "a16"),
            Ret { cond, .. } => with_cond(f, "RET", cond, ""),
            Reti { .. } => f.write_str("RETI"),
            Rst { vector } => write!(f, "RST {vector:02X}H"),

            Shift { op, r } => write!(f, "{} {}", op.mnemonic(), reg(r)),
            ShiftHl { op, .. } => write!(f, "{} (HL)", op.mnemonic()),
            Bit { bit, r } => write!(f, "BIT {bit},{}", reg(r)),
            BitHl { bit } => write!(f, "BIT {bit},(HL)"),
            Res { bit, r } => write!(f, "RES {bit},{}", reg(r)),
            ResHl { bit, .. } => write!(f, "RES {bit},(HL)"),
            Set { bit, r } => write!(f, "SET {bit},{}", reg(r)),
            SetHl { bit, .. } => write!(f, "SET {bit},(HL)"),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}
