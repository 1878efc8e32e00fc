use super::*;

const HOLES: [u8; 11] = [
    0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD,
];

#[test]
fn every_defined_opcode_decodes() {
    for opcode in 0..=0xFFu8 {
        let result = decode(opcode);
        if HOLES.contains(&opcode) {
            assert_eq!(result, Err(UnknownOpcode(opcode)), "opcode {opcode:02X}");
        } else {
            let instr = result.unwrap_or_else(|err| panic!("{err}"));
            assert_eq!(instr.opcode(), opcode);
            assert!(!instr.is_prefixed());
            assert_eq!(instr.remaining(), instr.length());
        }
    }
}

#[test]
fn exactly_eleven_opcodes_fail() {
    let failures = (0..=0xFFu8).filter(|&op| decode(op).is_err()).count();
    assert_eq!(failures, HOLES.len());
}

#[test]
fn every_prefixed_opcode_decodes() {
    for opcode in 0..=0xFFu8 {
        let instr = decode_prefixed(opcode);
        assert_eq!(instr.opcode(), opcode);
        assert!(instr.is_prefixed());
    }
}

#[test]
fn register_operands_never_use_the_hl_slot() {
    use InstructionKind::*;

    let all = (0..=0xFFu8)
        .filter_map(|op| decode(op).ok())
        .chain((0..=0xFFu8).map(decode_prefixed));

    for instr in all {
        let regs = match *instr.kind() {
            LdRR { dst, src } => vec![dst, src],
            LdRHl { dst, .. } | LdRImm { dst, .. } => vec![dst],
            LdHlR { src } | Alu { src, .. } => vec![src],
            IncR { r } | DecR { r } | Shift { r, .. } => vec![r],
            Bit { r, .. } | Res { r, .. } | Set { r, .. } => vec![r],
            _ => Vec::new(),
        };
        for r in regs {
            assert_ne!(r, HL_INDEX, "{instr} ({:02X})", instr.opcode());
        }
    }
}

#[test]
fn load_block_splits_memory_forms() {
    assert_eq!(*decode(0x41).unwrap().kind(), InstructionKind::LdRR { dst: 0, src: 1 });
    assert_eq!(*decode(0x7E).unwrap().kind(), InstructionKind::LdRHl { dst: 7, value: 0 });
    assert_eq!(*decode(0x70).unwrap().kind(), InstructionKind::LdHlR { src: 0 });
    assert_eq!(*decode(0x76).unwrap().kind(), InstructionKind::Halt);
}

#[test]
fn alu_block_selects_operation_and_operand() {
    assert_eq!(
        *decode(0x80).unwrap().kind(),
        InstructionKind::Alu { op: AluOp::Add, src: 0 }
    );
    assert_eq!(
        *decode(0x9F).unwrap().kind(),
        InstructionKind::Alu { op: AluOp::Sbc, src: 7 }
    );
    assert_eq!(
        *decode(0xAE).unwrap().kind(),
        InstructionKind::AluHl { op: AluOp::Xor, value: 0 }
    );
    assert_eq!(
        *decode(0xFE).unwrap().kind(),
        InstructionKind::AluImm { op: AluOp::Cp, value: 0 }
    );
}

#[test]
fn conditions_come_from_bits_4_and_3() {
    let cond = |op: u8| match *decode(op).unwrap().kind() {
        InstructionKind::Jr { cond, .. }
        | InstructionKind::Jp { cond, .. }
        | InstructionKind::Call { cond, .. }
        | InstructionKind::Ret { cond, .. } => cond,
        other => panic!("{other:?} is not a branch"),
    };

    assert_eq!(cond(0x20), Some(Condition::NotZero));
    assert_eq!(cond(0x28), Some(Condition::Zero));
    assert_eq!(cond(0x30), Some(Condition::NotCarry));
    assert_eq!(cond(0x38), Some(Condition::Carry));
    assert_eq!(cond(0xC0), Some(Condition::NotZero));
    assert_eq!(cond(0xCA), Some(Condition::Zero));
    assert_eq!(cond(0xD4), Some(Condition::NotCarry));
    assert_eq!(cond(0xD8), Some(Condition::Carry));
    assert_eq!(cond(0x18), None);
    assert_eq!(cond(0xC3), None);
    assert_eq!(cond(0xC9), None);
    assert_eq!(cond(0xCD), None);
}

#[test]
fn branches_start_with_empty_operands() {
    assert_eq!(
        *decode(0x30).unwrap().kind(),
        InstructionKind::Jr { cond: Some(Condition::NotCarry), offset: 0 }
    );
    assert_eq!(
        *decode(0xCA).unwrap().kind(),
        InstructionKind::Jp { cond: Some(Condition::Zero), target: 0 }
    );
    assert_eq!(
        *decode(0xCD).unwrap().kind(),
        InstructionKind::Call { cond: None, target: 0 }
    );
}

#[test]
fn pairs_come_from_bits_5_and_4() {
    assert_eq!(
        *decode(0x31).unwrap().kind(),
        InstructionKind::LdRrImm { dst: Pair::SP, value: 0 }
    );
    assert_eq!(*decode(0x13).unwrap().kind(), InstructionKind::IncRr { pair: Pair::DE });
    assert_eq!(*decode(0x2B).unwrap().kind(), InstructionKind::DecRr { pair: Pair::HL });
    assert_eq!(*decode(0x09).unwrap().kind(), InstructionKind::AddHlRr { src: Pair::BC });
    assert_eq!(
        *decode(0xF5).unwrap().kind(),
        InstructionKind::Push { src: StackPair::AF, value: 0 }
    );
    assert_eq!(
        *decode(0xD1).unwrap().kind(),
        InstructionKind::Pop { dst: StackPair::DE, value: 0 }
    );
    assert_eq!(
        *decode(0x3A).unwrap().kind(),
        InstructionKind::LdAIndirect { src: Indirect::HlDec, value: 0 }
    );
    assert_eq!(*decode(0x22).unwrap().kind(), InstructionKind::LdIndirectA { dst: Indirect::HlInc });
}

#[test]
fn rst_vectors() {
    for (op, vector) in [(0xC7, 0x00), (0xCF, 0x08), (0xEF, 0x28), (0xFF, 0x38)] {
        assert_eq!(*decode(op).unwrap().kind(), InstructionKind::Rst { vector });
    }
}

#[test]
fn prefixed_groups() {
    assert_eq!(
        *decode_prefixed(0x00).kind(),
        InstructionKind::Shift { op: ShiftOp::Rlc, r: 0 }
    );
    assert_eq!(
        *decode_prefixed(0x36).kind(),
        InstructionKind::ShiftHl { op: ShiftOp::Swap, value: 0 }
    );
    assert_eq!(*decode_prefixed(0x7C).kind(), InstructionKind::Bit { bit: 7, r: 4 });
    assert_eq!(*decode_prefixed(0x46).kind(), InstructionKind::BitHl { bit: 0 });
    assert_eq!(*decode_prefixed(0x87).kind(), InstructionKind::Res { bit: 0, r: 7 });
    assert_eq!(*decode_prefixed(0xBE).kind(), InstructionKind::ResHl { bit: 7, value: 0 });
    assert_eq!(*decode_prefixed(0xD1).kind(), InstructionKind::Set { bit: 2, r: 1 });
    assert_eq!(*decode_prefixed(0xFE).kind(), InstructionKind::SetHl { bit: 7, value: 0 });
}

#[test]
fn mnemonics() {
    let text = |op| decode(op).unwrap().to_string();
    assert_eq!(text(0x00), "NOP");
    assert_eq!(text(0x06), "LD B,d8");
    assert_eq!(text(0x2A), "LD A,(HL+)");
    assert_eq!(text(0x36), "LD (HL),d8");
    assert_eq!(text(0xC4), "CALL NZ,a16");
    assert_eq!(text(0xC8), "RET Z");
    assert_eq!(text(0xC9), "RET");
    assert_eq!(text(0x96), "SUB (HL)");
    assert_eq!(text(0x8F), "ADC A,A");
    assert_eq!(text(0xFF), "RST 38H");
    assert_eq!(text(0x17), "RLA");
    assert_eq!(text(0xCB), "PREFIX CB");
    assert_eq!(decode_prefixed(0x7E).to_string(), "BIT 7,(HL)");
    assert_eq!(decode_prefixed(0x37).to_string(), "SWAP A");
}
