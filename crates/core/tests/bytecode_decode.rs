use classtrace_core::bytecode::{decode, opcodes, Operands};
use classtrace_core::classfile::ClassFileError;

#[test]
fn decodes_simple_sequence_with_offsets() {
    // aload_0, invokespecial #1, return
    let instructions = decode(&[0x2a, 0xb7, 0x00, 0x01, 0xb1]).unwrap();
    let summary: Vec<(u32, &str)> = instructions.iter().map(|i| (i.offset, i.mnemonic)).collect();
    assert_eq!(summary, vec![(0, "aload_0"), (1, "invokespecial"), (4, "return")]);
    assert_eq!(instructions[1].operands, Operands::Constant(1));
}

#[test]
fn immediates_are_sign_extended() {
    // bipush -2, sipush -300
    let instructions = decode(&[0x10, 0xfe, 0x11, 0xfe, 0xd4]).unwrap();
    assert_eq!(instructions[0].operands, Operands::Immediate(-2));
    assert_eq!(instructions[1].operands, Operands::Immediate(-300));
}

#[test]
fn branch_targets_are_absolute() {
    // 0: iload_0, 1: ifge +6 -> 7, 4: iload_0, 5: ineg, 6: ireturn, 7: iload_0, 8: ireturn
    let instructions = decode(&[0x1a, 0x9c, 0x00, 0x06, 0x1a, 0x74, 0xac, 0x1a, 0xac]).unwrap();
    assert_eq!(instructions[1].mnemonic, "ifge");
    assert_eq!(instructions[1].operands, Operands::Branch(7));
}

/// Negative branch offsets resolve to earlier instructions.
#[test]
fn backward_goto_is_accepted() {
    // 0: nop, 1: goto -1 -> 0
    let instructions = decode(&[0x00, 0xa7, 0xff, 0xff]).unwrap();
    assert_eq!(instructions[1].operands, Operands::Branch(0));
}

#[test]
fn branch_outside_code_is_rejected() {
    let err = decode(&[0xa7, 0x00, 0x10]).unwrap_err();
    assert!(matches!(err, ClassFileError::BadBranchTarget { offset: 0, target: 16 }));
}

/// Switch operands start at the next 4-byte boundary of the code array.
#[test]
fn tableswitch_operands_are_aligned() {
    // 0: iload_0, 1: tableswitch (2 pad bytes), 24..: three returns
    let mut code = vec![0x1a, 0xaa, 0x00, 0x00];
    for value in [27i32, 0, 1, 23, 25] {
        code.extend_from_slice(&value.to_be_bytes());
    }
    code.extend_from_slice(&[0x04, 0xac, 0x05, 0xac, 0x03, 0xac]);

    let instructions = decode(&code).unwrap();
    assert_eq!(instructions[1].mnemonic, "tableswitch");
    assert_eq!(
        instructions[1].operands,
        Operands::TableSwitch { default: 28, low: 0, high: 1, targets: vec![24, 26] }
    );
    assert_eq!(instructions[2].offset, 24);
    assert_eq!(instructions.len(), 8);
}

#[test]
fn lookupswitch_pairs_decode() {
    // 0: lookupswitch (3 pad bytes), default -> 20, {5 -> 20}, 20: return
    let mut code = vec![0xab, 0x00, 0x00, 0x00];
    for value in [20i32, 1, 5, 20] {
        code.extend_from_slice(&value.to_be_bytes());
    }
    code.push(0xb1);

    let instructions = decode(&code).unwrap();
    assert_eq!(instructions[0].operands, Operands::LookupSwitch { default: 20, pairs: vec![(5, 20)] });
    assert_eq!(instructions[1].offset, 20);
}

#[test]
fn inverted_switch_range_is_rejected() {
    let mut code = vec![0xaa, 0x00, 0x00, 0x00];
    for value in [0i32, 3, 1] {
        code.extend_from_slice(&value.to_be_bytes());
    }
    let err = decode(&code).unwrap_err();
    assert!(matches!(err, ClassFileError::BadSwitchRange { low: 3, high: 1, .. }));
}

#[test]
fn negative_lookupswitch_pair_count_is_rejected() {
    let mut code = vec![0xab, 0x00, 0x00, 0x00];
    for value in [8i32, -5] {
        code.extend_from_slice(&value.to_be_bytes());
    }
    let err = decode(&code).unwrap_err();
    assert!(matches!(err, ClassFileError::BadSwitchPairs { offset: 0, npairs: -5 }));
    assert_eq!(err.to_string(), "Negative lookupswitch pair count -5 at bytecode offset 0");
}

#[test]
fn wide_widens_local_and_iinc() {
    // wide iload 300, wide iinc 300 -1000
    let code = [0xc4, 0x15, 0x01, 0x2c, 0xc4, 0x84, 0x01, 0x2c, 0xfc, 0x18];
    let instructions = decode(&code).unwrap();
    assert_eq!(instructions.len(), 2);
    assert!(instructions[0].wide);
    assert_eq!(instructions[0].mnemonic, "iload");
    assert_eq!(instructions[0].operands, Operands::Local(300));
    assert_eq!(instructions[1].offset, 4);
    assert_eq!(instructions[1].operands, Operands::Iinc { index: 300, delta: -1000 });
}

/// `wide` may only prefix local-variable instructions and `iinc`.
#[test]
fn wide_of_non_local_instruction_is_rejected() {
    let err = decode(&[0xc4, 0x00]).unwrap_err();
    assert!(matches!(err, ClassFileError::InvalidOpcode { opcode: 0x00, offset: 1 }));
}

#[test]
fn unassigned_opcode_is_rejected() {
    let err = decode(&[0x00, 0xca]).unwrap_err();
    assert!(matches!(err, ClassFileError::InvalidOpcode { opcode: 0xca, offset: 1 }));
}

/// Running out of bytes mid-operand reports the instruction, not a generic EOF.
#[test]
fn truncated_operand_names_the_instruction() {
    let err = decode(&[0xb1, 0xb6, 0x00]).unwrap_err();
    assert!(matches!(err, ClassFileError::TruncatedInstruction { mnemonic: "invokevirtual", offset: 1 }));
}

#[test]
fn newarray_checks_element_type() {
    let instructions = decode(&[0x05, 0xbc, 0x0a, 0xb0]).unwrap();
    assert_eq!(instructions[1].operands, Operands::NewArray(10));
    assert_eq!(opcodes::array_type_name(10), Some("int"));

    let err = decode(&[0x05, 0xbc, 0x02]).unwrap_err();
    assert!(matches!(err, ClassFileError::BadArrayType { atype: 2, offset: 1 }));
}

/// The count byte is kept; the reserved zero byte after it is consumed.
#[test]
fn invokeinterface_skips_trailing_zero() {
    let instructions = decode(&[0xb9, 0x00, 0x07, 0x02, 0x00, 0xb1]).unwrap();
    assert_eq!(instructions[0].operands, Operands::InvokeInterface { index: 7, count: 2 });
    assert_eq!(instructions[1].offset, 5);
}

#[test]
fn mnemonic_table_covers_assigned_opcodes() {
    assert_eq!(opcodes::mnemonic(0x00), Some("nop"));
    assert_eq!(opcodes::mnemonic(0xba), Some("invokedynamic"));
    assert_eq!(opcodes::mnemonic(0xc9), Some("jsr_w"));
    assert_eq!(opcodes::mnemonic(0xca), None);
    assert_eq!(opcodes::mnemonic(0xff), None);
}
