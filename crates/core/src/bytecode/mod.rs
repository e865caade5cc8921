//! Decoding of method `code` arrays into instructions.

pub mod opcodes;

use crate::classfile::reader::ByteReader;
use crate::classfile::{ClassFileError, ClassFileResult};

use self::opcodes::OperandShape;

/// One decoded instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Offset of the opcode byte (of the `wide` prefix, for widened instructions).
    pub offset: u32,
    pub opcode: u8,
    pub mnemonic: &'static str,
    /// Set when the instruction was prefixed by `wide`.
    pub wide: bool,
    pub operands: Operands,
}

/// Decoded operands. Branch targets are absolute code offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operands {
    None,
    Immediate(i32),
    Constant(u16),
    Local(u16),
    Iinc { index: u16, delta: i16 },
    Branch(u32),
    TableSwitch { default: u32, low: i32, high: i32, targets: Vec<u32> },
    LookupSwitch { default: u32, pairs: Vec<(i32, u32)> },
    InvokeInterface { index: u16, count: u8 },
    InvokeDynamic(u16),
    NewArray(u8),
    MultiANewArray { index: u16, dimensions: u8 },
}

/// Decode a whole code array.
///
/// Fails on unassigned opcodes, truncated operands, and branches that leave
/// the array.
pub fn decode(code: &[u8]) -> ClassFileResult<Vec<Instruction>> {
    let mut reader = ByteReader::new(code);
    let mut instructions = Vec::new();

    while !reader.is_empty() {
        let offset = reader.position() as u32;
        let opcode = reader.u8()?;
        let mnemonic =
            opcodes::mnemonic(opcode).ok_or(ClassFileError::InvalidOpcode { opcode, offset })?;
        let instruction = decode_one(&mut reader, code.len(), offset, opcode, mnemonic).map_err(
            |err| match err {
                ClassFileError::UnexpectedEof { .. } => {
                    ClassFileError::TruncatedInstruction { mnemonic, offset }
                }
                other => other,
            },
        )?;
        instructions.push(instruction);
    }

    Ok(instructions)
}

fn decode_one(
    reader: &mut ByteReader<'_>,
    code_len: usize,
    offset: u32,
    opcode: u8,
    mnemonic: &'static str,
) -> ClassFileResult<Instruction> {
    let branch = |relative: i64| -> ClassFileResult<u32> {
        let target = offset as i64 + relative;
        if target < 0 || target >= code_len as i64 {
            return Err(ClassFileError::BadBranchTarget { offset, target });
        }
        Ok(target as u32)
    };

    let operands = match opcodes::operand_shape(opcode) {
        OperandShape::None => Operands::None,
        OperandShape::Byte => Operands::Immediate(reader.i8()? as i32),
        OperandShape::Short => Operands::Immediate(reader.i16()? as i32),
        OperandShape::ConstantU8 => Operands::Constant(reader.u8()? as u16),
        OperandShape::ConstantU16 => Operands::Constant(reader.u16()?),
        OperandShape::Local => Operands::Local(reader.u8()? as u16),
        OperandShape::Iinc => Operands::Iinc { index: reader.u8()? as u16, delta: reader.i8()? as i16 },
        OperandShape::Branch16 => Operands::Branch(branch(reader.i16()? as i64)?),
        OperandShape::Branch32 => Operands::Branch(branch(reader.i32()? as i64)?),
        OperandShape::TableSwitch => {
            reader.align(4)?;
            let default = branch(reader.i32()? as i64)?;
            let low = reader.i32()?;
            let high = reader.i32()?;
            if low > high {
                return Err(ClassFileError::BadSwitchRange { offset, low, high });
            }
            let count = (high as i64 - low as i64 + 1) as usize;
            if count.saturating_mul(4) > reader.remaining() {
                return Err(ClassFileError::TruncatedInstruction { mnemonic, offset });
            }
            let mut targets = Vec::with_capacity(count);
            for _ in 0..count {
                targets.push(branch(reader.i32()? as i64)?);
            }
            Operands::TableSwitch { default, low, high, targets }
        }
        OperandShape::LookupSwitch => {
            reader.align(4)?;
            let default = branch(reader.i32()? as i64)?;
            let npairs = reader.i32()?;
            if npairs < 0 {
                return Err(ClassFileError::BadSwitchPairs { offset, npairs });
            }
            let count = npairs as usize;
            if count.saturating_mul(8) > reader.remaining() {
                return Err(ClassFileError::TruncatedInstruction { mnemonic, offset });
            }
            let mut pairs = Vec::with_capacity(count);
            for _ in 0..count {
                let key = reader.i32()?;
                pairs.push((key, branch(reader.i32()? as i64)?));
            }
            Operands::LookupSwitch { default, pairs }
        }
        OperandShape::InvokeInterface => {
            let index = reader.u16()?;
            let count = reader.u8()?;
            reader.u8()?;
            Operands::InvokeInterface { index, count }
        }
        OperandShape::InvokeDynamic => {
            let index = reader.u16()?;
            reader.u16()?;
            Operands::InvokeDynamic(index)
        }
        OperandShape::NewArray => {
            let atype = reader.u8()?;
            if opcodes::array_type_name(atype).is_none() {
                return Err(ClassFileError::BadArrayType { atype, offset });
            }
            Operands::NewArray(atype)
        }
        OperandShape::MultiANewArray => {
            Operands::MultiANewArray { index: reader.u16()?, dimensions: reader.u8()? }
        }
        OperandShape::Wide => return decode_wide(reader, offset),
    };

    Ok(Instruction { offset, opcode, mnemonic, wide: false, operands })
}

fn decode_wide(reader: &mut ByteReader<'_>, offset: u32) -> ClassFileResult<Instruction> {
    let opcode = reader.u8()?;
    let mnemonic = opcodes::mnemonic(opcode)
        .ok_or(ClassFileError::InvalidOpcode { opcode, offset: offset + 1 })?;
    let operands = match opcodes::operand_shape(opcode) {
        OperandShape::Local => Operands::Local(reader.u16()?),
        OperandShape::Iinc => Operands::Iinc { index: reader.u16()?, delta: reader.i16()? },
        _ => return Err(ClassFileError::InvalidOpcode { opcode, offset: offset + 1 }),
    };
    Ok(Instruction { offset, opcode, mnemonic, wide: true, operands })
}
