use crate::bytecode::opcodes::{
    ANEWARRAY, CHECKCAST, GETSTATIC, INSTANCEOF, INVOKESPECIAL, INVOKESTATIC, INVOKEVIRTUAL, LDC,
    LDC2_W, LDC_W, NEW, PUTFIELD,
};
use crate::bytecode::{self, Instruction, Operands};

use super::constant_pool::{Constant, ConstantPool};
use super::error::{ClassFileError, ClassFileResult};
use super::reader::ByteReader;

/// Attributes attached to a class, field, method, or `Code` attribute.
///
/// Only the attributes the trace renderer understands are decoded; every
/// other attribute is kept as raw bytes under its name.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Code(CodeAttribute),
    ConstantValue(u16),
    Exceptions(Vec<u16>),
    SourceFile(u16),
    Signature(u16),
    LineNumberTable(Vec<LineNumber>),
    LocalVariableTable(Vec<LocalVariable>),
    InnerClasses(Vec<InnerClass>),
    Deprecated,
    Synthetic,
    Unknown { name: String, info: Vec<u8> },
}

impl Attribute {
    /// Attribute name as stored in the class file.
    pub fn name(&self) -> &str {
        match self {
            Attribute::Code(_) => "Code",
            Attribute::ConstantValue(_) => "ConstantValue",
            Attribute::Exceptions(_) => "Exceptions",
            Attribute::SourceFile(_) => "SourceFile",
            Attribute::Signature(_) => "Signature",
            Attribute::LineNumberTable(_) => "LineNumberTable",
            Attribute::LocalVariableTable(_) => "LocalVariableTable",
            Attribute::InnerClasses(_) => "InnerClasses",
            Attribute::Deprecated => "Deprecated",
            Attribute::Synthetic => "Synthetic",
            Attribute::Unknown { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeAttribute {
    pub max_stack: u16,
    pub max_locals: u16,
    pub code: Vec<u8>,
    /// `code` decoded; always covers the whole array.
    pub instructions: Vec<Instruction>,
    pub exception_table: Vec<ExceptionHandler>,
    pub attributes: Vec<Attribute>,
}

impl CodeAttribute {
    pub fn line_numbers(&self) -> impl Iterator<Item = &LineNumber> {
        self.attributes.iter().flat_map(|attr| match attr {
            Attribute::LineNumberTable(lines) => lines.as_slice(),
            _ => [].as_slice(),
        })
    }

    pub fn local_variables(&self) -> impl Iterator<Item = &LocalVariable> {
        self.attributes.iter().flat_map(|attr| match attr {
            Attribute::LocalVariableTable(vars) => vars.as_slice(),
            _ => [].as_slice(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExceptionHandler {
    pub start_pc: u16,
    pub end_pc: u16,
    pub handler_pc: u16,
    /// Zero catches everything (`finally`).
    pub catch_type: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineNumber {
    pub start_pc: u16,
    pub line_number: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalVariable {
    pub start_pc: u16,
    pub length: u16,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub index: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InnerClass {
    pub inner_class_info_index: u16,
    /// Zero for local and anonymous classes.
    pub outer_class_info_index: u16,
    /// Zero for anonymous classes.
    pub inner_name_index: u16,
    pub access_flags: u16,
}

pub(crate) fn parse_attributes(
    reader: &mut ByteReader<'_>,
    pool: &ConstantPool,
) -> ClassFileResult<Vec<Attribute>> {
    reader.counted(|r| parse_attribute(r, pool))
}

fn parse_attribute(reader: &mut ByteReader<'_>, pool: &ConstantPool) -> ClassFileResult<Attribute> {
    let name = pool.utf8(reader.u16()?)?;
    let declared = reader.u32()? as usize;
    let info = reader.take(declared)?;
    let mut body = ByteReader::new(info);

    let attribute = match name {
        "Code" => Attribute::Code(parse_code(&mut body, pool)?),
        "ConstantValue" => {
            let index = body.u16()?;
            match pool.get(index)? {
                Constant::Integer(_)
                | Constant::Float(_)
                | Constant::Long(_)
                | Constant::Double(_)
                | Constant::String { .. } => {}
                other => {
                    return Err(ClassFileError::ConstantKindMismatch {
                        index,
                        expected: "a loadable constant",
                        found: other.tag_name(),
                    })
                }
            }
            Attribute::ConstantValue(index)
        }
        "Exceptions" => Attribute::Exceptions(body.counted(|r| class_index(r, pool))?),
        "SourceFile" => Attribute::SourceFile(utf8_index(&mut body, pool)?),
        "Signature" => Attribute::Signature(utf8_index(&mut body, pool)?),
        "LineNumberTable" => Attribute::LineNumberTable(body.counted(|r| {
            Ok(LineNumber { start_pc: r.u16()?, line_number: r.u16()? })
        })?),
        "LocalVariableTable" => Attribute::LocalVariableTable(body.counted(|r| {
            Ok(LocalVariable {
                start_pc: r.u16()?,
                length: r.u16()?,
                name_index: utf8_index(r, pool)?,
                descriptor_index: utf8_index(r, pool)?,
                index: r.u16()?,
            })
        })?),
        "InnerClasses" => Attribute::InnerClasses(body.counted(|r| {
            let inner_class_info_index = class_index(r, pool)?;
            let outer_class_info_index = r.u16()?;
            if outer_class_info_index != 0 {
                pool.class_name(outer_class_info_index)?;
            }
            let inner_name_index = r.u16()?;
            if inner_name_index != 0 {
                pool.utf8(inner_name_index)?;
            }
            Ok(InnerClass {
                inner_class_info_index,
                outer_class_info_index,
                inner_name_index,
                access_flags: r.u16()?,
            })
        })?),
        "Deprecated" => Attribute::Deprecated,
        "Synthetic" => Attribute::Synthetic,
        _ => return Ok(Attribute::Unknown { name: name.to_string(), info: info.to_vec() }),
    };

    if !body.is_empty() {
        return Err(ClassFileError::AttributeLength {
            name: name.to_string(),
            declared,
            actual: body.position(),
        });
    }
    Ok(attribute)
}

fn parse_code(reader: &mut ByteReader<'_>, pool: &ConstantPool) -> ClassFileResult<CodeAttribute> {
    let max_stack = reader.u16()?;
    let max_locals = reader.u16()?;
    let code_length = reader.u32()? as usize;
    if code_length > u16::MAX as usize {
        return Err(ClassFileError::CodeTooLong(code_length));
    }
    let code = reader.take(code_length)?;
    let instructions = bytecode::decode(code)?;
    for instruction in &instructions {
        check_pool_operand(instruction, pool)?;
    }
    let exception_table = reader.counted(|r| {
        let handler = ExceptionHandler {
            start_pc: r.u16()?,
            end_pc: r.u16()?,
            handler_pc: r.u16()?,
            catch_type: r.u16()?,
        };
        if handler.catch_type != 0 {
            pool.class_name(handler.catch_type)?;
        }
        Ok(handler)
    })?;
    let attributes = parse_attributes(reader, pool)?;

    Ok(CodeAttribute {
        max_stack,
        max_locals,
        code: code.to_vec(),
        instructions,
        exception_table,
        attributes,
    })
}

/// Pool entry kinds an instruction operand may reference.
#[derive(Debug, Clone, Copy)]
enum OperandKind {
    Loadable,
    LoadableWide,
    Field,
    VirtualMethod,
    Method,
    InterfaceMethod,
    CallSite,
    Class,
}

impl OperandKind {
    fn for_instruction(instruction: &Instruction) -> Option<(u16, Self)> {
        let kind = match (&instruction.operands, instruction.opcode) {
            (Operands::Constant(index), LDC | LDC_W) => (*index, Self::Loadable),
            (Operands::Constant(index), LDC2_W) => (*index, Self::LoadableWide),
            (Operands::Constant(index), GETSTATIC..=PUTFIELD) => (*index, Self::Field),
            (Operands::Constant(index), INVOKEVIRTUAL) => (*index, Self::VirtualMethod),
            (Operands::Constant(index), INVOKESPECIAL | INVOKESTATIC) => (*index, Self::Method),
            (Operands::Constant(index), NEW | ANEWARRAY | CHECKCAST | INSTANCEOF)
            | (Operands::MultiANewArray { index, .. }, _) => (*index, Self::Class),
            (Operands::InvokeInterface { index, .. }, _) => (*index, Self::InterfaceMethod),
            (Operands::InvokeDynamic(index), _) => (*index, Self::CallSite),
            _ => return None,
        };
        Some(kind)
    }

    fn expected(self) -> &'static str {
        match self {
            Self::Loadable => "a loadable constant",
            Self::LoadableWide => "Long, Double or Dynamic",
            Self::Field => "Fieldref",
            Self::VirtualMethod => "Methodref",
            Self::Method => "Methodref or InterfaceMethodref",
            Self::InterfaceMethod => "InterfaceMethodref",
            Self::CallSite => "InvokeDynamic",
            Self::Class => "Class",
        }
    }

    fn accepts(self, constant: &Constant) -> bool {
        match self {
            Self::Loadable => matches!(
                constant,
                Constant::Integer(_)
                    | Constant::Float(_)
                    | Constant::String { .. }
                    | Constant::Class { .. }
                    | Constant::MethodType { .. }
                    | Constant::MethodHandle { .. }
                    | Constant::Dynamic { .. }
            ),
            Self::LoadableWide => {
                matches!(constant, Constant::Long(_) | Constant::Double(_) | Constant::Dynamic { .. })
            }
            Self::Field => matches!(constant, Constant::Fieldref { .. }),
            Self::VirtualMethod => matches!(constant, Constant::Methodref { .. }),
            Self::Method => {
                matches!(constant, Constant::Methodref { .. } | Constant::InterfaceMethodref { .. })
            }
            Self::InterfaceMethod => matches!(constant, Constant::InterfaceMethodref { .. }),
            Self::CallSite => matches!(constant, Constant::InvokeDynamic { .. }),
            Self::Class => matches!(constant, Constant::Class { .. }),
        }
    }
}

/// The operand must name an existing entry of the kind the opcode expects.
fn check_pool_operand(instruction: &Instruction, pool: &ConstantPool) -> ClassFileResult<()> {
    let Some((index, kind)) = OperandKind::for_instruction(instruction) else {
        return Ok(());
    };
    let constant = pool.get(index)?;
    if !kind.accepts(constant) {
        return Err(ClassFileError::ConstantKindMismatch {
            index,
            expected: kind.expected(),
            found: constant.tag_name(),
        });
    }
    Ok(())
}

fn utf8_index(reader: &mut ByteReader<'_>, pool: &ConstantPool) -> ClassFileResult<u16> {
    let index = reader.u16()?;
    pool.utf8(index)?;
    Ok(index)
}

fn class_index(reader: &mut ByteReader<'_>, pool: &ConstantPool) -> ClassFileResult<u16> {
    let index = reader.u16()?;
    pool.class_name(index)?;
    Ok(index)
}
