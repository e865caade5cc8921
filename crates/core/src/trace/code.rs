use std::fmt::Write;

use crate::bytecode::opcodes;
use crate::bytecode::{Instruction, Operands};
use crate::classfile::{Attribute, ClassFileResult, CodeAttribute, ConstantPool};

use super::TraceOptions;

/// Attributes that only carry debugging information.
pub(super) fn is_debug_attribute(name: &str) -> bool {
    matches!(
        name,
        "SourceFile"
            | "SourceDebugExtension"
            | "LineNumberTable"
            | "LocalVariableTable"
            | "LocalVariableTypeTable"
    )
}

pub(super) fn write_code(
    out: &mut String,
    pool: &ConstantPool,
    code: &CodeAttribute,
    options: &TraceOptions,
) -> ClassFileResult<()> {
    writeln!(
        out,
        "    Code: stack={}, locals={}, length={}",
        code.max_stack,
        code.max_locals,
        code.code.len()
    )?;
    for instruction in &code.instructions {
        write_instruction(out, pool, instruction)?;
    }

    if !code.exception_table.is_empty() {
        writeln!(out, "    Exception table:")?;
        writeln!(out, "       from    to  target type")?;
        for handler in &code.exception_table {
            let catch = if handler.catch_type == 0 {
                "any".to_string()
            } else {
                format!("Class {}", pool.class_name(handler.catch_type)?)
            };
            writeln!(
                out,
                "{:>11}{:>6}{:>8}   {catch}",
                handler.start_pc, handler.end_pc, handler.handler_pc
            )?;
        }
    }

    for attr in &code.attributes {
        match attr {
            Attribute::LineNumberTable(lines) if options.debug_info => {
                writeln!(out, "    LineNumberTable:")?;
                for line in lines {
                    writeln!(out, "      line {}: {}", line.line_number, line.start_pc)?;
                }
            }
            Attribute::LocalVariableTable(vars) if options.debug_info => {
                writeln!(out, "    LocalVariableTable:")?;
                writeln!(out, "      Start  Length  Slot  Name   Signature")?;
                for var in vars {
                    writeln!(
                        out,
                        "{:>11}{:>8}{:>6}  {:<6} {}",
                        var.start_pc,
                        var.length,
                        var.index,
                        pool.utf8(var.name_index)?,
                        pool.utf8(var.descriptor_index)?
                    )?;
                }
            }
            Attribute::LineNumberTable(_) | Attribute::LocalVariableTable(_) => {}
            other => {
                if options.debug_info || !is_debug_attribute(other.name()) {
                    let size = match other {
                        Attribute::Unknown { info, .. } => format!(" ({} bytes)", info.len()),
                        _ => String::new(),
                    };
                    writeln!(out, "    // attribute {}{size}", other.name())?;
                }
            }
        }
    }
    Ok(())
}

fn write_instruction(
    out: &mut String,
    pool: &ConstantPool,
    instruction: &Instruction,
) -> ClassFileResult<()> {
    let mnemonic = if instruction.wide {
        format!("wide {}", instruction.mnemonic)
    } else {
        instruction.mnemonic.to_string()
    };
    let prefix = format!("{:>10}: ", instruction.offset);

    let (operand, comment) = match &instruction.operands {
        Operands::None => (String::new(), None),
        Operands::Immediate(value) => (value.to_string(), None),
        Operands::Local(index) => (index.to_string(), None),
        Operands::Branch(target) => (target.to_string(), None),
        Operands::Iinc { index, delta } => (format!("{index}, {delta}"), None),
        Operands::Constant(index) => (format!("#{index}"), Some(pool.operand_comment(*index)?)),
        Operands::InvokeInterface { index, count } => {
            (format!("#{index},  {count}"), Some(pool.operand_comment(*index)?))
        }
        Operands::InvokeDynamic(index) => {
            (format!("#{index},  0"), Some(pool.operand_comment(*index)?))
        }
        Operands::MultiANewArray { index, dimensions } => {
            (format!("#{index},  {dimensions}"), Some(pool.operand_comment(*index)?))
        }
        Operands::NewArray(atype) => {
            (opcodes::array_type_name(*atype).unwrap_or("?").to_string(), None)
        }
        Operands::TableSwitch { default, low, high, targets } => {
            writeln!(out, "{prefix}{mnemonic:<13} {{ // {low} to {high}")?;
            for (key, target) in (*low..=*high).zip(targets) {
                writeln!(out, "{key:>24}: {target}")?;
            }
            writeln!(out, "{:>24}: {default}", "default")?;
            writeln!(out, "{:>13}", "}")?;
            return Ok(());
        }
        Operands::LookupSwitch { default, pairs } => {
            writeln!(out, "{prefix}{mnemonic:<13} {{ // {}", pairs.len())?;
            for (key, target) in pairs {
                writeln!(out, "{key:>24}: {target}")?;
            }
            writeln!(out, "{:>24}: {default}", "default")?;
            writeln!(out, "{:>13}", "}")?;
            return Ok(());
        }
    };

    let body = format!("{mnemonic:<13} {operand}");
    match comment {
        Some(comment) => writeln!(out, "{prefix}{body:<32} // {comment}")?,
        None => writeln!(out, "{prefix}{}", body.trim_end())?,
    }
    Ok(())
}
