use std::fmt::Write;

use crate::classfile::access::{self, FlagTarget};
use crate::classfile::{Attribute, ClassFile, ClassFileResult, Constant, ConstantPool, MemberInfo};

use super::code;
use super::TraceOptions;

/// Accumulates the trace of a single class.
pub(super) struct TraceWriter<'a> {
    class: &'a ClassFile,
    pool: &'a ConstantPool,
    options: &'a TraceOptions,
    out: String,
}

impl<'a> TraceWriter<'a> {
    pub(super) fn new(class: &'a ClassFile, options: &'a TraceOptions) -> Self {
        Self { class, pool: &class.constant_pool, options, out: String::new() }
    }

    pub(super) fn finish(mut self) -> ClassFileResult<String> {
        self.header()?;
        if self.options.constant_pool {
            self.constant_pool()?;
        }
        self.fields()?;
        self.methods()?;
        Ok(self.out)
    }

    fn header(&mut self) -> ClassFileResult<()> {
        let class = self.class;
        writeln!(
            self.out,
            "// class version {}.{} ({})",
            class.major_version, class.minor_version, class.major_version
        )?;
        access_comment(&mut self.out, "", class.access_flags, FlagTarget::Class)?;
        self.attribute_comments("", &class.attributes, true)?;
        if self.options.debug_info {
            if let Some(source) = class.source_file()? {
                writeln!(self.out, "// compiled from: {source}")?;
            }
        }

        let flags = class.access_flags;
        let kind = access::class_kind(flags);
        let mut decl = format!(
            "{}{} {}",
            access::modifiers(flags, FlagTarget::Class),
            kind,
            class.class_name()?
        );
        let interfaces = class.interface_names()?;
        if kind == "interface" || kind == "@interface" {
            if !interfaces.is_empty() {
                write!(decl, " extends {}", interfaces.join(", "))?;
            }
        } else {
            if let Some(super_name) = class.super_class_name()? {
                write!(decl, " extends {super_name}")?;
            }
            if !interfaces.is_empty() {
                write!(decl, " implements {}", interfaces.join(", "))?;
            }
        }
        writeln!(self.out, "{decl}")?;

        for attr in &class.attributes {
            match attr {
                Attribute::InnerClasses(entries) => {
                    writeln!(self.out, "  InnerClasses:")?;
                    for entry in entries {
                        let inner = self.pool.class_name(entry.inner_class_info_index)?;
                        let mut line = format!(
                            "    {}{inner}",
                            access::modifiers(entry.access_flags, FlagTarget::InnerClass)
                        );
                        if entry.inner_name_index != 0 {
                            write!(line, " = {}", self.pool.utf8(entry.inner_name_index)?)?;
                        }
                        if entry.outer_class_info_index != 0 {
                            write!(line, " of {}", self.pool.class_name(entry.outer_class_info_index)?)?;
                        }
                        writeln!(self.out, "{line}")?;
                    }
                }
                Attribute::Unknown { name, info } => {
                    writeln!(self.out, "  // attribute {name} ({} bytes)", info.len())?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn constant_pool(&mut self) -> ClassFileResult<()> {
        writeln!(self.out)?;
        writeln!(self.out, "Constant pool:")?;
        for (index, constant) in self.pool.iter() {
            let left = format!(
                "{:>6} = {:<18} {}",
                format!("#{index}"),
                constant.tag_name(),
                constant.raw_args()
            );
            if is_reference(constant) {
                writeln!(self.out, "{left:<40} // {}", self.pool.describe(index)?)?;
            } else {
                writeln!(self.out, "{left}")?;
            }
        }
        Ok(())
    }

    fn fields(&mut self) -> ClassFileResult<()> {
        writeln!(self.out)?;
        writeln!(self.out, "Fields:")?;
        let class = self.class;
        if class.fields.is_empty() {
            writeln!(self.out, "  (none)")?;
        }
        for (i, field) in class.fields.iter().enumerate() {
            if i > 0 {
                writeln!(self.out)?;
            }
            self.field(field)?;
        }
        Ok(())
    }

    fn field(&mut self, field: &MemberInfo) -> ClassFileResult<()> {
        access_comment(&mut self.out, "  ", field.access_flags, FlagTarget::Field)?;
        self.attribute_comments("  ", &field.attributes, false)?;
        let mut decl = format!(
            "  {}{} {}",
            access::modifiers(field.access_flags, FlagTarget::Field),
            field.descriptor(self.pool)?,
            field.name(self.pool)?
        );
        for attr in &field.attributes {
            if let Attribute::ConstantValue(index) = attr {
                let value = self.pool.describe(*index)?;
                match self.pool.get(*index)? {
                    Constant::String { .. } => write!(decl, " = \"{value}\"")?,
                    _ => write!(decl, " = {value}")?,
                }
            }
        }
        writeln!(self.out, "{decl}")?;
        Ok(())
    }

    fn methods(&mut self) -> ClassFileResult<()> {
        writeln!(self.out)?;
        writeln!(self.out, "Methods:")?;
        let class = self.class;
        if class.methods.is_empty() {
            writeln!(self.out, "  (none)")?;
        }
        for (i, method) in class.methods.iter().enumerate() {
            if i > 0 {
                writeln!(self.out)?;
            }
            self.method(method)?;
        }
        Ok(())
    }

    fn method(&mut self, method: &MemberInfo) -> ClassFileResult<()> {
        access_comment(&mut self.out, "  ", method.access_flags, FlagTarget::Method)?;
        self.attribute_comments("  ", &method.attributes, false)?;
        let mut decl = format!(
            "  {}{}{}",
            access::modifiers(method.access_flags, FlagTarget::Method),
            method.name(self.pool)?,
            method.descriptor(self.pool)?
        );
        for attr in &method.attributes {
            if let Attribute::Exceptions(indices) = attr {
                let names = indices
                    .iter()
                    .map(|&index| self.pool.class_name(index))
                    .collect::<ClassFileResult<Vec<_>>>()?;
                if !names.is_empty() {
                    write!(decl, " throws {}", names.join(", "))?;
                }
            }
        }
        writeln!(self.out, "{decl}")?;

        if self.options.code {
            if let Some(body) = method.code() {
                code::write_code(&mut self.out, self.pool, body, self.options)?;
            }
        }
        Ok(())
    }

    /// Comment lines for signature, deprecation, synthetic, and unknown
    /// member attributes. Class-level unknown attributes are listed after
    /// the declaration instead.
    fn attribute_comments(
        &mut self,
        indent: &str,
        attributes: &[Attribute],
        class_level: bool,
    ) -> ClassFileResult<()> {
        for attr in attributes {
            match attr {
                Attribute::Signature(index) => {
                    writeln!(self.out, "{indent}// signature {}", self.pool.utf8(*index)?)?;
                }
                Attribute::Deprecated => writeln!(self.out, "{indent}// deprecated")?,
                Attribute::Synthetic => writeln!(self.out, "{indent}// synthetic")?,
                Attribute::Unknown { name, info } if !class_level => {
                    if self.options.debug_info || !code::is_debug_attribute(name) {
                        writeln!(self.out, "{indent}// attribute {name} ({} bytes)", info.len())?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

fn access_comment(
    out: &mut String,
    indent: &str,
    flags: u16,
    target: FlagTarget,
) -> ClassFileResult<()> {
    let names = access::flag_names(flags, target);
    if names.is_empty() {
        writeln!(out, "{indent}// access flags 0x{flags:X}")?;
    } else {
        writeln!(out, "{indent}// access flags 0x{flags:X} ({})", names.join(", "))?;
    }
    Ok(())
}

fn is_reference(constant: &Constant) -> bool {
    !matches!(
        constant,
        Constant::Utf8(_)
            | Constant::Integer(_)
            | Constant::Float(_)
            | Constant::Long(_)
            | Constant::Double(_)
    )
}
