use std::fmt::Debug;

use super::error::{ClassFileError, ClassFileResult};
use super::mutf8;
use super::reader::ByteReader;

/// A single constant pool entry.
///
/// Index fields refer to other entries of the same pool; every reference is
/// checked against the expected entry kind when the pool is parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class { name_index: u16 },
    String { string_index: u16 },
    Fieldref { class_index: u16, name_and_type_index: u16 },
    Methodref { class_index: u16, name_and_type_index: u16 },
    InterfaceMethodref { class_index: u16, name_and_type_index: u16 },
    NameAndType { name_index: u16, descriptor_index: u16 },
    MethodHandle { reference_kind: u8, reference_index: u16 },
    MethodType { descriptor_index: u16 },
    Dynamic { bootstrap_method_attr_index: u16, name_and_type_index: u16 },
    InvokeDynamic { bootstrap_method_attr_index: u16, name_and_type_index: u16 },
    Module { name_index: u16 },
    Package { name_index: u16 },
}

impl Constant {
    /// Entry kind as spelled in `javap` listings.
    pub fn tag_name(&self) -> &'static str {
        match self {
            Constant::Utf8(_) => "Utf8",
            Constant::Integer(_) => "Integer",
            Constant::Float(_) => "Float",
            Constant::Long(_) => "Long",
            Constant::Double(_) => "Double",
            Constant::Class { .. } => "Class",
            Constant::String { .. } => "String",
            Constant::Fieldref { .. } => "Fieldref",
            Constant::Methodref { .. } => "Methodref",
            Constant::InterfaceMethodref { .. } => "InterfaceMethodref",
            Constant::NameAndType { .. } => "NameAndType",
            Constant::MethodHandle { .. } => "MethodHandle",
            Constant::MethodType { .. } => "MethodType",
            Constant::Dynamic { .. } => "Dynamic",
            Constant::InvokeDynamic { .. } => "InvokeDynamic",
            Constant::Module { .. } => "Module",
            Constant::Package { .. } => "Package",
        }
    }

    /// Label used when an instruction operand refers to this entry.
    pub fn operand_label(&self) -> &'static str {
        match self {
            Constant::Integer(_) => "int",
            Constant::Float(_) => "float",
            Constant::Long(_) => "long",
            Constant::Double(_) => "double",
            Constant::Class { .. } => "class",
            Constant::Fieldref { .. } => "Field",
            Constant::Methodref { .. } => "Method",
            Constant::InterfaceMethodref { .. } => "InterfaceMethod",
            other => other.tag_name(),
        }
    }

    /// Number of pool slots the entry occupies.
    pub fn slots(&self) -> u16 {
        match self {
            Constant::Long(_) | Constant::Double(_) => 2,
            _ => 1,
        }
    }

    /// The entry's raw operands: indices for references, the value for literals.
    pub fn raw_args(&self) -> String {
        match self {
            Constant::Utf8(s) => escape(s),
            Constant::Integer(v) => v.to_string(),
            Constant::Float(v) => float_text(*v, "f"),
            Constant::Long(v) => format!("{v}l"),
            Constant::Double(v) => float_text(*v, "d"),
            Constant::Class { name_index }
            | Constant::Module { name_index }
            | Constant::Package { name_index } => format!("#{name_index}"),
            Constant::String { string_index } => format!("#{string_index}"),
            Constant::MethodType { descriptor_index } => format!("#{descriptor_index}"),
            Constant::Fieldref { class_index, name_and_type_index }
            | Constant::Methodref { class_index, name_and_type_index }
            | Constant::InterfaceMethodref { class_index, name_and_type_index } => {
                format!("#{class_index}.#{name_and_type_index}")
            }
            Constant::NameAndType { name_index, descriptor_index } => {
                format!("#{name_index}:#{descriptor_index}")
            }
            Constant::MethodHandle { reference_kind, reference_index } => {
                format!("{reference_kind}:#{reference_index}")
            }
            Constant::Dynamic { bootstrap_method_attr_index, name_and_type_index }
            | Constant::InvokeDynamic { bootstrap_method_attr_index, name_and_type_index } => {
                format!("#{bootstrap_method_attr_index}:#{name_and_type_index}")
            }
        }
    }
}

/// Parsed and validated constant pool.
///
/// Slot 0 and the upper slot of every Long/Double are stored as `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstantPool {
    entries: Vec<Option<Constant>>,
}

impl ConstantPool {
    pub(crate) fn parse(reader: &mut ByteReader<'_>) -> ClassFileResult<Self> {
        let count = reader.u16()?;
        let mut entries: Vec<Option<Constant>> = Vec::with_capacity(count as usize);
        entries.push(None);

        let mut index: u16 = 1;
        while index < count {
            let constant = parse_entry(reader, index)?;
            let slots = constant.slots();
            if index as u32 + slots as u32 > count as u32 {
                return Err(ClassFileError::BadConstantIndex(index));
            }
            entries.push(Some(constant));
            if slots == 2 {
                entries.push(None);
            }
            index += slots;
        }

        let pool = Self { entries };
        pool.validate()?;
        Ok(pool)
    }

    /// The `constant_pool_count` of the class file (one more than the last index).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }

    /// Iterate usable entries in index order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &Constant)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| entry.as_ref().map(|c| (i as u16, c)))
    }

    pub fn get(&self, index: u16) -> ClassFileResult<&Constant> {
        self.entries
            .get(index as usize)
            .and_then(Option::as_ref)
            .ok_or(ClassFileError::BadConstantIndex(index))
    }

    pub fn utf8(&self, index: u16) -> ClassFileResult<&str> {
        match self.get(index)? {
            Constant::Utf8(s) => Ok(s),
            other => Err(mismatch(index, "Utf8", other)),
        }
    }

    /// Internal name of a `CONSTANT_Class` entry (e.g. `java/lang/Object`).
    pub fn class_name(&self, index: u16) -> ClassFileResult<&str> {
        match self.get(index)? {
            Constant::Class { name_index } => self.utf8(*name_index),
            other => Err(mismatch(index, "Class", other)),
        }
    }

    /// Name and descriptor of a `CONSTANT_NameAndType` entry.
    pub fn name_and_type(&self, index: u16) -> ClassFileResult<(&str, &str)> {
        match self.get(index)? {
            Constant::NameAndType { name_index, descriptor_index } => {
                Ok((self.utf8(*name_index)?, self.utf8(*descriptor_index)?))
            }
            other => Err(mismatch(index, "NameAndType", other)),
        }
    }

    /// Owner class, name, and descriptor of a field or method reference.
    pub fn member_ref(&self, index: u16) -> ClassFileResult<(&str, &str, &str)> {
        match self.get(index)? {
            Constant::Fieldref { class_index, name_and_type_index }
            | Constant::Methodref { class_index, name_and_type_index }
            | Constant::InterfaceMethodref { class_index, name_and_type_index } => {
                let (name, descriptor) = self.name_and_type(*name_and_type_index)?;
                Ok((self.class_name(*class_index)?, name, descriptor))
            }
            other => Err(mismatch(index, "Fieldref, Methodref or InterfaceMethodref", other)),
        }
    }

    /// Human-readable resolution of an entry, as shown in listing comments.
    pub fn describe(&self, index: u16) -> ClassFileResult<String> {
        let text = match self.get(index)? {
            Constant::Utf8(s) => escape(s),
            Constant::Integer(v) => v.to_string(),
            Constant::Float(v) => float_text(*v, "f"),
            Constant::Long(v) => format!("{v}l"),
            Constant::Double(v) => float_text(*v, "d"),
            Constant::Class { name_index } => quote_array(self.utf8(*name_index)?),
            Constant::String { string_index } => escape(self.utf8(*string_index)?),
            Constant::Fieldref { .. }
            | Constant::Methodref { .. }
            | Constant::InterfaceMethodref { .. } => {
                let (owner, name, descriptor) = self.member_ref(index)?;
                format!("{}.{}:{}", quote_array(owner), quote_special(name), descriptor)
            }
            Constant::NameAndType { name_index, descriptor_index } => {
                format!("{}:{}", quote_special(self.utf8(*name_index)?), self.utf8(*descriptor_index)?)
            }
            Constant::MethodHandle { reference_kind, reference_index } => {
                format!("{} {}", reference_kind_name(*reference_kind), self.describe(*reference_index)?)
            }
            Constant::MethodType { descriptor_index } => self.utf8(*descriptor_index)?.to_string(),
            Constant::Dynamic { bootstrap_method_attr_index, name_and_type_index }
            | Constant::InvokeDynamic { bootstrap_method_attr_index, name_and_type_index } => {
                let (name, descriptor) = self.name_and_type(*name_and_type_index)?;
                format!("#{bootstrap_method_attr_index}:{}:{descriptor}", quote_special(name))
            }
            Constant::Module { name_index } | Constant::Package { name_index } => {
                self.utf8(*name_index)?.to_string()
            }
        };
        Ok(text)
    }

    /// Operand comment for instructions such as `ldc` or `invokevirtual`.
    pub fn operand_comment(&self, index: u16) -> ClassFileResult<String> {
        let label = self.get(index)?.operand_label();
        Ok(format!("{label} {}", self.describe(index)?))
    }

    fn validate(&self) -> ClassFileResult<()> {
        for (index, constant) in self.iter() {
            match constant {
                Constant::Utf8(_)
                | Constant::Integer(_)
                | Constant::Float(_)
                | Constant::Long(_)
                | Constant::Double(_) => {}
                Constant::Class { name_index }
                | Constant::Module { name_index }
                | Constant::Package { name_index } => {
                    self.utf8(*name_index)?;
                }
                Constant::String { string_index } => {
                    self.utf8(*string_index)?;
                }
                Constant::MethodType { descriptor_index } => {
                    self.utf8(*descriptor_index)?;
                }
                Constant::NameAndType { name_index, descriptor_index } => {
                    self.utf8(*name_index)?;
                    self.utf8(*descriptor_index)?;
                }
                Constant::Fieldref { .. }
                | Constant::Methodref { .. }
                | Constant::InterfaceMethodref { .. } => {
                    self.member_ref(index)?;
                }
                Constant::Dynamic { name_and_type_index, .. }
                | Constant::InvokeDynamic { name_and_type_index, .. } => {
                    self.name_and_type(*name_and_type_index)?;
                }
                Constant::MethodHandle { reference_kind, reference_index } => {
                    self.validate_method_handle(index, *reference_kind, *reference_index)?;
                }
            }
        }
        Ok(())
    }

    fn validate_method_handle(&self, index: u16, kind: u8, target: u16) -> ClassFileResult<()> {
        let referenced = self.get(target)?;
        let (expected, ok) = match kind {
            1..=4 => ("Fieldref", matches!(referenced, Constant::Fieldref { .. })),
            5 | 8 => ("Methodref", matches!(referenced, Constant::Methodref { .. })),
            6 | 7 => (
                "Methodref or InterfaceMethodref",
                matches!(
                    referenced,
                    Constant::Methodref { .. } | Constant::InterfaceMethodref { .. }
                ),
            ),
            9 => ("InterfaceMethodref", matches!(referenced, Constant::InterfaceMethodref { .. })),
            _ => return Err(ClassFileError::BadReferenceKind { index, kind }),
        };
        if ok {
            Ok(())
        } else {
            Err(mismatch(target, expected, referenced))
        }
    }
}

fn parse_entry(reader: &mut ByteReader<'_>, index: u16) -> ClassFileResult<Constant> {
    let tag = reader.u8()?;
    let constant = match tag {
        1 => {
            let len = reader.u16()? as usize;
            let bytes = reader.take(len)?;
            Constant::Utf8(mutf8::decode(bytes).ok_or(ClassFileError::MalformedUtf8(index))?)
        }
        3 => Constant::Integer(reader.i32()?),
        4 => Constant::Float(f32::from_bits(reader.u32()?)),
        5 => Constant::Long(reader.u64()? as i64),
        6 => Constant::Double(f64::from_bits(reader.u64()?)),
        7 => Constant::Class { name_index: reader.u16()? },
        8 => Constant::String { string_index: reader.u16()? },
        9 => Constant::Fieldref { class_index: reader.u16()?, name_and_type_index: reader.u16()? },
        10 => Constant::Methodref { class_index: reader.u16()?, name_and_type_index: reader.u16()? },
        11 => Constant::InterfaceMethodref {
            class_index: reader.u16()?,
            name_and_type_index: reader.u16()?,
        },
        12 => Constant::NameAndType { name_index: reader.u16()?, descriptor_index: reader.u16()? },
        15 => Constant::MethodHandle { reference_kind: reader.u8()?, reference_index: reader.u16()? },
        16 => Constant::MethodType { descriptor_index: reader.u16()? },
        17 => Constant::Dynamic {
            bootstrap_method_attr_index: reader.u16()?,
            name_and_type_index: reader.u16()?,
        },
        18 => Constant::InvokeDynamic {
            bootstrap_method_attr_index: reader.u16()?,
            name_and_type_index: reader.u16()?,
        },
        19 => Constant::Module { name_index: reader.u16()? },
        20 => Constant::Package { name_index: reader.u16()? },
        _ => return Err(ClassFileError::InvalidConstantTag { tag, index }),
    };
    Ok(constant)
}

fn mismatch(index: u16, expected: &'static str, found: &Constant) -> ClassFileError {
    ClassFileError::ConstantKindMismatch { index, expected, found: found.tag_name() }
}

/// `javap` spelling of a method handle reference kind.
pub fn reference_kind_name(kind: u8) -> &'static str {
    match kind {
        1 => "REF_getField",
        2 => "REF_getStatic",
        3 => "REF_putField",
        4 => "REF_putStatic",
        5 => "REF_invokeVirtual",
        6 => "REF_invokeStatic",
        7 => "REF_invokeSpecial",
        8 => "REF_newInvokeSpecial",
        9 => "REF_invokeInterface",
        _ => "REF_unknown",
    }
}

/// Escape control characters so rendered text never spans extra lines.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

fn float_text<T: Debug + Into<f64> + Copy>(value: T, suffix: &str) -> String {
    let wide: f64 = value.into();
    if wide.is_nan() {
        format!("NaN{suffix}")
    } else if wide.is_infinite() {
        let sign = if wide < 0.0 { "-" } else { "" };
        format!("{sign}Infinity{suffix}")
    } else {
        format!("{value:?}{suffix}")
    }
}

// Special method names and array class names are quoted, as javap does.
fn quote_special(name: &str) -> String {
    if name.starts_with('<') {
        format!("\"{name}\"")
    } else {
        name.to_string()
    }
}

fn quote_array(name: &str) -> String {
    if name.starts_with('[') {
        format!("\"{name}\"")
    } else {
        name.to_string()
    }
}
