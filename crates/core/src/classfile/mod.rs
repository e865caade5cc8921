//! JVM class-file model and parser.
//!
//! Layout follows JVMS chapter 4. Parsing is strict: every constant pool
//! reference is checked, including the operands of `ldc`, field, invoke and
//! type instructions, and method bodies are decoded up front. A `ClassFile`
//! that parses renders under any `TraceOptions` without index checks failing.

pub mod access;
pub mod attributes;
pub mod constant_pool;
mod error;
pub mod mutf8;
pub(crate) mod reader;

pub use attributes::{
    Attribute, CodeAttribute, ExceptionHandler, InnerClass, LineNumber, LocalVariable,
};
pub use constant_pool::{Constant, ConstantPool};
pub use error::{ClassFileError, ClassFileResult};

use reader::ByteReader;

pub const MAGIC: u32 = 0xCAFE_BABE;

/// Oldest major version accepted (JDK 1.1).
pub const MIN_MAJOR_VERSION: u16 = 45;

/// Newest major version accepted (Java 26). Later versions are rejected
/// until their format changes have been reviewed.
pub const MAX_MAJOR_VERSION: u16 = 70;

/// A parsed class file.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassFile {
    pub minor_version: u16,
    pub major_version: u16,
    pub constant_pool: ConstantPool,
    pub access_flags: u16,
    pub this_class: u16,
    /// Zero only for `java/lang/Object` and `module-info`.
    pub super_class: u16,
    pub interfaces: Vec<u16>,
    pub fields: Vec<MemberInfo>,
    pub methods: Vec<MemberInfo>,
    pub attributes: Vec<Attribute>,
}

/// A field or method declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberInfo {
    pub access_flags: u16,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes: Vec<Attribute>,
}

impl MemberInfo {
    pub fn name<'a>(&self, pool: &'a ConstantPool) -> ClassFileResult<&'a str> {
        pool.utf8(self.name_index)
    }

    pub fn descriptor<'a>(&self, pool: &'a ConstantPool) -> ClassFileResult<&'a str> {
        pool.utf8(self.descriptor_index)
    }

    pub fn code(&self) -> Option<&CodeAttribute> {
        self.attributes.iter().find_map(|attr| match attr {
            Attribute::Code(code) => Some(code),
            _ => None,
        })
    }
}

impl ClassFile {
    /// Parse a complete class file. Trailing bytes are rejected.
    pub fn parse(bytes: &[u8]) -> ClassFileResult<Self> {
        let mut reader = ByteReader::new(bytes);

        let magic = reader.u32()?;
        if magic != MAGIC {
            return Err(ClassFileError::BadMagic(magic));
        }
        let minor_version = reader.u16()?;
        let major_version = reader.u16()?;
        if !(MIN_MAJOR_VERSION..=MAX_MAJOR_VERSION).contains(&major_version) {
            return Err(ClassFileError::UnsupportedVersion {
                major: major_version,
                minor: minor_version,
            });
        }

        let constant_pool = ConstantPool::parse(&mut reader)?;
        let access_flags = reader.u16()?;
        let this_class = reader.u16()?;
        constant_pool.class_name(this_class)?;
        let super_class = reader.u16()?;
        if super_class != 0 {
            constant_pool.class_name(super_class)?;
        }
        let interfaces = reader.counted(|r| {
            let index = r.u16()?;
            constant_pool.class_name(index)?;
            Ok(index)
        })?;
        let fields = reader.counted(|r| parse_member(r, &constant_pool))?;
        let methods = reader.counted(|r| parse_member(r, &constant_pool))?;
        let attributes = attributes::parse_attributes(&mut reader, &constant_pool)?;

        if !reader.is_empty() {
            return Err(ClassFileError::TrailingBytes(reader.remaining()));
        }

        Ok(Self {
            minor_version,
            major_version,
            constant_pool,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            attributes,
        })
    }

    /// Internal name of this class (e.g. `com/example/Main`).
    pub fn class_name(&self) -> ClassFileResult<&str> {
        self.constant_pool.class_name(self.this_class)
    }

    pub fn super_class_name(&self) -> ClassFileResult<Option<&str>> {
        if self.super_class == 0 {
            return Ok(None);
        }
        self.constant_pool.class_name(self.super_class).map(Some)
    }

    pub fn interface_names(&self) -> ClassFileResult<Vec<&str>> {
        self.interfaces.iter().map(|&index| self.constant_pool.class_name(index)).collect()
    }

    /// Value of the `SourceFile` attribute, if present.
    pub fn source_file(&self) -> ClassFileResult<Option<&str>> {
        for attr in &self.attributes {
            if let Attribute::SourceFile(index) = attr {
                return self.constant_pool.utf8(*index).map(Some);
            }
        }
        Ok(None)
    }

    pub fn find_method(&self, name: &str) -> Option<&MemberInfo> {
        self.methods.iter().find(|m| m.name(&self.constant_pool).ok() == Some(name))
    }

    pub fn find_field(&self, name: &str) -> Option<&MemberInfo> {
        self.fields.iter().find(|f| f.name(&self.constant_pool).ok() == Some(name))
    }
}

fn parse_member(reader: &mut ByteReader<'_>, pool: &ConstantPool) -> ClassFileResult<MemberInfo> {
    let access_flags = reader.u16()?;
    let name_index = reader.u16()?;
    pool.utf8(name_index)?;
    let descriptor_index = reader.u16()?;
    pool.utf8(descriptor_index)?;
    let attributes = attributes::parse_attributes(reader, pool)?;
    Ok(MemberInfo { access_flags, name_index, descriptor_index, attributes })
}
