use thiserror::Error;

/// Error type for class-file parsing, bytecode decoding, and trace rendering.
#[derive(Debug, Error)]
pub enum ClassFileError {
    #[error("Bad magic number 0x{0:08X}; not a class file")]
    BadMagic(u32),

    #[error("Unsupported class file version {major}.{minor}")]
    UnsupportedVersion { major: u16, minor: u16 },

    #[error("Unexpected end of class file at offset {offset} (needed {needed} more bytes)")]
    UnexpectedEof { offset: usize, needed: usize },

    #[error("{0} trailing bytes after end of class file")]
    TrailingBytes(usize),

    #[error("Invalid constant pool tag {tag} at index {index}")]
    InvalidConstantTag { tag: u8, index: u16 },

    /// Index 0, past the end of the pool, or the second slot of a Long/Double.
    #[error("Constant pool index {0} is out of range or unusable")]
    BadConstantIndex(u16),

    #[error("Constant pool entry #{index} is {found}, expected {expected}")]
    ConstantKindMismatch { index: u16, expected: &'static str, found: &'static str },

    #[error("Malformed modified UTF-8 in constant pool entry #{0}")]
    MalformedUtf8(u16),

    #[error("Invalid method handle reference kind {kind} in constant pool entry #{index}")]
    BadReferenceKind { index: u16, kind: u8 },

    #[error("Attribute {name} declares {declared} bytes but its contents span {actual}")]
    AttributeLength { name: String, declared: usize, actual: usize },

    #[error("Invalid opcode 0x{opcode:02X} at bytecode offset {offset}")]
    InvalidOpcode { opcode: u8, offset: u32 },

    #[error("Truncated {mnemonic} instruction at bytecode offset {offset}")]
    TruncatedInstruction { mnemonic: &'static str, offset: u32 },

    #[error("Branch at bytecode offset {offset} targets {target}, outside the code array")]
    BadBranchTarget { offset: u32, target: i64 },

    #[error("Invalid newarray type {atype} at bytecode offset {offset}")]
    BadArrayType { atype: u8, offset: u32 },

    #[error("Invalid switch range {low}..{high} at bytecode offset {offset}")]
    BadSwitchRange { offset: u32, low: i32, high: i32 },

    #[error("Negative lookupswitch pair count {npairs} at bytecode offset {offset}")]
    BadSwitchPairs { offset: u32, npairs: i32 },

    #[error("Code array of {0} bytes exceeds the 65535 byte limit")]
    CodeTooLong(usize),

    #[error("Failed to format disassembly: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Convenience result type for class-file operations.
pub type ClassFileResult<T> = Result<T, ClassFileError>;
