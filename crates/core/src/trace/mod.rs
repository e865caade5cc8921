//! Textual rendering ("trace") of parsed class files.
//!
//! The layout is modeled on `javap -v`: a class header, the constant pool,
//! then fields and methods with their bytecode listings. Output is
//! deterministic and never contains raw control characters from the
//! class file, so one line of output is always one line of the listing.

mod code;
mod writer;

use serde::{Deserialize, Serialize};

use crate::classfile::{ClassFile, ClassFileResult};

/// Which parts of a class the trace includes.
///
/// Every section is on by default; a config file only needs to name the
/// sections it turns off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceOptions {
    /// Emit the `Constant pool:` section.
    pub constant_pool: bool,
    /// Emit method bodies (instructions, exception tables).
    pub code: bool,
    /// Emit `SourceFile`, `LineNumberTable`, and local variable tables.
    pub debug_info: bool,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self { constant_pool: true, code: true, debug_info: true }
    }
}

/// Render an already-parsed class.
pub fn render_class(class: &ClassFile, options: &TraceOptions) -> ClassFileResult<String> {
    writer::TraceWriter::new(class, options).finish()
}

/// Parse `bytes` as a class file and render it.
pub fn render(bytes: &[u8], options: &TraceOptions) -> ClassFileResult<String> {
    let class = ClassFile::parse(bytes)?;
    render_class(&class, options)
}
