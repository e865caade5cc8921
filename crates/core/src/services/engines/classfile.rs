use crate::classfile::ClassFile;
use crate::services::disassembly::{DisassemblyEngine, EngineError};
use crate::trace::{self, TraceOptions};

/// Built-in engine: parses the class file and renders a `javap`-style trace.
#[derive(Debug, Clone, Default)]
pub struct ClassFileEngine {
    options: TraceOptions,
}

impl ClassFileEngine {
    pub fn new(options: TraceOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TraceOptions {
        &self.options
    }
}

impl DisassemblyEngine for ClassFileEngine {
    fn render(&self, bytecode: &[u8]) -> Result<String, EngineError> {
        let class = ClassFile::parse(bytecode)?;
        tracing::trace!(
            class = class.class_name()?,
            major = class.major_version,
            constants = class.constant_pool.len(),
            methods = class.methods.len(),
            "parsed class file"
        );
        Ok(trace::render_class(&class, &self.options)?)
    }

    fn name(&self) -> &'static str {
        "classfile"
    }

    fn description(&self) -> &'static str {
        "Built-in class-file parser with javap-style listings"
    }
}
