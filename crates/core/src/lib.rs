//! classtrace-core
//!
//! Core library for turning compiled JVM classes into human-readable
//! disassembly, one text per class, keyed by class name.
//!
//! This crate defines the class-file model and parser, the bytecode decoder,
//! the trace renderer, and the batch `Disassembler` that runs an engine over
//! a set of classes and reports either every result or a single failure.
//!
//! All substantive logic lives here so it is fully testable and reusable
//! from multiple frontends (CLI, services, etc.).

pub mod bytecode;
pub mod classfile;
pub mod services;
pub mod trace;

pub use services::disassembly::{
    disassemble, CompiledSource, DisassembleFailure, DisassembleResults, Disassembler,
    DisassemblyEngine, EngineError, UnknownEngine,
};
pub use trace::TraceOptions;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
