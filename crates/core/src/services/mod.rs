pub mod disassembly;
pub mod engines;
