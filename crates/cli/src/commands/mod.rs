pub mod config;
pub mod disassemble;
pub mod engines;
pub mod version;

pub use config::*;
pub use disassemble::*;
pub use engines::*;
pub use version::*;
