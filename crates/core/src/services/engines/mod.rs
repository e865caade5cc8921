pub mod classfile;

pub use classfile::ClassFileEngine;
