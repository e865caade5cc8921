use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::classfile::ClassFileError;
use crate::services::engines::ClassFileEngine;
use crate::trace::TraceOptions;

/// Compiled classes to disassemble together, keyed by class name.
///
/// The map is ordered so batches are processed, and results listed, in a
/// stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledSource {
    classes: BTreeMap<String, Vec<u8>>,
}

impl CompiledSource {
    pub fn new() -> Self {
        Self { classes: BTreeMap::new() }
    }

    /// Add a class; returns the previous bytecode if the name was already present.
    pub fn insert(&mut self, name: impl Into<String>, bytecode: impl Into<Vec<u8>>) -> Option<Vec<u8>> {
        self.classes.insert(name.into(), bytecode.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.classes.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.classes.iter().map(|(name, bytes)| (name.as_str(), bytes.as_slice()))
    }
}

impl<N: Into<String>, B: Into<Vec<u8>>> FromIterator<(N, B)> for CompiledSource {
    fn from_iter<I: IntoIterator<Item = (N, B)>>(iter: I) -> Self {
        let mut source = Self::new();
        for (name, bytes) in iter {
            source.insert(name, bytes);
        }
        source
    }
}

impl From<HashMap<String, Vec<u8>>> for CompiledSource {
    fn from(classes: HashMap<String, Vec<u8>>) -> Self {
        Self { classes: classes.into_iter().collect() }
    }
}

impl From<BTreeMap<String, Vec<u8>>> for CompiledSource {
    fn from(classes: BTreeMap<String, Vec<u8>>) -> Self {
        Self { classes }
    }
}

/// Disassembly text per class. Serializes as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisassembleResults {
    classes: BTreeMap<String, String>,
}

impl DisassembleResults {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.classes.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.classes.iter().map(|(name, text)| (name.as_str(), text.as_str()))
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.classes
    }
}

/// A failed batch. Carries only a message; no partial results survive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct DisassembleFailure {
    pub message: String,
}

impl DisassembleFailure {
    /// Wrap an engine error, falling back to its type name when it has no message.
    pub fn from_cause<E: std::error::Error>(cause: &E) -> Self {
        let message = cause.to_string();
        if message.trim().is_empty() {
            Self { message: std::any::type_name::<E>().to_string() }
        } else {
            Self { message }
        }
    }

    fn from_panic(engine: &str, payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            String::new()
        };
        if message.trim().is_empty() {
            Self { message: format!("engine '{engine}' panicked") }
        } else {
            Self { message }
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    ClassFile(#[from] ClassFileError),
    #[error("{0}")]
    Engine(String),
}

/// Capability that renders one class's bytecode as text.
///
/// Implementations must not keep state between calls; one engine may be
/// shared by concurrent callers.
pub trait DisassemblyEngine: Send + Sync {
    fn render(&self, bytecode: &[u8]) -> Result<String, EngineError>;
    fn name(&self) -> &'static str;

    /// One-line summary shown by engine listings.
    fn description(&self) -> &'static str {
        "Custom disassembly engine"
    }
}

/// Requested engine name that no registered engine answers to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown engine '{name}'. Available: {}", available.join(", "))]
pub struct UnknownEngine {
    pub name: String,
    pub available: Vec<&'static str>,
}

/// Engines keyed by their `name()`. Registering a second engine under the
/// same name replaces the first.
#[derive(Default)]
pub struct EngineRegistry {
    engines: BTreeMap<&'static str, Box<dyn DisassemblyEngine>>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        Self { engines: BTreeMap::new() }
    }

    pub fn register<E: DisassemblyEngine + 'static>(&mut self, engine: E) -> &mut Self {
        self.engines.insert(engine.name(), Box::new(engine));
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn DisassemblyEngine> {
        self.engines.get(name).map(|e| &**e)
    }

    /// Like `get`, but a miss names the engines that are available.
    pub fn resolve(&self, name: &str) -> Result<&dyn DisassemblyEngine, UnknownEngine> {
        self.get(name)
            .ok_or_else(|| UnknownEngine { name: name.to_string(), available: self.names() })
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.engines.keys().copied().collect()
    }

    /// Registered engines in name order.
    pub fn engines(&self) -> impl Iterator<Item = &dyn DisassemblyEngine> {
        self.engines.values().map(|e| &**e)
    }
}

/// Registry populated with the built-in engines.
pub fn default_engine_registry(options: TraceOptions) -> EngineRegistry {
    let mut registry = EngineRegistry::new();
    registry.register(ClassFileEngine::new(options));
    registry
}

/// Runs an engine over a whole batch, all or nothing.
pub struct Disassembler<'a> {
    pub engine: &'a dyn DisassemblyEngine,
}

impl<'a> Disassembler<'a> {
    pub fn new(engine: &'a dyn DisassemblyEngine) -> Self {
        Self { engine }
    }

    /// Disassemble every class in `source`.
    ///
    /// The first class the engine rejects (or panics on) aborts the batch; the
    /// texts already rendered are dropped and only the failure is returned.
    pub fn disassemble(
        &self,
        source: &CompiledSource,
    ) -> Result<DisassembleResults, DisassembleFailure> {
        let engine_name = self.engine.name();
        let mut classes = BTreeMap::new();

        for (name, bytecode) in source.iter() {
            debug!(class = name, bytes = bytecode.len(), engine = engine_name, "disassembling class");
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.engine.render(bytecode)));
            let failure = match outcome {
                Ok(Ok(text)) => {
                    classes.insert(name.to_string(), text);
                    continue;
                }
                Ok(Err(err)) => DisassembleFailure::from_cause(&err),
                Err(payload) => DisassembleFailure::from_panic(engine_name, &*payload),
            };
            warn!(
                class = name,
                engine = engine_name,
                error = %failure.message,
                "disassembly failed; discarding batch"
            );
            return Err(failure);
        }

        debug!(classes = classes.len(), engine = engine_name, "disassembled batch");
        Ok(DisassembleResults { classes })
    }
}

/// Disassemble `source` with the built-in class-file engine.
pub fn disassemble(
    source: &CompiledSource,
    options: TraceOptions,
) -> Result<DisassembleResults, DisassembleFailure> {
    let engine = ClassFileEngine::new(options);
    Disassembler::new(&engine).disassemble(source)
}
