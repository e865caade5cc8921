use anyhow::Result;
use serde::Serialize;

use classtrace_core::services::disassembly::default_engine_registry;
use classtrace_core::TraceOptions;

#[derive(Debug, Serialize)]
pub struct EngineInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// Engines known to this binary, sorted by name.
pub fn engine_infos() -> Vec<EngineInfo> {
    let registry = default_engine_registry(TraceOptions::default());
    registry
        .engines()
        .map(|engine| EngineInfo { name: engine.name(), description: engine.description() })
        .collect()
}

/// List available disassembly engines.
pub fn list_engines_command(json: bool) -> Result<()> {
    let entries = engine_infos();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("Engines: (none)");
        return Ok(());
    }

    println!("Engines:");
    for entry in entries {
        println!("- {}: {}", entry.name, entry.description);
    }

    Ok(())
}
