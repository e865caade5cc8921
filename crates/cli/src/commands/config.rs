use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use classtrace_core::TraceOptions;

/// Load trace options from a YAML (`.yaml`/`.yml`) or JSON (`.json`) file.
///
/// Fields left out of the file keep their defaults; an empty file yields the
/// default options.
pub fn load_trace_options(path: &Path) -> Result<TraceOptions> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    if contents.trim().is_empty() {
        return Ok(TraceOptions::default());
    }

    let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML config {}", path.display())),
        Some("json") => serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse JSON config {}", path.display())),
        _ => Err(anyhow!(
            "Unsupported config file {} (expected .yaml, .yml or .json)",
            path.display()
        )),
    }
}

/// Combine an optional config file with `--no-*` flags; flags win.
pub fn resolve_trace_options(
    config: Option<&str>,
    no_constant_pool: bool,
    no_code: bool,
    no_debug_info: bool,
) -> Result<TraceOptions> {
    let mut options = match config {
        Some(path) => load_trace_options(Path::new(path))?,
        None => TraceOptions::default(),
    };
    if no_constant_pool {
        options.constant_pool = false;
    }
    if no_code {
        options.code = false;
    }
    if no_debug_info {
        options.debug_info = false;
    }
    Ok(options)
}
