use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info};

use classtrace_core::services::disassembly::default_engine_registry;
use classtrace_core::{CompiledSource, DisassembleResults, Disassembler, TraceOptions};

use crate::{class_name_for, class_name_for_file, is_class_file};

/// Name of the engine used when `--engine` is not given.
pub const DEFAULT_ENGINE: &str = "classfile";

/// Build a batch from class files and directories.
///
/// A file is added under its file stem. A directory is scanned recursively
/// for `.class` files, each named by its path relative to the directory.
/// Two inputs resolving to the same class name are an error.
pub fn collect_compiled_source(paths: &[String]) -> Result<CompiledSource> {
    let mut source = CompiledSource::new();
    for raw in paths {
        let path = Path::new(raw);
        let metadata =
            fs::metadata(path).with_context(|| format!("Failed to read {}", path.display()))?;
        if metadata.is_dir() {
            let mut files = Vec::new();
            find_class_files(path, &mut files)?;
            files.sort();
            for file in files {
                let relative = file.strip_prefix(path).with_context(|| {
                    format!("{} is not under {}", file.display(), path.display())
                })?;
                add_class(&mut source, class_name_for(relative)?, &file)?;
            }
        } else {
            add_class(&mut source, class_name_for_file(path)?, path)?;
        }
    }
    Ok(source)
}

fn find_class_files(dir: &Path, out: &mut Vec<std::path::PathBuf>) -> Result<()> {
    for entry in
        fs::read_dir(dir).with_context(|| format!("Failed to read directory {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            find_class_files(&path, out)?;
        } else if is_class_file(&path) {
            out.push(path);
        }
    }
    Ok(())
}

fn add_class(source: &mut CompiledSource, name: String, path: &Path) -> Result<()> {
    if source.contains(&name) {
        return Err(anyhow!("Duplicate class name '{}' (from {})", name, path.display()));
    }
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read class file {}", path.display()))?;
    debug!(class = %name, path = %path.display(), bytes = bytes.len(), "loaded class file");
    source.insert(name, bytes);
    Ok(())
}

/// Text report: each class under an `== name ==` banner.
pub fn format_results(results: &DisassembleResults) -> String {
    if results.is_empty() {
        return "(no classes)\n".to_string();
    }
    let mut out = String::new();
    for (i, (name, text)) in results.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("== {name} ==\n"));
        out.push_str(text);
        if !text.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

/// Disassemble the given files/directories and print the listings.
///
/// On failure nothing but the failure is reported; in JSON mode the failure
/// record is printed to stdout before the error is returned.
pub fn disassemble_command(
    paths: &[String],
    engine: &str,
    options: TraceOptions,
    json: bool,
) -> Result<()> {
    let source = collect_compiled_source(paths)?;
    let registry = default_engine_registry(options);
    let engine = registry.resolve(engine)?;
    info!(classes = source.len(), engine = engine.name(), "disassembling");

    match Disassembler::new(engine).disassemble(&source) {
        Ok(results) => {
            if json {
                let serialized = serde_json::to_string_pretty(&results)
                    .context("Failed to serialize results to JSON")?;
                println!("{}", serialized);
            } else {
                print!("{}", format_results(&results));
            }
            Ok(())
        }
        Err(failure) => {
            if json {
                let serialized = serde_json::to_string_pretty(&failure)
                    .context("Failed to serialize failure to JSON")?;
                println!("{}", serialized);
            }
            Err(anyhow::Error::new(failure).context("Disassembly failed"))
        }
    }
}
