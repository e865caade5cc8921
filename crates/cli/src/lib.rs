use std::path::{Component, Path};

use anyhow::{anyhow, Result};

pub mod commands;

/// File extension of compiled classes.
pub const CLASS_EXTENSION: &str = "class";

/// Whether `path` names a `.class` file (by extension only).
pub fn is_class_file(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(CLASS_EXTENSION)
}

/// Binary class name for a class file found under a directory root.
///
/// `com/example/Main.class` (relative to the root) becomes `com/example/Main`;
/// separators are always `/`, whatever the platform.
pub fn class_name_for(relative: &Path) -> Result<String> {
    let stem = relative.with_extension("");
    let mut parts = Vec::new();
    for component in stem.components() {
        match component {
            Component::Normal(part) => parts.push(
                part.to_str()
                    .ok_or_else(|| anyhow!("Class path is not valid UTF-8: {}", relative.display()))?,
            ),
            _ => return Err(anyhow!("Unexpected component in class path: {}", relative.display())),
        }
    }
    if parts.is_empty() {
        return Err(anyhow!("Cannot derive a class name from {}", relative.display()));
    }
    Ok(parts.join("/"))
}

/// Class name for a class file passed directly: its file stem.
pub fn class_name_for_file(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Cannot derive a class name from {}", path.display()))
}
