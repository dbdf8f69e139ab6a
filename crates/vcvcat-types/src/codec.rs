//! JSON codec for patch documents.
//!
//! Output is written with keys sorted at every nesting level and two-space
//! indentation so merged patches diff cleanly. Files are created with
//! exclusive-create semantics: an existing output is never overwritten.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{PatchError, PatchResult};
use crate::patch::{NamedPatch, Patch};

/// Parse a patch from JSON text. `source_name` is used in error messages.
pub fn decode_patch(text: &str, source_name: &str) -> PatchResult<Patch> {
    serde_json::from_str(text).map_err(|source| PatchError::Malformed {
        source_name: source_name.to_string(),
        source,
    })
}

/// Render a patch as pretty JSON with recursively sorted keys.
pub fn encode_patch(patch: &Patch) -> PatchResult<String> {
    let value =
        serde_json::to_value(patch).map_err(|e| PatchError::Serialization(e.to_string()))?;
    serde_json::to_string_pretty(&sort_keys(value))
        .map_err(|e| PatchError::Serialization(e.to_string()))
}

/// Load a patch file, naming it after its path.
pub fn read_patch(path: &Path) -> PatchResult<NamedPatch> {
    let name = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|source| PatchError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let patch = decode_patch(&text, &name)?;
    debug!(
        source = %name,
        modules = patch.modules.len(),
        cables = patch.cables.len(),
        "loaded patch"
    );
    Ok(NamedPatch::new(name, patch))
}

/// Write a patch to a new file. Fails with [`PatchError::OutputExists`] if
/// anything is already at `path`.
pub fn write_patch(path: &Path, patch: &Patch) -> PatchResult<()> {
    let encoded = encode_patch(patch)?;
    let io_err = |source: std::io::Error| PatchError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => PatchError::OutputExists(path.to_path_buf()),
            _ => io_err(e),
        })?;
    file.write_all(encoded.as_bytes()).map_err(io_err)?;
    file.flush().map_err(io_err)?;

    debug!(path = %path.display(), bytes = encoded.len(), "wrote merged patch");
    Ok(())
}

/// Rebuild every object in `value` with its keys in sorted order.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sort_keys(v)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}
