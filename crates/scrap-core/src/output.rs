//! Sanitizing writer: strip reserved keys and persist the merged tree

use serde_json::Value;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Top-level keys removed before the tree is persisted. Both case variants
/// are checked independently.
const STRIPPED_KEYS: [&str; 2] = ["spring", "Spring"];

/// Output writing error
#[derive(Debug, Error)]
pub enum OutputError {
    /// Destination path could not be opened or written
    #[error("Failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Merged tree could not be rendered as JSON
    #[error("Failed to render configuration JSON: {0}")]
    Render(#[from] serde_json::Error),
}

/// Remove the reserved top-level subtrees from the merged tree.
///
/// Absent keys are a no-op and the operation is idempotent. Non-object
/// trees are left untouched.
pub fn sanitize(tree: &mut Value) {
    if let Value::Object(map) = tree {
        for key in STRIPPED_KEYS {
            if map.shift_remove(key).is_some() {
                debug!("Stripped top-level key '{key}' from output");
            }
        }
    }
}

/// Append one pretty-printed JSON document to `path`, creating the file if
/// absent.
///
/// The destination is opened in append mode, so repeated runs grow the file
/// with one document per run. The handle is closed before returning.
pub fn write_document(path: &Path, tree: &Value) -> Result<(), OutputError> {
    let rendered = serde_json::to_string_pretty(tree)?;

    let io_err = |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err)?;
    writeln!(file, "{rendered}").map_err(io_err)?;
    Ok(())
}
