//! Error types for loading and writing patch documents.

use std::path::PathBuf;

/// Errors produced while decoding, encoding, reading, or writing patches.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    /// The input is not valid JSON, or lacks a field the merge reads.
    #[error("malformed patch {source_name}: {source}")]
    Malformed {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },

    /// The output path already refers to an existing file.
    #[error("output file {0:?} already exists, refusing to overwrite")]
    OutputExists(PathBuf),

    /// Reading or writing a file failed.
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Encoding the merged patch failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias for patch I/O results.
pub type PatchResult<T> = Result<T, PatchError>;
