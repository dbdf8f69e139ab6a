//! Error types for the merge engine.

use serde_json::Value;

/// Errors that abort a merge. Nothing is written when one of these occurs.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// The two patches were saved by different Rack versions.
    #[error(
        "these patches come from different versions of VCV Rack ({first} vs {second}); \
         please save them with the same version of VCV Rack and retry"
    )]
    VersionMismatch { first: Value, second: Value },

    /// A patch has no modules, so it has no extent to stack against.
    #[error("patch {source_name} contains no modules")]
    EmptyPatch { source_name: String },

    /// Shifting a module down would move it past the last representable row.
    #[error("row {row} cannot be shifted down by {offset} rows")]
    RowOverflow { row: i64, offset: i64 },

    /// No fresh identifier is left above the largest id in use.
    #[error("identifier space exhausted: no id available above {0}")]
    IdSpaceExhausted(i64),
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;
