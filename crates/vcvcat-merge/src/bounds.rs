//! Spatial extent of a patch's modules.

use vcvcat_types::Module;

use crate::error::{MergeError, MergeResult};

/// Smallest rectangle of rack rows and columns covering every module position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_row: i64,
    pub max_row: i64,
    pub min_col: i64,
    pub max_col: i64,
}

impl BoundingBox {
    /// Compute the extent of `modules`.
    ///
    /// `source_name` identifies the patch in the [`MergeError::EmptyPatch`]
    /// error returned when there are no modules.
    pub fn of(modules: &[Module], source_name: &str) -> MergeResult<Self> {
        let (first, rest) = modules.split_first().ok_or_else(|| MergeError::EmptyPatch {
            source_name: source_name.to_string(),
        })?;

        let start = Self {
            min_row: first.pos.row(),
            max_row: first.pos.row(),
            min_col: first.pos.col(),
            max_col: first.pos.col(),
        };
        Ok(rest.iter().fold(start, |bb, m| Self {
            min_row: bb.min_row.min(m.pos.row()),
            max_row: bb.max_row.max(m.pos.row()),
            min_col: bb.min_col.min(m.pos.col()),
            max_col: bb.max_col.max(m.pos.col()),
        }))
    }

    /// Number of rows spanned, inclusive. Saturates at `u64::MAX`.
    pub fn height(&self) -> u64 {
        self.max_row.abs_diff(self.min_row).saturating_add(1)
    }

    /// Number of columns spanned, inclusive. Saturates at `u64::MAX`.
    pub fn width(&self) -> u64 {
        self.max_col.abs_diff(self.min_col).saturating_add(1)
    }
}
