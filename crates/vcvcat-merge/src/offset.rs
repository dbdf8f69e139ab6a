//! Vertical placement of the imported patch.

use tracing::debug;
use vcvcat_types::{Module, Position};

use crate::bounds::BoundingBox;
use crate::error::{MergeError, MergeResult};

/// Move every module in `modules` below the bottom row of `above`.
///
/// Adds `above.max_row + 1` to each row and returns that offset. Rack rows
/// start at 0, so afterwards the smallest shifted row is strictly greater
/// than `above.max_row`. Fails with [`MergeError::RowOverflow`] if any row
/// would leave the `i64` range; `modules` is left unchanged in that case.
pub fn apply_row_offset(modules: &mut [Module], above: &BoundingBox) -> MergeResult<i64> {
    let offset = above
        .max_row
        .checked_add(1)
        .ok_or(MergeError::RowOverflow { row: above.max_row, offset: 1 })?;

    let shifted = modules
        .iter()
        .map(|m| {
            m.pos.shifted_rows(offset).ok_or(MergeError::RowOverflow {
                row: m.pos.row(),
                offset,
            })
        })
        .collect::<MergeResult<Vec<Position>>>()?;
    for (module, pos) in modules.iter_mut().zip(shifted) {
        module.pos = pos;
    }

    debug!(offset, modules = modules.len(), "shifted imported modules down");
    Ok(offset)
}
