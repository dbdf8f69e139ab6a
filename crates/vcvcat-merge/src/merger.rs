//! The merge pipeline: guards, layout, id resolution, and assembly.

use tracing::debug;
use vcvcat_types::{NamedPatch, Patch, PatchId};

use crate::bounds::BoundingBox;
use crate::config::MergeConfig;
use crate::error::MergeResult;
use crate::guard::{check_schema, check_versions, SchemaWarning};
use crate::offset::apply_row_offset;
use crate::remap::{resolve_collisions, RemapTable};

/// Everything produced by a successful merge.
#[derive(Clone, Debug)]
pub struct MergeOutcome {
    /// The combined patch.
    pub patch: Patch,
    /// Unknown top-level keys found in either input.
    pub warnings: Vec<SchemaWarning>,
    /// Ids of the second patch that were renumbered.
    pub remap: RemapTable,
    /// Rows added to every module of the second patch.
    pub row_offset: i64,
    /// Extent of the first patch.
    pub first_bounds: BoundingBox,
    /// Extent of the second patch before it was shifted.
    pub second_bounds: BoundingBox,
}

impl MergeOutcome {
    /// Every module and cable id of the merged patch.
    pub fn ids(&self) -> impl Iterator<Item = PatchId> + '_ {
        self.patch.ids()
    }
}

/// A merge whose inputs passed the version gate and schema check.
///
/// Splitting the merge here lets callers report schema warnings before the
/// steps that can still fail (empty patches, row or id overflow).
#[derive(Debug)]
pub struct PendingMerge<'a> {
    first: NamedPatch,
    second: NamedPatch,
    warnings: Vec<SchemaWarning>,
    config: &'a MergeConfig,
}

impl<'a> PendingMerge<'a> {
    /// Check versions, then collect schema warnings for both patches.
    pub fn new(
        first: NamedPatch,
        second: NamedPatch,
        config: &'a MergeConfig,
    ) -> MergeResult<Self> {
        check_versions(&first.patch, &second.patch)?;

        let mut warnings = check_schema(&first, config);
        warnings.extend(check_schema(&second, config));

        Ok(Self {
            first,
            second,
            warnings,
            config,
        })
    }

    /// Unknown top-level keys found in either input.
    pub fn warnings(&self) -> &[SchemaWarning] {
        &self.warnings
    }

    /// Lay out, renumber, and assemble the merged patch.
    pub fn run(self) -> MergeResult<MergeOutcome> {
        let Self {
            first,
            second,
            warnings,
            config,
        } = self;

        let first_bounds = BoundingBox::of(&first.patch.modules, &first.name)?;
        let second_bounds = BoundingBox::of(&second.patch.modules, &second.name)?;

        let NamedPatch { patch: base, .. } = first;
        let NamedPatch { patch: mut imported, .. } = second;

        let row_offset = apply_row_offset(&mut imported.modules, &first_bounds)?;
        let remap = resolve_collisions(&base, &mut imported)?;

        let patch = assemble(base, imported, config);
        debug!(
            modules = patch.modules.len(),
            cables = patch.cables.len(),
            remapped = remap.len(),
            row_offset,
            "merged patches"
        );

        Ok(MergeOutcome {
            patch,
            warnings,
            remap,
            row_offset,
            first_bounds,
            second_bounds,
        })
    }
}

/// Merge `second` into `first`.
///
/// Fails before touching anything if the versions differ or either patch has
/// no modules. On success the output holds `first`'s modules and cables
/// followed by `second`'s, with `second` shifted below `first` and its
/// colliding ids renumbered.
pub fn merge(
    first: NamedPatch,
    second: NamedPatch,
    config: &MergeConfig,
) -> MergeResult<MergeOutcome> {
    PendingMerge::new(first, second, config)?.run()
}

/// Concatenate two prepared patches. `base` keeps its version and goes first.
fn assemble(base: Patch, imported: Patch, config: &MergeConfig) -> Patch {
    let Patch {
        version,
        mut modules,
        mut cables,
        extra: mut base_extra,
    } = base;
    modules.extend(imported.modules);
    cables.extend(imported.cables);

    let extra = if config.preserve_unknown_keys {
        for (key, value) in imported.extra {
            base_extra.entry(key).or_insert(value);
        }
        base_extra
    } else {
        Default::default()
    };

    Patch {
        version,
        modules,
        cables,
        extra,
    }
}
