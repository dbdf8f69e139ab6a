//! Identifier collision resolution.
//!
//! Both patches number their modules and cables independently, so the same
//! id can mean different things on each side. Every id of the imported
//! (second) patch that also appears anywhere in the first patch is given a
//! fresh value above the largest id of either patch, and the new value is
//! written into every field of the second patch that holds that id.
//!
//! Modules and cables share one flat namespace here: a module id on one side
//! collides with an equal cable id on the other.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;
use vcvcat_types::{Patch, PatchId, Reference};

use crate::error::{MergeError, MergeResult};

/// Every module id and cable id of one patch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdSpace {
    ids: BTreeSet<PatchId>,
}

impl IdSpace {
    /// Collect the identifier space of `patch`.
    pub fn of(patch: &Patch) -> Self {
        Self {
            ids: patch.ids().collect(),
        }
    }

    /// Largest id in the space.
    pub fn max(&self) -> Option<PatchId> {
        self.ids.last().copied()
    }

    /// Ids present in both spaces, ascending.
    pub fn collisions<'a>(&'a self, other: &'a Self) -> impl Iterator<Item = PatchId> + 'a {
        self.ids.intersection(&other.ids).copied()
    }
}

/// Hands out fresh ids, strictly increasing from a starting point.
#[derive(Clone, Debug)]
pub struct IdAllocator {
    last: PatchId,
}

impl IdAllocator {
    /// An allocator whose first id is `last + 1`.
    pub fn after(last: PatchId) -> Self {
        Self { last }
    }

    /// The next unused id.
    pub fn next_id(&mut self) -> MergeResult<PatchId> {
        let next = self
            .last
            .successor()
            .ok_or(MergeError::IdSpaceExhausted(self.last.get()))?;
        self.last = next;
        Ok(next)
    }
}

/// Mapping from colliding ids of the second patch to fresh ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RemapTable {
    entries: BTreeMap<PatchId, PatchId>,
}

impl RemapTable {
    /// Plan the remapping of `second`'s ids against `first`'s.
    ///
    /// Collisions are processed in ascending order starting from the largest
    /// id in either space, so the result is deterministic.
    pub fn plan(first: &IdSpace, second: &IdSpace) -> MergeResult<Self> {
        let mut entries = BTreeMap::new();
        let ceiling = first.max().into_iter().chain(second.max()).max();
        let Some(ceiling) = ceiling else {
            return Ok(Self { entries });
        };

        let mut alloc = IdAllocator::after(ceiling);
        for id in first.collisions(second) {
            entries.insert(id, alloc.next_id()?);
        }
        Ok(Self { entries })
    }

    /// The replacement for `id`, if it collides.
    pub fn get(&self, id: PatchId) -> Option<PatchId> {
        self.entries.get(&id).copied()
    }

    /// `id` after remapping: the replacement if it collides, else itself.
    pub fn resolve(&self, id: PatchId) -> PatchId {
        self.get(id).unwrap_or(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(old, new)` pairs in ascending order of the old id.
    pub fn iter(&self) -> impl Iterator<Item = (PatchId, PatchId)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, *v))
    }

    /// Rewrite every id-bearing field of `patch` through the table.
    ///
    /// Module `id`, `leftModuleId`, `rightModuleId` and cable `id`,
    /// `inputModuleId`, `outputModuleId` are each remapped independently.
    /// Absent optional fields stay absent.
    pub fn apply(&self, patch: &mut Patch) {
        if self.is_empty() {
            return;
        }
        for module in &mut patch.modules {
            module.id = self.resolve(module.id);
            self.resolve_reference(&mut module.left_module_id);
            self.resolve_reference(&mut module.right_module_id);
        }
        for cable in &mut patch.cables {
            cable.id = self.resolve(cable.id);
            self.resolve_reference(&mut cable.input_module_id);
            self.resolve_reference(&mut cable.output_module_id);
        }
    }

    fn resolve_reference(&self, field: &mut Reference) {
        if let Some(Some(id)) = field {
            *id = self.resolve(*id);
        }
    }
}

/// Remap `second` so that its ids no longer collide with `first`'s.
///
/// `first` is only read. Returns the table that was applied.
pub fn resolve_collisions(first: &Patch, second: &mut Patch) -> MergeResult<RemapTable> {
    let table = RemapTable::plan(&IdSpace::of(first), &IdSpace::of(second))?;
    table.apply(second);
    debug!(remapped = table.len(), "resolved identifier collisions");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vcvcat_types::{Cable, Module, Position};

    fn id(raw: i64) -> PatchId {
        PatchId::new(raw)
    }

    fn module_at(raw: i64, row: i64) -> Module {
        Module::new(raw, Position::new(0, row))
    }

    #[test]
    fn allocator_counts_up_from_start() {
        let mut alloc = IdAllocator::after(id(5));
        assert_eq!(alloc.next_id().unwrap(), id(6));
        assert_eq!(alloc.next_id().unwrap(), id(7));
    }

    #[test]
    fn allocator_refuses_to_overflow() {
        let mut alloc = IdAllocator::after(id(i64::MAX));
        assert!(matches!(alloc.next_id(), Err(MergeError::IdSpaceExhausted(i64::MAX))));
    }

    #[test]
    fn disjoint_spaces_need_no_remap() {
        let first = Patch::new("1.1.6").with_module(module_at(1, 0)).with_module(module_at(2, 0));
        let mut second = Patch::new("1.1.6").with_module(module_at(3, 0)).with_cable(Cable::new(4, 3, 3));
        let before = second.clone();

        let table = resolve_collisions(&first, &mut second).unwrap();

        assert!(table.is_empty());
        assert_eq!(second, before);
    }

    #[test]
    fn colliding_id_moves_above_global_max() {
        let first = Patch::new("1.1.6").with_module(module_at(1, 0)).with_module(module_at(2, 1));
        let mut second = Patch::new("1.1.6").with_module(module_at(2, 0)).with_module(module_at(5, 1));

        let table = resolve_collisions(&first, &mut second).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.get(id(2)), Some(id(6)));
        let ids: Vec<i64> = second.modules.iter().map(|m| m.id.get()).collect();
        assert_eq!(ids, vec![6, 5]);
    }

    #[test]
    fn collisions_are_numbered_in_ascending_order() {
        let first = Patch::new("1")
            .with_module(module_at(3, 0))
            .with_module(module_at(1, 0))
            .with_module(module_at(2, 0));
        let mut second = Patch::new("1")
            .with_module(module_at(2, 0))
            .with_module(module_at(3, 0))
            .with_module(module_at(1, 0));

        let table = resolve_collisions(&first, &mut second).unwrap();

        let pairs: Vec<(i64, i64)> = table.iter().map(|(a, b)| (a.get(), b.get())).collect();
        assert_eq!(pairs, vec![(1, 4), (2, 5), (3, 6)]);
    }

    #[test]
    fn references_follow_their_targets() {
        let first = Patch::new("1").with_module(module_at(1, 0)).with_cable(Cable::new(2, 1, 1));

        let mut left = module_at(1, 0);
        left.right_module_id = Some(Some(id(7)));
        let mut right = module_at(7, 0);
        right.left_module_id = Some(Some(id(1)));
        let mut second = Patch::new("1")
            .with_module(left)
            .with_module(right)
            .with_cable(Cable::new(2, 7, 1));

        let table = resolve_collisions(&first, &mut second).unwrap();

        // max id is 7, so 1 -> 8 and 2 -> 9.
        assert_eq!(table.get(id(1)), Some(id(8)));
        assert_eq!(table.get(id(2)), Some(id(9)));
        assert_eq!(second.modules[0].id, id(8));
        assert_eq!(second.modules[0].right_module_id, Some(Some(id(7))));
        assert_eq!(second.modules[1].id, id(7));
        assert_eq!(second.modules[1].left_module_id, Some(Some(id(8))));
        assert_eq!(second.cables[0].id, id(9));
        assert_eq!(second.cables[0].output_module_id, Some(Some(id(7))));
        assert_eq!(second.cables[0].input_module_id, Some(Some(id(8))));
    }

    #[test]
    fn modules_and_cables_share_one_namespace() {
        // A cable id in the first patch collides with a module id in the second.
        let first = Patch::new("1")
            .with_module(module_at(1, 0))
            .with_module(module_at(2, 0))
            .with_cable(Cable::new(10, 1, 2));
        let mut second = Patch::new("1").with_module(module_at(10, 0));

        let table = resolve_collisions(&first, &mut second).unwrap();

        assert_eq!(table.get(id(10)), Some(id(11)));
        assert_eq!(second.modules[0].id, id(11));
    }

    #[test]
    fn absent_references_stay_absent() {
        let first = Patch::new("1").with_module(module_at(1, 0));
        let mut cable = Cable::new(3, 1, 1);
        cable.input_module_id = None;
        let mut second = Patch::new("1").with_module(module_at(1, 0)).with_cable(cable);

        resolve_collisions(&first, &mut second).unwrap();

        assert_eq!(second.cables[0].input_module_id, None);
        assert_eq!(second.cables[0].output_module_id, Some(Some(id(4))));
        assert_eq!(second.modules[0].left_module_id, None);
    }

    #[test]
    fn null_references_stay_null() {
        let first = Patch::new("1").with_module(module_at(1, 0));
        let mut module = module_at(1, 0);
        module.left_module_id = Some(None);
        let mut cable = Cable::new(2, 1, 1);
        cable.output_module_id = Some(None);
        let mut second = Patch::new("1").with_module(module).with_cable(cable);

        resolve_collisions(&first, &mut second).unwrap();

        assert_eq!(second.modules[0].id, id(3));
        assert_eq!(second.modules[0].left_module_id, Some(None));
        assert_eq!(second.cables[0].output_module_id, Some(None));
        assert_eq!(second.cables[0].input_module_id, Some(Some(id(3))));
    }

    #[test]
    fn first_patch_is_not_touched() {
        let first = Patch::new("1").with_module(module_at(1, 0));
        let snapshot = first.clone();
        let mut second = Patch::new("1").with_module(module_at(1, 0));

        resolve_collisions(&first, &mut second).unwrap();

        assert_eq!(first, snapshot);
    }
}
