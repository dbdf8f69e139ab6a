use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a module or cable inside a patch.
///
/// Modules and cables share one flat namespace: the same numeric value used
/// as a module id and as a cable id denotes the same identifier for
/// collision purposes. Ids are unique within the patch they come from, not
/// globally.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatchId(i64);

impl PatchId {
    /// Wrap a raw identifier value.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// The raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }

    /// The id immediately above this one, or `None` on overflow.
    pub fn successor(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl From<i64> for PatchId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for PatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PatchId({})", self.0)
    }
}

impl fmt::Display for PatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
