//! The patch document model.
//!
//! A patch is a VCV Rack document: a `version` tag, a list of positioned
//! modules, and a list of cables connecting them. Only the fields the merge
//! reads or rewrites are typed; everything else rides along in flattened
//! JSON maps so that module parameters, plugin data, and cable colors survive
//! a merge untouched.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::id::PatchId;

/// Top-level keys the merge understands.
pub const KNOWN_KEYS: [&str; 3] = ["version", "modules", "cables"];

/// A reference field as it appears in the file.
///
/// `None`: the key is absent. `Some(None)`: the key is present with `null`.
/// `Some(Some(id))`: the key points at module `id`. Absent and `null` are
/// written back exactly as they were read.
pub type Reference = Option<Option<PatchId>>;

/// Rack-grid position of a module, serialized as `[column, row]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position(pub i64, pub i64);

impl Position {
    pub const fn new(col: i64, row: i64) -> Self {
        Self(col, row)
    }

    pub const fn col(&self) -> i64 {
        self.0
    }

    pub const fn row(&self) -> i64 {
        self.1
    }

    /// The same position moved `delta` rows down, or `None` on overflow.
    pub const fn shifted_rows(self, delta: i64) -> Option<Self> {
        match self.1.checked_add(delta) {
            Some(row) => Some(Self(self.0, row)),
            None => None,
        }
    }
}

/// Deserialize a present key (even `null`) as `Some`, so that an explicit
/// `null` is told apart from a missing key.
fn present<'de, D>(deserializer: D) -> Result<Reference, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<PatchId>::deserialize(deserializer).map(Some)
}

/// A module placed in the rack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub id: PatchId,
    pub pos: Position,
    /// Module physically attached to the left.
    #[serde(
        rename = "leftModuleId",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub left_module_id: Reference,
    /// Module physically attached to the right.
    #[serde(
        rename = "rightModuleId",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub right_module_id: Reference,
    /// Every other module field (`plugin`, `model`, `params`, `data`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Module {
    /// A bare module with no adjacency links and no extra fields.
    pub fn new(id: impl Into<PatchId>, pos: Position) -> Self {
        Self {
            id: id.into(),
            pos,
            left_module_id: None,
            right_module_id: None,
            extra: Map::new(),
        }
    }

    /// Ids of the adjacent modules this module points at.
    pub fn references(&self) -> impl Iterator<Item = PatchId> {
        self.left_module_id
            .flatten()
            .into_iter()
            .chain(self.right_module_id.flatten())
    }
}

/// A cable between an output port of one module and an input port of another.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cable {
    pub id: PatchId,
    #[serde(
        rename = "inputModuleId",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub input_module_id: Reference,
    #[serde(
        rename = "outputModuleId",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub output_module_id: Reference,
    /// Every other cable field (`inputId`, `outputId`, `color`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Cable {
    /// A cable from `output` to `input` with no extra fields.
    pub fn new(
        id: impl Into<PatchId>,
        output: impl Into<PatchId>,
        input: impl Into<PatchId>,
    ) -> Self {
        Self {
            id: id.into(),
            input_module_id: Some(Some(input.into())),
            output_module_id: Some(Some(output.into())),
            extra: Map::new(),
        }
    }

    /// Ids of the modules at both ends of the cable.
    pub fn endpoints(&self) -> impl Iterator<Item = PatchId> {
        self.output_module_id
            .flatten()
            .into_iter()
            .chain(self.input_module_id.flatten())
    }
}

/// A parsed patch document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    /// Rack version that saved the patch. Opaque: compared, never parsed.
    pub version: Value,
    pub modules: Vec<Module>,
    pub cables: Vec<Cable>,
    /// Top-level fields outside [`KNOWN_KEYS`].
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Patch {
    /// An empty patch with the given version.
    pub fn new(version: impl Into<Value>) -> Self {
        Self {
            version: version.into(),
            modules: Vec::new(),
            cables: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_module(mut self, module: Module) -> Self {
        self.modules.push(module);
        self
    }

    pub fn with_cable(mut self, cable: Cable) -> Self {
        self.cables.push(cable);
        self
    }

    /// Every top-level key present in the document, in sorted order.
    pub fn top_level_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = KNOWN_KEYS
            .iter()
            .copied()
            .chain(self.extra.keys().map(String::as_str))
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Module ids followed by cable ids, in document order.
    pub fn ids(&self) -> impl Iterator<Item = PatchId> + '_ {
        self.modules
            .iter()
            .map(|m| m.id)
            .chain(self.cables.iter().map(|c| c.id))
    }
}

/// A patch together with the name it was loaded from.
#[derive(Clone, Debug, PartialEq)]
pub struct NamedPatch {
    /// Where the patch came from, used in diagnostics.
    pub name: String,
    pub patch: Patch,
}

impl NamedPatch {
    pub fn new(name: impl Into<String>, patch: Patch) -> Self {
        Self {
            name: name.into(),
            patch,
        }
    }
}
