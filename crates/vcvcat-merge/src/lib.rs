//! Merge engine for vcvcat.
//!
//! Combines two VCV Rack patches into one: the second patch is stacked
//! below the first and its module/cable ids are renumbered wherever they
//! collide with ids of the first patch.
//!
//! # Pipeline
//!
//! 1. [`check_versions`] -- both patches must come from the same Rack version
//! 2. [`check_schema`] -- warn about top-level keys the merge will drop
//! 3. [`BoundingBox::of`] -- extent of each patch's modules
//! 4. [`apply_row_offset`] -- shift the second patch below the first
//! 5. [`resolve_collisions`] -- renumber colliding ids of the second patch
//! 6. [`merge`] -- run the above and concatenate modules and cables
//!
//! [`PendingMerge`] runs steps 1 and 2 on their own so that schema warnings
//! can be reported before the remaining steps are attempted.

pub mod bounds;
pub mod config;
pub mod error;
pub mod guard;
pub mod merger;
pub mod offset;
pub mod remap;

pub use bounds::BoundingBox;
pub use config::MergeConfig;
pub use error::{MergeError, MergeResult};
pub use guard::{check_schema, check_versions, SchemaWarning};
pub use merger::{merge, MergeOutcome, PendingMerge};
pub use offset::apply_row_offset;
pub use remap::{resolve_collisions, IdAllocator, IdSpace, RemapTable};
