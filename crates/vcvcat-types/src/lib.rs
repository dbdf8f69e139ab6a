//! Patch document types for vcvcat.
//!
//! This crate models VCV Rack patch files and reads/writes them as JSON.
//! The merge engine in `vcvcat-merge` operates purely on these types.
//!
//! # Key Types
//!
//! - [`Patch`] -- A parsed patch: version, modules, cables, unknown top-level fields
//! - [`Module`] / [`Cable`] -- The positioned nodes and the connections between them
//! - [`PatchId`] -- Identifier shared by modules and cables (one flat namespace)
//! - [`NamedPatch`] -- A patch paired with its source name for diagnostics

pub mod codec;
pub mod error;
pub mod id;
pub mod patch;

pub use codec::{decode_patch, encode_patch, read_patch, write_patch};
pub use error::{PatchError, PatchResult};
pub use id::PatchId;
pub use patch::{Cable, Module, NamedPatch, Patch, Position, Reference, KNOWN_KEYS};
