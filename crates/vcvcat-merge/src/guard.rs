//! Pre-merge checks: the version gate and the schema sanity check.
//!
//! The version gate is fatal. The schema check only reports top-level keys
//! the merge does not understand, because the merged output will not carry
//! them (unless [`MergeConfig::preserve_unknown_keys`] is set).

use std::fmt;

use tracing::debug;
use vcvcat_types::{NamedPatch, Patch};

use crate::config::MergeConfig;
use crate::error::{MergeError, MergeResult};

/// A top-level key outside the recognized set. Never fatal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaWarning {
    /// Name of the patch the key was found in.
    pub source: String,
    /// The unrecognized key.
    pub key: String,
}

impl fmt::Display for SchemaWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown key '{}' in {} - merge may be incomplete",
            self.key, self.source
        )
    }
}

/// Fail with [`MergeError::VersionMismatch`] unless both versions are equal.
pub fn check_versions(first: &Patch, second: &Patch) -> MergeResult<()> {
    if first.version != second.version {
        return Err(MergeError::VersionMismatch {
            first: first.version.clone(),
            second: second.version.clone(),
        });
    }
    Ok(())
}

/// Report every top-level key of `patch` that `config` does not recognize.
pub fn check_schema(patch: &NamedPatch, config: &MergeConfig) -> Vec<SchemaWarning> {
    patch
        .patch
        .top_level_keys()
        .into_iter()
        .filter(|key| !config.is_known(key))
        .map(|key| {
            debug!(source = %patch.name, key, "unknown top-level key");
            SchemaWarning {
                source: patch.name.clone(),
                key: key.to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn equal_versions_pass() {
        assert!(check_versions(&Patch::new("1.1.6"), &Patch::new("1.1.6")).is_ok());
    }

    #[test]
    fn different_versions_fail() {
        let err = check_versions(&Patch::new("1.1.6"), &Patch::new("2.0.0")).unwrap_err();
        match err {
            MergeError::VersionMismatch { first, second } => {
                assert_eq!(first, json!("1.1.6"));
                assert_eq!(second, json!("2.0.0"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn versions_are_opaque() {
        // "1.1.6" and "1.1.06" would be equal if parsed; they are not compared that way.
        assert!(check_versions(&Patch::new("1.1.6"), &Patch::new("1.1.06")).is_err());
        assert!(check_versions(&Patch::new(json!(1)), &Patch::new("1")).is_err());
    }

    #[test]
    fn known_keys_produce_no_warnings() {
        let patch = NamedPatch::new("a.vcv", Patch::new("1.1.6"));
        assert!(check_schema(&patch, &MergeConfig::default()).is_empty());
    }

    #[test]
    fn unknown_keys_are_reported_per_patch() {
        let mut patch = Patch::new("2.0.0");
        patch.extra.insert("zoom".into(), json!(1.0));
        patch.extra.insert("masterModuleId".into(), json!(3));
        let named = NamedPatch::new("b.vcv", patch);

        let warnings = check_schema(&named, &MergeConfig::default());
        assert_eq!(
            warnings,
            vec![
                SchemaWarning { source: "b.vcv".into(), key: "masterModuleId".into() },
                SchemaWarning { source: "b.vcv".into(), key: "zoom".into() },
            ]
        );
        assert_eq!(
            warnings[1].to_string(),
            "unknown key 'zoom' in b.vcv - merge may be incomplete"
        );
    }

    #[test]
    fn configured_keys_are_not_reported() {
        let mut patch = Patch::new("2.0.0");
        patch.extra.insert("zoom".into(), json!(1.0));
        let named = NamedPatch::new("c.vcv", patch);

        let config = MergeConfig::default().with_known_keys(["zoom"]);
        assert!(check_schema(&named, &config).is_empty());
    }
}
