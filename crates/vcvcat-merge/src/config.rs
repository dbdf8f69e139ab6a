use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use vcvcat_types::KNOWN_KEYS;

/// Configuration for a patch merge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Top-level keys that do not trigger a schema warning.
    pub known_keys: BTreeSet<String>,
    /// Copy unknown top-level fields of both inputs into the output instead
    /// of dropping them. The first patch wins when both define a key.
    pub preserve_unknown_keys: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            known_keys: KNOWN_KEYS.iter().map(|k| (*k).to_string()).collect(),
            preserve_unknown_keys: false,
        }
    }
}

impl MergeConfig {
    /// Recognize additional top-level keys on top of the defaults.
    pub fn with_known_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_keys.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Keep unknown top-level fields in the merged output.
    pub fn preserving_unknown_keys(mut self) -> Self {
        self.preserve_unknown_keys = true;
        self
    }

    /// Whether `key` is a recognized top-level key.
    pub fn is_known(&self, key: &str) -> bool {
        self.known_keys.contains(key)
    }
}
