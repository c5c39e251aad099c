//! Persisted sigmoid parameter overrides.
//!
//! A flat JSON map `{ "<var>": { "midpoint": f64, "steepness": f64 } }`
//! stored next to the rest of the overlay's data. The file is created
//! lazily on first save. An absent or unreadable file, and any individual
//! malformed entry, silently fall back to the hardcoded defaults; loading
//! never fails.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::StoreError;

use super::sigmoid::{SigmoidParam, StatKey};

/// In-memory view of the override store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SigmoidOverrides {
    params: HashMap<StatKey, SigmoidParam>,
}

impl SigmoidOverrides {
    /// No overrides; every variable uses its default.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load overrides from `path`. Absence or corruption is equivalent to
    /// "no overrides"; malformed entries are dropped individually.
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Self::empty();
            }
            Err(err) => {
                log::warn!("sigmoid override store unreadable ({err}); using defaults");
                return Self::empty();
            }
        };

        let raw: HashMap<String, serde_json::Value> = match serde_json::from_str(&text) {
            Ok(raw) => raw,
            Err(err) => {
                log::warn!("sigmoid override store corrupt ({err}); using defaults");
                return Self::empty();
            }
        };

        let mut params = HashMap::new();
        for (name, value) in raw {
            let Some(key) = StatKey::from_var_name(&name) else {
                log::warn!("ignoring override for unknown variable '{name}'");
                continue;
            };
            match serde_json::from_value::<SigmoidParam>(value) {
                Ok(param) if param.is_finite() => {
                    params.insert(key, param);
                }
                Ok(_) => {
                    log::warn!("ignoring non-finite override for '{name}'");
                }
                Err(err) => {
                    log::warn!("ignoring malformed override for '{name}': {err}");
                }
            }
        }

        Self { params }
    }

    /// Write the store to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let map: HashMap<&str, SigmoidParam> = self
            .params
            .iter()
            .map(|(key, param)| (key.var_name(), *param))
            .collect();
        let text = serde_json::to_string_pretty(&map)?;
        fs::write(path, text)?;
        Ok(())
    }

    pub fn set(&mut self, key: StatKey, param: SigmoidParam) {
        self.params.insert(key, param);
    }

    pub fn clear(&mut self, key: StatKey) {
        self.params.remove(&key);
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Effective parameters for a variable: the override when present,
    /// otherwise the hardcoded default.
    pub fn param_for(&self, key: StatKey) -> SigmoidParam {
        self.params
            .get(&key)
            .copied()
            .unwrap_or_else(|| key.default_param())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_no_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let overrides = SigmoidOverrides::load(&dir.path().join("nope.json"));
        assert!(overrides.is_empty());
        assert_eq!(overrides.param_for(StatKey::Fkdr), StatKey::Fkdr.default_param());
    }

    #[test]
    fn test_corrupt_file_is_no_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sigmoid.json");
        fs::write(&path, "{ not json at all").unwrap();
        assert!(SigmoidOverrides::load(&path).is_empty());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("sigmoid.json");

        let mut overrides = SigmoidOverrides::empty();
        overrides.set(StatKey::Fkdr, SigmoidParam::new(4.0, 0.6));
        overrides.set(StatKey::Stars, SigmoidParam::new(400.0, 0.02));
        overrides.save(&path).unwrap();

        let loaded = SigmoidOverrides::load(&path);
        assert_eq!(loaded.param_for(StatKey::Fkdr), SigmoidParam::new(4.0, 0.6));
        assert_eq!(loaded.param_for(StatKey::Stars), SigmoidParam::new(400.0, 0.02));
        // Untouched variables keep their defaults.
        assert_eq!(loaded.param_for(StatKey::Wlr), StatKey::Wlr.default_param());
    }

    #[test]
    fn test_malformed_entry_dropped_individually() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sigmoid.json");
        fs::write(
            &path,
            r#"{
                "fkdr": { "midpoint": 4.0, "steepness": 0.6 },
                "wlr": { "midpoint": "oops" },
                "unknown_var": { "midpoint": 1.0, "steepness": 1.0 }
            }"#,
        )
        .unwrap();

        let loaded = SigmoidOverrides::load(&path);
        assert_eq!(loaded.param_for(StatKey::Fkdr), SigmoidParam::new(4.0, 0.6));
        assert_eq!(loaded.param_for(StatKey::Wlr), StatKey::Wlr.default_param());
    }
}
