//! Persisted package-to-profile mapping.
//!
//! The store is a flat key-value map persisted as one JSON file. The
//! category mapping lives under a single key in a legacy ':'-delimited
//! encoding (six comma-terminated package lists, one per stored category);
//! per-app touch tuning values live under the package name as key.

use crate::profile::category::{ThermalCategory, STORED_CATEGORIES};
use crate::profile::tuning::TouchTuning;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Store key holding the ':'-delimited category mapping.
pub const CONTROL_KEY: &str = "thermal_control";

/// Persisted profile configuration.
///
/// A package appears in at most one category; assigning a new category
/// removes it from the previous one. `ThermalCategory::Default` is never
/// stored - removing a package from every segment means default.
pub struct ProfileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl ProfileStore {
    /// Open the store at `path`, loading existing values if the file exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let values = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| StoreError::Io(e.to_string()))?;
            serde_json::from_str(&content).map_err(|e| StoreError::Parse(e.to_string()))?
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, values })
    }

    /// Create an empty store at `path` without touching the filesystem.
    pub fn empty(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            values: BTreeMap::new(),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Assign `package` to `category`, removing it from any previous
    /// category first. Assigning `Default` just removes the package.
    /// Persists the updated mapping atomically.
    pub fn set_category(
        &mut self,
        package: &str,
        category: ThermalCategory,
    ) -> Result<(), StoreError> {
        // The wire format cannot represent these characters.
        if package.is_empty() || package.contains(',') || package.contains(':') {
            return Err(StoreError::InvalidPackage(package.to_string()));
        }

        let mut segments = self.segments();
        for segment in &mut segments {
            segment.retain(|p| p != package);
        }
        if let Some(index) = category.segment_index() {
            segments[index].push(package.to_string());
        }

        self.values.insert(CONTROL_KEY.to_string(), encode(&segments));
        self.save()
    }

    /// Category currently assigned to `package`, or `Default` if absent.
    ///
    /// A stored value with the wrong segment count is treated as no mapping
    /// at all, so every lookup fails closed to `Default`.
    pub fn category_of(&self, package: &str) -> ThermalCategory {
        let Some(value) = self.values.get(CONTROL_KEY) else {
            return ThermalCategory::Default;
        };
        let Some(segments) = decode(value) else {
            return ThermalCategory::Default;
        };

        segments
            .iter()
            .position(|segment| segment.iter().any(|p| p == package))
            .map(|index| STORED_CATEGORIES[index])
            .unwrap_or(ThermalCategory::Default)
    }

    /// All non-default assignments, in segment order.
    pub fn assignments(&self) -> Vec<(String, ThermalCategory)> {
        let mut out = Vec::new();
        for (index, segment) in self.segments().iter().enumerate() {
            for package in segment {
                out.push((package.clone(), STORED_CATEGORIES[index]));
            }
        }
        out
    }

    /// Store touch tuning for `package` and persist.
    pub fn set_tuning(&mut self, package: &str, tuning: TouchTuning) -> Result<(), StoreError> {
        self.values.insert(package.to_string(), tuning.to_csv());
        self.save()
    }

    /// Remove touch tuning for `package` and persist.
    pub fn clear_tuning(&mut self, package: &str) -> Result<(), StoreError> {
        self.values.remove(package);
        self.save()
    }

    /// Touch tuning configured for `package`, if any. Malformed stored
    /// values read as "not configured".
    pub fn tuning_of(&self, package: &str) -> Option<TouchTuning> {
        self.values
            .get(package)
            .and_then(|value| TouchTuning::from_csv(value))
    }

    /// Decoded category segments; a missing or malformed stored value
    /// yields the empty mapping. A malformed value found on the write path
    /// is discarded (the next save replaces it with a well-formed one).
    fn segments(&self) -> Vec<Vec<String>> {
        match self.values.get(CONTROL_KEY) {
            None => vec![Vec::new(); STORED_CATEGORIES.len()],
            Some(value) => decode(value).unwrap_or_else(|| {
                warn!("malformed category mapping in store, resetting to empty");
                vec![Vec::new(); STORED_CATEGORIES.len()]
            }),
        }
    }

    /// Persist the store atomically (write to temp file, then rename).
    fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(&self.values)
            .map_err(|e| StoreError::Serialize(e.to_string()))?;

        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, content).map_err(|e| StoreError::Io(e.to_string()))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| StoreError::Io(e.to_string()))?;

        Ok(())
    }
}

/// Decode the ':'-delimited mapping into per-category package lists.
/// Returns `None` unless the value has exactly six segments.
fn decode(value: &str) -> Option<Vec<Vec<String>>> {
    let raw: Vec<&str> = value.split(':').collect();
    if raw.len() != STORED_CATEGORIES.len() {
        return None;
    }

    Some(
        raw.iter()
            .map(|segment| {
                segment
                    .split(',')
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .collect(),
    )
}

/// Encode per-category package lists back into the legacy wire format:
/// comma-terminated lists joined by ':'.
fn encode(segments: &[Vec<String>]) -> String {
    segments
        .iter()
        .map(|segment| {
            segment
                .iter()
                .map(|p| format!("{p},"))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(":")
}

/// Store errors.
#[derive(Debug)]
pub enum StoreError {
    Io(String),
    Parse(String),
    Serialize(String),
    InvalidPackage(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "IO error: {e}"),
            StoreError::Parse(e) => write!(f, "Parse error: {e}"),
            StoreError::Serialize(e) => write!(f, "Serialize error: {e}"),
            StoreError::InvalidPackage(p) => write!(f, "Invalid package name: {p:?}"),
        }
    }
}

impl std::error::Error for StoreError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store(name: &str) -> ProfileStore {
        let path = std::env::temp_dir()
            .join("thermal-agent-store-test")
            .join(format!("{}-{}.json", name, std::process::id()));
        let _ = std::fs::remove_file(&path);
        ProfileStore::empty(path)
    }

    #[test]
    fn test_set_and_get_category() {
        let mut store = test_store("set-get");
        store
            .set_category("com.bench", ThermalCategory::Benchmark)
            .unwrap();
        store
            .set_category("com.game", ThermalCategory::Gaming)
            .unwrap();

        assert_eq!(store.category_of("com.bench"), ThermalCategory::Benchmark);
        assert_eq!(store.category_of("com.game"), ThermalCategory::Gaming);
        assert_eq!(store.category_of("com.other"), ThermalCategory::Default);
    }

    #[test]
    fn test_reassign_removes_old_membership() {
        let mut store = test_store("reassign");
        store
            .set_category("com.app", ThermalCategory::Browser)
            .unwrap();
        store
            .set_category("com.keep", ThermalCategory::Browser)
            .unwrap();
        store
            .set_category("com.app", ThermalCategory::Streaming)
            .unwrap();

        assert_eq!(store.category_of("com.app"), ThermalCategory::Streaming);
        // com.keep stays in Browser, and com.app appears exactly once.
        assert_eq!(store.category_of("com.keep"), ThermalCategory::Browser);
        let members: Vec<_> = store
            .assignments()
            .into_iter()
            .filter(|(p, _)| p == "com.app")
            .collect();
        assert_eq!(members.len(), 1);
    }

    #[test]
    fn test_assign_default_removes_package() {
        let mut store = test_store("default");
        store
            .set_category("com.app", ThermalCategory::Camera)
            .unwrap();
        store
            .set_category("com.app", ThermalCategory::Default)
            .unwrap();

        assert_eq!(store.category_of("com.app"), ThermalCategory::Default);
        assert!(store.assignments().is_empty());
    }

    #[test]
    fn test_rejects_undecodable_package_names() {
        let mut store = test_store("invalid");
        assert!(store
            .set_category("com.a,b", ThermalCategory::Gaming)
            .is_err());
        assert!(store
            .set_category("com.a:b", ThermalCategory::Gaming)
            .is_err());
        assert!(store.set_category("", ThermalCategory::Gaming).is_err());
    }

    #[test]
    fn test_malformed_mapping_fails_closed() {
        let mut store = test_store("malformed");
        store
            .values
            .insert(CONTROL_KEY.to_string(), "com.app,:only:three".to_string());

        assert_eq!(store.category_of("com.app"), ThermalCategory::Default);
    }

    #[test]
    fn test_legacy_encoding_shape() {
        let mut store = test_store("encoding");
        store
            .set_category("com.bench", ThermalCategory::Benchmark)
            .unwrap();
        store
            .set_category("com.game", ThermalCategory::Gaming)
            .unwrap();

        let value = store.values.get(CONTROL_KEY).unwrap();
        assert_eq!(value, "com.bench,::::com.game,:");
    }

    #[test]
    fn test_persistence_roundtrip() {
        let mut store = test_store("persist");
        store
            .set_category("com.game", ThermalCategory::Gaming)
            .unwrap();
        store
            .set_tuning("com.game", TouchTuning::new(1, 5, 6, 7))
            .unwrap();
        let path = store.path().to_path_buf();

        let reloaded = ProfileStore::open(&path).unwrap();
        assert_eq!(reloaded.category_of("com.game"), ThermalCategory::Gaming);
        assert_eq!(
            reloaded.tuning_of("com.game"),
            Some(TouchTuning::new(1, 5, 6, 7))
        );
    }

    #[test]
    fn test_tuning_clear() {
        let mut store = test_store("tuning-clear");
        store
            .set_tuning("com.game", TouchTuning::new(1, 2, 3, 4))
            .unwrap();
        assert!(store.tuning_of("com.game").is_some());

        store.clear_tuning("com.game").unwrap();
        assert_eq!(store.tuning_of("com.game"), None);
    }
}
