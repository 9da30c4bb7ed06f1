//! Filesystem-backed config and preset provider.
//!
//! The store owns a config directory laid out as:
//!
//! ```text
//! config/
//! ├── sandwich.json    # ingredients + modifiers
//! ├── globals.json     # global variables
//! └── presets/
//!     ├── bugfix.json
//!     └── feature.json
//! ```
//!
//! Filenames arriving from HTTP are untrusted; [`is_safe_filename`] rejects
//! anything that could escape the directory before the store touches disk.

use std::fs;
use std::path::{Path, PathBuf};

use promptwich::{GlobalsConfig, Preset, PresetListItem, SandwichConfig};
use tracing::{debug, warn};

/// Reject filenames that contain path separators or parent-directory
/// sequences. The HTTP layer maps a rejection to 403 Forbidden.
pub fn is_safe_filename(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.contains("..")
        && !filename.contains('/')
        && !filename.contains('\\')
}

/// Read-only provider for declaration documents and presets.
#[derive(Clone, Debug)]
pub struct ConfigStore {
    config_dir: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Read one raw config document (e.g. `sandwich.json`) as JSON.
    ///
    /// Callers must have vetted `filename` with [`is_safe_filename`] first.
    pub fn read_config(&self, filename: &str) -> Result<serde_json::Value, String> {
        let path = self.config_dir.join(filename);
        let data = fs::read_to_string(&path)
            .map_err(|e| format!("failed to read config '{filename}': {e}"))?;
        serde_json::from_str(&data).map_err(|e| format!("failed to parse config '{filename}': {e}"))
    }

    /// Load and parse the ingredient/modifier document.
    ///
    /// A failure here is fatal for session startup.
    pub fn load_sandwich(&self) -> Result<SandwichConfig, String> {
        let path = self.config_dir.join("sandwich.json");
        let data = fs::read_to_string(&path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
        let config = SandwichConfig::from_json(&data)?;
        debug!(
            "loaded sandwich config '{}' v{} ({} ingredients, {} modifiers)",
            config.meta.app_name,
            config.meta.version,
            config.ingredients.len(),
            config.modifiers.len()
        );
        Ok(config)
    }

    /// Load and parse the global-variable document.
    ///
    /// A failure here is fatal for session startup.
    pub fn load_globals(&self) -> Result<GlobalsConfig, String> {
        let path = self.config_dir.join("globals.json");
        let data = fs::read_to_string(&path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
        let config = GlobalsConfig::from_json(&data)?;
        debug!("loaded globals config ({} variables)", config.variables.len());
        Ok(config)
    }

    /// List the available presets, sorted by filename.
    ///
    /// A missing presets directory yields an empty list. Unreadable or
    /// malformed preset files are skipped with a warning rather than failing
    /// the whole listing.
    pub fn list_presets(&self) -> Vec<PresetListItem> {
        let presets_dir = self.config_dir.join("presets");
        let entries = match fs::read_dir(&presets_dir) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let mut filenames: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.ends_with(".json"))
            .collect();
        filenames.sort();

        let mut items = Vec::with_capacity(filenames.len());
        for filename in filenames {
            match self.read_preset(&filename) {
                Ok(preset) => items.push(PresetListItem {
                    filename,
                    name: preset.name,
                    description: preset.description,
                }),
                Err(e) => warn!("skipping preset '{filename}': {e}"),
            }
        }
        items
    }

    /// Read one preset document by filename.
    ///
    /// Callers must have vetted `filename` with [`is_safe_filename`] first.
    pub fn read_preset(&self, filename: &str) -> Result<Preset, String> {
        let path = self.config_dir.join("presets").join(filename);
        let data = fs::read_to_string(&path)
            .map_err(|e| format!("failed to read preset '{filename}': {e}"))?;
        Preset::from_json(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_filename_rejects_escapes() {
        assert!(is_safe_filename("bugfix.json"));
        assert!(is_safe_filename("feature-v2.json"));
        assert!(!is_safe_filename(""));
        assert!(!is_safe_filename("../secrets.json"));
        assert!(!is_safe_filename("a/../b.json"));
        assert!(!is_safe_filename("presets/inner.json"));
        assert!(!is_safe_filename("windows\\style.json"));
    }

    #[test]
    fn missing_presets_dir_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path());
        assert!(store.list_presets().is_empty());
    }

    #[test]
    fn listing_skips_malformed_presets() {
        let dir = tempfile::tempdir().unwrap();
        let presets = dir.path().join("presets");
        fs::create_dir(&presets).unwrap();
        fs::write(
            presets.join("b-good.json"),
            r#"{"name": "Good", "description": "works"}"#,
        )
        .unwrap();
        fs::write(presets.join("a-bad.json"), "{broken").unwrap();
        fs::write(presets.join("notes.txt"), "not a preset").unwrap();

        let store = ConfigStore::new(dir.path());
        let items = store.list_presets();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].filename, "b-good.json");
        assert_eq!(items[0].name, "Good");
    }

    #[test]
    fn listing_is_sorted_by_filename() {
        let dir = tempfile::tempdir().unwrap();
        let presets = dir.path().join("presets");
        fs::create_dir(&presets).unwrap();
        for name in ["zeta.json", "alpha.json", "mid.json"] {
            fs::write(
                presets.join(name),
                format!(r#"{{"name": "{name}", "description": ""}}"#),
            )
            .unwrap();
        }

        let store = ConfigStore::new(dir.path());
        let items = store.list_presets();
        let filenames: Vec<&str> = items.iter().map(|i| i.filename.as_str()).collect();
        assert_eq!(filenames, ["alpha.json", "mid.json", "zeta.json"]);
    }

    #[test]
    fn read_preset_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path());
        let err = store.read_preset("nope.json").unwrap_err();
        assert!(err.contains("failed to read preset"));
    }
}
