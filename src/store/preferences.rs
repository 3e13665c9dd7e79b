use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use log::warn;
use serde::{Serialize, de::DeserializeOwned};

/// Key under which the theme choice is stored.
pub const DARK_MODE_KEY: &str = "lingodeck-dark-mode";

/// Small keyed JSON store. Each key lives in its own `<key>.json` file.
pub struct PreferenceStore {
    base_dir: PathBuf,
}

impl PreferenceStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lingodeck");
        Self::with_base_dir(base_dir)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }

    /// Read `key`. Missing, unreadable or malformed values read as `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.file_path(key);
        let content = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("ignoring malformed preference {key}: {err}");
                None
            }
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let path = self.file_path(key);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string(value)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Stored theme choice. Anything but a JSON boolean means light.
    pub fn load_dark_mode(&self) -> bool {
        self.get(DARK_MODE_KEY).unwrap_or(false)
    }

    pub fn save_dark_mode(&self, dark: bool) -> Result<()> {
        self.set(DARK_MODE_KEY, &dark)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, PreferenceStore) {
        let dir = TempDir::new().unwrap();
        let store = PreferenceStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_missing_preference_is_light() {
        let (_dir, store) = make_test_store();
        assert!(!store.load_dark_mode());
    }

    #[test]
    fn test_dark_mode_round_trip() {
        let (_dir, store) = make_test_store();
        store.save_dark_mode(true).unwrap();
        assert!(store.load_dark_mode());
        store.save_dark_mode(false).unwrap();
        assert!(!store.load_dark_mode());
    }

    #[test]
    fn test_written_value_is_json_bool() {
        let (dir, store) = make_test_store();
        store.save_dark_mode(true).unwrap();
        let raw = fs::read_to_string(dir.path().join("lingodeck-dark-mode.json")).unwrap();
        assert_eq!(raw, "true");
        assert!(!dir.path().join("lingodeck-dark-mode.tmp").exists());
    }

    #[test]
    fn test_malformed_preference_is_light() {
        let (dir, store) = make_test_store();
        for garbage in ["", "yes", "\"true\"", "1", "{\"dark\":true}"] {
            fs::write(dir.path().join("lingodeck-dark-mode.json"), garbage).unwrap();
            assert!(!store.load_dark_mode(), "{garbage:?} should read as light");
        }
    }

    #[test]
    fn test_keys_are_independent() {
        let (_dir, store) = make_test_store();
        store.set("a", &1u32).unwrap();
        store.set("b", &"two").unwrap();
        assert_eq!(store.get::<u32>("a"), Some(1));
        assert_eq!(store.get::<String>("b").as_deref(), Some("two"));
        assert_eq!(store.get::<u32>("c"), None);
    }
}
