//! Preferences repository

use std::sync::Arc;

use super::{BlobStore, AUTO_SYNC_KEY, LAST_SYNC_KEY, SELECTED_CATEGORY_KEY};
use crate::error::Result;
use crate::models::Preferences;
use crate::util::{normalize_text_option, parse_flag};

/// Loads and saves [`Preferences`], one blob per field
#[derive(Clone)]
pub struct PreferencesRepository {
    blobs: Arc<dyn BlobStore>,
}

impl PreferencesRepository {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self { blobs }
    }

    /// Load preferences; missing or garbled values fall back to defaults
    pub fn load(&self) -> Result<Preferences> {
        let mut preferences = Preferences::default();

        if let Some(value) = self.blobs.get(SELECTED_CATEGORY_KEY)? {
            preferences.selected_category = normalize_text_option(Some(value));
        }

        if let Some(value) = self.blobs.get(AUTO_SYNC_KEY)? {
            preferences.auto_sync = parse_flag(&value);
        }

        if let Some(value) = self.blobs.get(LAST_SYNC_KEY)? {
            preferences.last_sync = normalize_text_option(Some(value));
        }

        Ok(preferences)
    }

    pub fn save(&self, preferences: &Preferences) -> Result<()> {
        self.save_selected_category(preferences.selected_category.as_deref())?;
        self.save_auto_sync(preferences.auto_sync)?;
        self.save_last_sync(preferences.last_sync.as_deref())
    }

    pub fn save_selected_category(&self, category: Option<&str>) -> Result<()> {
        self.put_optional(SELECTED_CATEGORY_KEY, category)
    }

    pub fn save_auto_sync(&self, enabled: bool) -> Result<()> {
        self.blobs
            .put(AUTO_SYNC_KEY, if enabled { "1" } else { "0" })
    }

    pub fn save_last_sync(&self, last_sync: Option<&str>) -> Result<()> {
        self.put_optional(LAST_SYNC_KEY, last_sync)
    }

    fn put_optional(&self, key: &str, value: Option<&str>) -> Result<()> {
        match value {
            Some(value) => self.blobs.put(key, value),
            None => self.blobs.remove(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBlobStore;

    fn setup() -> PreferencesRepository {
        PreferencesRepository::new(Arc::new(MemoryBlobStore::new()))
    }

    #[test]
    fn test_load_default_preferences() {
        let repo = setup();
        assert_eq!(repo.load().unwrap(), Preferences::default());
    }

    #[test]
    fn test_save_and_load_preferences() {
        let repo = setup();
        let preferences = Preferences {
            selected_category: Some("Life".to_string()),
            auto_sync: true,
            last_sync: Some("2024-05-01 10:00:00 UTC".to_string()),
        };

        repo.save(&preferences).unwrap();
        assert_eq!(repo.load().unwrap(), preferences);

        repo.save(&Preferences::default()).unwrap();
        assert_eq!(repo.load().unwrap(), Preferences::default());
    }

    #[test]
    fn test_garbled_auto_sync_reads_false() {
        let repo = PreferencesRepository::new(Arc::new(MemoryBlobStore::with_entries([(
            AUTO_SYNC_KEY,
            "sometimes",
        )])));
        assert!(!repo.load().unwrap().auto_sync);
    }
}
