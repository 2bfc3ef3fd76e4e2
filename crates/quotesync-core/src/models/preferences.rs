//! Persisted presentation preferences

use serde::{Deserialize, Serialize};

/// Category filter value meaning "no filter"
pub const ALL_CATEGORIES: &str = "All";

/// Small user preferences kept alongside the record collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Preferences {
    /// Last selected category filter (`None` or `All` means unfiltered)
    pub selected_category: Option<String>,
    /// Whether periodic background sync should run
    pub auto_sync: bool,
    /// Human-readable timestamp of the last completed sync
    pub last_sync: Option<String>,
}

impl Preferences {
    /// The active category filter, if any
    #[must_use]
    pub fn category_filter(&self) -> Option<&str> {
        self.selected_category
            .as_deref()
            .filter(|category| *category != ALL_CATEGORIES)
    }
}
