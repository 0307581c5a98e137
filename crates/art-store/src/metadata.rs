use art_core::{Collection, Lineage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const METADATA_FILE: &str = "metadata.json";
pub const METADATA_TMP_FILE: &str = "metadata.json.tmp";
pub const IMAGES_DIR: &str = "images";

/// On-disk shape of `metadata.json`.
///
/// Image references in `art_history` are relative to the collection
/// directory for every image the collection owns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionMetadata {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub artwork_count: usize,
    pub art_history: Lineage,
}

impl CollectionMetadata {
    pub fn new(name: &str, description: &str, art_history: Lineage) -> Self {
        let now = Utc::now();
        Self {
            name: name.trim().to_string(),
            description: description.to_string(),
            created_at: now,
            updated_at: now,
            artwork_count: art_history.len(),
            art_history,
        }
    }

    /// Replace the lineage, keeping name, description and creation time.
    pub fn replace_history(&mut self, art_history: Lineage) {
        self.updated_at = Utc::now().max(self.created_at);
        self.artwork_count = art_history.len();
        self.art_history = art_history;
    }

    pub fn into_collection(self, id: impl Into<String>) -> Collection {
        Collection {
            id: id.into(),
            name: self.name,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
            artwork_count: self.artwork_count,
            art_history: self.art_history,
        }
    }
}
