//! Saved collections

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::lineage::Lineage;

/// A named, persisted snapshot of a lineage.
///
/// Image references inside `art_history` are resolvable paths; the store
/// rewrites them to collection-relative paths on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub artwork_count: usize,
    pub art_history: Lineage,
}

/// Listing entry for a saved collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub artwork_count: usize,

    /// First image of the lineage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,

    /// First, middle and last images, for an overview of the evolution
    #[serde(default)]
    pub thumbnails: Vec<String>,
}
