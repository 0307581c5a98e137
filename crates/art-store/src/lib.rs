//! Collection storage for artwork lineages.
//!
//! A collection is a directory holding `metadata.json` and an `images/`
//! folder with private copies of every local image its lineage references.

pub mod assets;
pub mod error;
pub mod ids;
pub mod metadata;
pub mod store;

pub use error::{Result, StoreError};
pub use metadata::CollectionMetadata;
pub use store::{CollectionStore, FileCollectionStore};
