//! Collection store trait and file-backed implementation

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use art_core::{Collection, CollectionSummary, Lineage};
use async_trait::async_trait;
use chrono::Local;
use log::{debug, info, warn};
use tokio::fs;

use crate::assets::{resolve_lineage, resolve_reference, AssetCopier};
use crate::error::{Result, StoreError};
use crate::ids::{collection_id_base, is_valid_id, with_suffix};
use crate::metadata::{CollectionMetadata, METADATA_FILE, METADATA_TMP_FILE};

/// Persistence for named lineage snapshots.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Save a new collection and return its id
    async fn save(&self, name: &str, description: &str, lineage: &Lineage) -> Result<String>;

    /// Summaries of every readable collection, newest first
    async fn list(&self) -> Result<Vec<CollectionSummary>>;

    /// Load a collection with image references resolved to the collection root
    async fn load(&self, id: &str) -> Result<Collection>;

    /// Replace the lineage of an existing collection
    async fn update(&self, id: &str, lineage: &Lineage) -> Result<()>;

    /// Remove a collection and every asset it owns
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Directory-per-collection storage rooted at a collections directory.
#[derive(Clone)]
pub struct FileCollectionStore {
    root: PathBuf,
}

impl FileCollectionStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_dir(&self, id: &str) -> Result<PathBuf> {
        if !is_valid_id(id) {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(self.root.join(id))
    }

    /// Claim a fresh directory; `create_dir` fails if it already exists.
    async fn claim_dir(&self, name: &str) -> Result<(String, PathBuf)> {
        fs::create_dir_all(&self.root).await?;
        let base = collection_id_base(name, Local::now());
        let mut attempt = 0;
        loop {
            let id = with_suffix(&base, attempt);
            let dir = self.root.join(&id);
            match fs::create_dir(&dir).await {
                Ok(()) => return Ok((id, dir)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn read_metadata(&self, id: &str, dir: &Path) -> Result<CollectionMetadata> {
        let path = dir.join(METADATA_FILE);
        let contents = match fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&contents).map_err(|e| StoreError::Corrupt {
            id: id.to_string(),
            reason: e.to_string(),
        })
    }

    async fn write_collection(
        &self,
        dir: &Path,
        mut metadata: CollectionMetadata,
        lineage: &Lineage,
    ) -> Result<()> {
        let mut copier = AssetCopier::new(dir).await?;
        let persisted = match copier.persist(lineage).await {
            Ok(persisted) => persisted,
            Err(e) => {
                copier.discard_copies().await;
                return Err(e);
            }
        };
        metadata.replace_history(persisted.clone());
        if let Err(e) = write_metadata(dir, &metadata).await {
            copier.discard_copies().await;
            return Err(e);
        }

        match copier.prune_unreferenced(&persisted).await {
            Ok(0) => {}
            Ok(n) => debug!("[store] Pruned {} images from {:?}", n, dir),
            Err(e) => warn!("[store] Failed to prune images in {:?}: {}", dir, e),
        }
        Ok(())
    }

    fn summarize(&self, id: &str, dir: &Path, metadata: CollectionMetadata) -> CollectionSummary {
        let iterations = metadata.art_history.iterations();
        let resolve = |i: usize| resolve_reference(dir, &iterations[i].image_reference);

        let len = iterations.len();
        let mut picks = vec![0];
        if len > 2 {
            picks.push(len / 2);
        }
        if len > 1 {
            picks.push(len - 1);
        }
        let thumbnails: Vec<String> = picks.into_iter().map(resolve).collect();

        CollectionSummary {
            id: id.to_string(),
            thumbnail: thumbnails.first().cloned(),
            thumbnails,
            name: metadata.name,
            description: metadata.description,
            created_at: metadata.created_at,
            updated_at: metadata.updated_at,
            artwork_count: metadata.art_history.len(),
        }
    }
}

/// Write `metadata.json` through a temp file and rename.
async fn write_metadata(dir: &Path, metadata: &CollectionMetadata) -> Result<()> {
    let tmp = dir.join(METADATA_TMP_FILE);
    let contents = serde_json::to_string_pretty(metadata)?;

    let written = async {
        fs::write(&tmp, contents).await?;
        fs::rename(&tmp, dir.join(METADATA_FILE)).await
    }
    .await;

    if let Err(e) = written {
        let _ = fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    Ok(())
}

#[async_trait]
impl CollectionStore for FileCollectionStore {
    async fn save(&self, name: &str, description: &str, lineage: &Lineage) -> Result<String> {
        if name.trim().is_empty() {
            return Err(StoreError::Validation(
                "Collection name must not be empty".to_string(),
            ));
        }
        lineage
            .validate()
            .map_err(|e| StoreError::Validation(e.to_string()))?;

        let (id, dir) = self.claim_dir(name).await?;
        let metadata = CollectionMetadata::new(name, description, lineage.clone());

        if let Err(e) = self.write_collection(&dir, metadata, lineage).await {
            warn!("[store] Saving collection {} failed, removing it: {}", id, e);
            if let Err(cleanup) = fs::remove_dir_all(&dir).await {
                warn!("[store] Failed to remove partial collection {:?}: {}", dir, cleanup);
            }
            return Err(e);
        }

        info!("[store] Saved collection {} ({} artworks)", id, lineage.len());
        Ok(id)
    }

    async fn list(&self) -> Result<Vec<CollectionSummary>> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut summaries = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let dir = entry.path();
            if !dir.join(METADATA_FILE).is_file() {
                continue;
            }
            let id = entry.file_name().to_string_lossy().into_owned();

            match self.read_metadata(&id, &dir).await {
                Ok(metadata) => summaries.push(self.summarize(&id, &dir, metadata)),
                Err(e) => warn!("[store] Skipping collection {}: {}", id, e),
            }
        }

        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        debug!("[store] Listed {} collections", summaries.len());
        Ok(summaries)
    }

    async fn load(&self, id: &str) -> Result<Collection> {
        let dir = self.collection_dir(id)?;
        let metadata = self.read_metadata(id, &dir).await?;

        let resolved =
            resolve_lineage(&dir, &metadata.art_history).map_err(|e| StoreError::Corrupt {
                id: id.to_string(),
                reason: e.to_string(),
            })?;

        let mut collection = metadata.into_collection(id);
        collection.artwork_count = resolved.len();
        collection.art_history = resolved;
        Ok(collection)
    }

    async fn update(&self, id: &str, lineage: &Lineage) -> Result<()> {
        lineage
            .validate()
            .map_err(|e| StoreError::Validation(e.to_string()))?;
        let dir = self.collection_dir(id)?;
        let metadata = self.read_metadata(id, &dir).await?;

        self.write_collection(&dir, metadata, lineage).await?;
        info!("[store] Updated collection {} ({} artworks)", id, lineage.len());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let dir = self.collection_dir(id)?;
        match fs::remove_dir_all(&dir).await {
            Ok(()) => {
                info!("[store] Deleted collection {}", id);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(id.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}
