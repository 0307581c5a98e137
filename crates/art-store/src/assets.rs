//! Copy-on-save of image assets and reference rewriting.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use art_core::{Iteration, Lineage, LineageError};
use log::{debug, warn};
use tokio::fs;

use crate::error::{Result, StoreError};
use crate::metadata::IMAGES_DIR;

/// Remote and inline references are never copied.
pub fn is_remote_reference(reference: &str) -> bool {
    reference.contains("://") || reference.starts_with("data:")
}

/// Resolve a persisted reference against the collection root.
pub fn resolve_reference(collection_dir: &Path, reference: &str) -> String {
    if reference.is_empty() || is_remote_reference(reference) || Path::new(reference).is_absolute()
    {
        return reference.to_string();
    }
    collection_dir.join(reference).to_string_lossy().into_owned()
}

/// Return `lineage` with every relative reference resolved against `collection_dir`.
pub fn resolve_lineage(
    collection_dir: &Path,
    lineage: &Lineage,
) -> std::result::Result<Lineage, LineageError> {
    let iterations = lineage
        .iterations()
        .iter()
        .map(|it| {
            let resolved = resolve_reference(collection_dir, &it.image_reference);
            it.clone().with_image_reference(resolved)
        })
        .collect();
    Lineage::from_iterations(iterations)
}

/// Copies external images into a collection's `images/` directory.
///
/// Images that already live in that directory are referenced in place.
/// Two different sources that would land on the same file name are kept
/// apart by prefixing the later one with its iteration index.
pub struct AssetCopier {
    collection_dir: PathBuf,
    images_dir: PathBuf,
    claimed: HashMap<String, PathBuf>,
    copied: Vec<PathBuf>,
}

impl AssetCopier {
    pub async fn new(collection_dir: &Path) -> Result<Self> {
        let images_dir = collection_dir.join(IMAGES_DIR);
        fs::create_dir_all(&images_dir).await?;
        Ok(Self {
            collection_dir: collection_dir.to_path_buf(),
            images_dir,
            claimed: HashMap::new(),
            copied: Vec::new(),
        })
    }

    /// Rewrite a working lineage into its persisted form.
    pub async fn persist(&mut self, lineage: &Lineage) -> Result<Lineage> {
        let mut iterations = Vec::with_capacity(lineage.len());
        for it in lineage.iterations() {
            let reference = self.persist_reference(it).await?;
            iterations.push(it.clone().with_image_reference(reference));
        }
        Lineage::from_iterations(iterations).map_err(|e| StoreError::Validation(e.to_string()))
    }

    async fn persist_reference(&mut self, it: &Iteration) -> Result<String> {
        let reference = it.image_reference.as_str();
        if reference.is_empty() || is_remote_reference(reference) {
            if !reference.is_empty() {
                warn!("[store] Keeping remote image reference for iteration {}", it.index);
            }
            return Ok(reference.to_string());
        }

        if let Some(local) = self.collection_local(reference).await {
            self.claimed.insert(local.clone(), self.images_dir.join(&local));
            return Ok(format!("{IMAGES_DIR}/{local}"));
        }

        let source = PathBuf::from(reference);
        if !fs::metadata(&source).await.map(|m| m.is_file()).unwrap_or(false) {
            warn!(
                "[store] Image {} for iteration {} is not a local file, keeping reference",
                reference, it.index
            );
            return Ok(external_reference(&source, reference));
        }

        let source = fs::canonicalize(&source).await.unwrap_or(source);
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                StoreError::Validation(format!("Image path {reference} has no file name"))
            })?;

        let target_name = self.claim_name(&file_name, it.index, &source).await;
        let target = self.images_dir.join(&target_name);
        if !fs::try_exists(&target).await.unwrap_or(false) {
            fs::copy(&source, &target).await?;
            debug!("[store] Copied {:?} to {:?}", source, target);
            self.copied.push(target);
        }
        Ok(format!("{IMAGES_DIR}/{target_name}"))
    }

    /// Remove the files this copier wrote.
    pub async fn discard_copies(&mut self) {
        for path in self.copied.drain(..) {
            if let Err(e) = fs::remove_file(&path).await {
                warn!("[store] Failed to remove copied image {:?}: {}", path, e);
            }
        }
    }

    /// Delete files in `images/` that `persisted` no longer references.
    pub async fn prune_unreferenced(&self, persisted: &Lineage) -> Result<usize> {
        let prefix = format!("{IMAGES_DIR}/");
        let referenced: HashSet<&str> = persisted
            .iterations()
            .iter()
            .filter_map(|it| it.image_reference.strip_prefix(prefix.as_str()))
            .collect();

        let mut removed = 0;
        let mut entries = fs::read_dir(&self.images_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if referenced.contains(name.as_str()) {
                continue;
            }
            fs::remove_file(entry.path()).await?;
            debug!("[store] Pruned unreferenced image {}", name);
            removed += 1;
        }
        Ok(removed)
    }

    /// File name inside `images/` when `reference` already points there.
    async fn collection_local(&self, reference: &str) -> Option<String> {
        let path = Path::new(reference);
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.collection_dir.join(path)
        };
        if !absolute.starts_with(&self.images_dir) {
            return None;
        }
        if !fs::try_exists(&absolute).await.unwrap_or(false) {
            return None;
        }
        absolute
            .strip_prefix(&self.images_dir)
            .ok()
            .map(|rel| rel.to_string_lossy().into_owned())
    }

    async fn claim_name(&mut self, file_name: &str, index: u32, source: &Path) -> String {
        let mut attempt = 0u32;
        loop {
            let candidate = match attempt {
                0 => file_name.to_string(),
                1 => format!("{index}_{file_name}"),
                n => format!("{index}_{n}_{file_name}"),
            };
            match self.claimed.get(&candidate) {
                Some(owner) if owner == source => return candidate,
                Some(_) => {}
                None => {
                    let existing = self.images_dir.join(&candidate);
                    let free = match fs::try_exists(&existing).await {
                        Ok(false) => true,
                        Ok(true) => same_contents(source, &existing).await,
                        Err(_) => false,
                    };
                    if free {
                        self.claimed.insert(candidate.clone(), source.to_path_buf());
                        return candidate;
                    }
                }
            }
            attempt += 1;
        }
    }
}

/// Relative references are pinned to the working directory so a later
/// load does not re-root them into the collection.
fn external_reference(source: &Path, reference: &str) -> String {
    if source.is_absolute() {
        return reference.to_string();
    }
    std::path::absolute(source)
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|_| reference.to_string())
}

/// An earlier copy of the same image can be reused instead of duplicated.
async fn same_contents(a: &Path, b: &Path) -> bool {
    match (fs::read(a).await, fs::read(b).await) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
