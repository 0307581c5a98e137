use std::collections::HashMap;
use std::sync::Arc;

use art_core::{Config, Lineage};
use art_engine::{ArtworkCreator, ModificationEngine};
use art_llm::{create_services, Services};
use art_store::{CollectionStore, FileCollectionStore};
use tokio::sync::RwLock;

use crate::error::{AppError, Result};

/// Shared server state: the engine, the store and the working lineages.
///
/// The session lock is only held to look up or commit a lineage, never
/// across service calls.
pub struct AppState {
    pub engine: ModificationEngine,
    pub creator: ArtworkCreator,
    pub store: Arc<dyn CollectionStore>,
    pub sessions: Arc<RwLock<HashMap<String, Lineage>>>,
}

impl AppState {
    pub fn new(services: Services, store: Arc<dyn CollectionStore>, fallback_image: &str) -> Self {
        let engine = ModificationEngine::new(services).with_fallback_image(fallback_image);
        Self {
            creator: ArtworkCreator::new(engine.clone()),
            engine,
            store,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let services = create_services(config)?;
        let collections_dir = config.collections_dir();
        log::info!("Collections stored at: {:?}", collections_dir);
        let store = Arc::new(FileCollectionStore::new(collections_dir));
        Ok(Self::new(services, store, &config.fallback_image))
    }

    /// Register a lineage under a fresh session id.
    pub async fn open_session(&self, lineage: Lineage) -> String {
        let session_id = uuid::Uuid::new_v4().to_string();
        self.sessions
            .write()
            .await
            .insert(session_id.clone(), lineage);
        session_id
    }

    /// Snapshot of a session's lineage.
    pub async fn session(&self, session_id: &str) -> Result<Lineage> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| AppError::SessionNotFound(session_id.to_string()))
    }

    /// Store `updated` if nobody else committed on top of `base` meanwhile.
    pub async fn commit(&self, session_id: &str, base: &Lineage, updated: Lineage) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        let current = sessions
            .get_mut(session_id)
            .ok_or_else(|| AppError::SessionNotFound(session_id.to_string()))?;
        if current.latest().index != base.latest().index {
            return Err(AppError::Conflict(session_id.to_string()));
        }
        *current = updated;
        Ok(())
    }
}
