use actix_web::{web, HttpResponse};
use art_core::CollectionSummary;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::handlers::sessions::SessionView;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CollectionListResponse {
    pub collections: Vec<CollectionSummary>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCollectionRequest {
    pub session_id: String,
}

pub async fn list(state: web::Data<AppState>) -> Result<HttpResponse> {
    let collections = state.store.list().await?;
    Ok(HttpResponse::Ok().json(CollectionListResponse { collections }))
}

pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
    let collection = state.store.load(&path).await?;
    Ok(HttpResponse::Ok().json(collection))
}

/// Replace the collection's lineage with a session's working lineage.
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateCollectionRequest>,
) -> Result<HttpResponse> {
    let collection_id = path.into_inner();
    let lineage = state.session(&body.session_id).await?;

    state.store.update(&collection_id, &lineage).await?;
    log::info!(
        "[{}] Collection {} updated from session",
        body.session_id,
        collection_id
    );

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "collection_id": collection_id,
        "artwork_count": lineage.len(),
    })))
}

/// Load a collection into a new working session.
pub async fn open(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
    let collection = state.store.load(&path).await?;
    let lineage = collection.art_history;
    let session_id = state.open_session(lineage.clone()).await;
    log::info!("[{}] Opened collection {}", session_id, collection.id);

    Ok(HttpResponse::Created().json(SessionView::new(session_id, lineage)))
}

pub async fn delete(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
    let collection_id = path.into_inner();
    state.store.delete(&collection_id).await?;
    log::info!("Collection {} deleted", collection_id);
    Ok(HttpResponse::Ok().finish())
}
