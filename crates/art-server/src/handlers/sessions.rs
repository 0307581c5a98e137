use actix_web::{web, HttpResponse};
use art_core::{Iteration, Lineage, ModificationStrategy, StrategyChoice, TimelineEntry};
use art_engine::Selection;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub concept: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ModificationRequest {
    /// Strategy tag, `auto` or absent for automatic selection
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub feedback: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveCollectionRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A working lineage as returned to clients.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: String,
    pub art_history: Lineage,
    pub timeline: Vec<TimelineEntry>,
}

impl SessionView {
    pub fn new(session_id: String, lineage: Lineage) -> Self {
        Self {
            session_id,
            timeline: lineage.timeline(),
            art_history: lineage,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SelectionView {
    pub strategy: ModificationStrategy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

impl From<Selection> for SelectionView {
    fn from(selection: Selection) -> Self {
        Self {
            strategy: selection.strategy,
            fallback_reason: selection.fallback.map(|reason| reason.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ModificationResponse {
    pub session_id: String,
    pub iteration: Iteration,
    pub rendered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<SelectionView>,
    pub artwork_count: usize,
}

pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreateSessionRequest>,
) -> Result<HttpResponse> {
    let lineage = state.creator.create(&body.concept).await?;
    let session_id = state.open_session(lineage.clone()).await;
    log::info!("[{}] Session created", session_id);

    Ok(HttpResponse::Created().json(SessionView::new(session_id, lineage)))
}

pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
    let session_id = path.into_inner();
    let lineage = state.session(&session_id).await?;
    Ok(HttpResponse::Ok().json(SessionView::new(session_id, lineage)))
}

pub async fn modify(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: Option<web::Json<ModificationRequest>>,
) -> Result<HttpResponse> {
    let session_id = path.into_inner();
    let request = body.map(web::Json::into_inner).unwrap_or_default();

    let choice = match request.strategy.as_deref() {
        None => StrategyChoice::Auto,
        Some(tag) => tag
            .parse::<StrategyChoice>()
            .map_err(art_engine::EngineError::from)?,
    };

    let base = state.session(&session_id).await?;
    let outcome = state
        .engine
        .apply_modification(&base, choice, &request.feedback)
        .await?;
    let artwork_count = outcome.lineage.len();
    state.commit(&session_id, &base, outcome.lineage).await?;

    log::info!(
        "[{}] Iteration {} committed with {}",
        session_id,
        outcome.iteration.index,
        outcome
            .iteration
            .strategy_label
            .map(|s| s.as_str())
            .unwrap_or("initial_creation")
    );

    Ok(HttpResponse::Ok().json(ModificationResponse {
        session_id,
        iteration: outcome.iteration,
        rendered: outcome.rendered,
        selection: outcome.selection.map(SelectionView::from),
        artwork_count,
    }))
}

pub async fn save_collection(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<SaveCollectionRequest>,
) -> Result<HttpResponse> {
    let session_id = path.into_inner();
    let lineage = state.session(&session_id).await?;
    if body.name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Collection name must not be empty".to_string(),
        ));
    }

    let collection_id = state
        .store
        .save(&body.name, &body.description, &lineage)
        .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "collection_id": collection_id,
        "artwork_count": lineage.len(),
    })))
}
