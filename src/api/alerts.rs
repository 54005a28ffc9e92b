use crate::error::Result;
use crate::types::{AlertRecord, MarkReadRequest};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

/// GET /api/alerts
async fn list_alerts(State(state): State<AppState>) -> Result<Json<Vec<AlertRecord>>> {
    Ok(Json(state.store.alerts()))
}

#[derive(Debug, Serialize)]
pub struct MarkReadResponse {
    pub marked: usize,
}

/// POST /api/alerts/read
async fn mark_read(
    State(state): State<AppState>,
    Json(request): Json<MarkReadRequest>,
) -> Result<Json<MarkReadResponse>> {
    let marked = state.store.mark_alerts_read(request);
    Ok(Json(MarkReadResponse { marked }))
}

/// POST /api/alerts/:id/commentary
async fn fill_commentary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AlertRecord>> {
    let alert = state.store.fill_commentary(&id, &state.commentary)?;
    Ok(Json(alert))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_alerts))
        .route("/read", post(mark_read))
        .route("/:id/commentary", post(fill_commentary))
}
