use crate::error::Result;
use crate::types::ProTrader;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

/// One trader row plus whether the user currently copies them.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraderResponse {
    #[serde(flatten)]
    pub trader: ProTrader,
    pub copied: bool,
}

/// GET /api/traders
async fn list_traders(State(state): State<AppState>) -> Result<Json<Vec<TraderResponse>>> {
    let rows = state
        .traders
        .traders()
        .iter()
        .map(|t| TraderResponse {
            trader: t.clone(),
            copied: state.store.is_copying(&t.id),
        })
        .collect();
    Ok(Json(rows))
}

#[derive(Debug, Serialize)]
pub struct CopyResponse {
    pub copied: bool,
}

/// POST /api/traders/:id/copy
async fn toggle_copy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CopyResponse>> {
    if state.traders.get(&id).is_none() {
        return Err(crate::error::AppError::NotFound(format!(
            "Trader {} not found",
            id
        )));
    }
    Ok(Json(CopyResponse {
        copied: state.store.toggle_copied(&id),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_traders))
        .route("/:id/copy", post(toggle_copy))
}
