use crate::error::Result;
use crate::types::{
    CloseTradeRequest, JournalNoteRequest, NewTradeRequest, PriceAlertRequest, Trade,
    UpdateTradeRequest,
};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

/// GET /api/trades
async fn list_trades(State(state): State<AppState>) -> Result<Json<Vec<Trade>>> {
    Ok(Json(state.store.trades()))
}

/// POST /api/trades
async fn create_trade(
    State(state): State<AppState>,
    Json(request): Json<NewTradeRequest>,
) -> Result<Json<Trade>> {
    let trade = state.store.add_trade(request)?;
    Ok(Json(trade))
}

#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BulkDeleteResponse {
    pub deleted: usize,
}

/// DELETE /api/trades
async fn delete_trades(
    State(state): State<AppState>,
    Json(request): Json<BulkDeleteRequest>,
) -> Result<Json<BulkDeleteResponse>> {
    let deleted = state.store.delete_trades(&request.ids);
    Ok(Json(BulkDeleteResponse { deleted }))
}

/// GET /api/trades/:id
async fn get_trade(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Trade>> {
    let trade = state
        .store
        .get_trade(&id)
        .ok_or_else(|| crate::error::AppError::NotFound(format!("Trade {} not found", id)))?;
    Ok(Json(trade))
}

/// PUT /api/trades/:id
async fn update_trade(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateTradeRequest>,
) -> Result<Json<Trade>> {
    let trade = state.store.update_trade(&id, request)?;
    Ok(Json(trade))
}

/// DELETE /api/trades/:id
async fn delete_trade(State(state): State<AppState>, Path(id): Path<String>) -> Result<()> {
    state.store.delete_trade(&id)
}

/// POST /api/trades/:id/close
async fn close_trade(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<CloseTradeRequest>,
) -> Result<Json<Trade>> {
    let trade = state.store.close_trade(&id, request.price)?;
    Ok(Json(trade))
}

/// POST /api/trades/:id/journal
async fn add_journal_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<JournalNoteRequest>,
) -> Result<Json<Trade>> {
    let trade = state.store.add_journal_note(&id, request.note)?;
    Ok(Json(trade))
}

/// PUT /api/trades/:id/price-alert
async fn set_price_alert(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<PriceAlertRequest>,
) -> Result<Json<Trade>> {
    let trade = state.store.set_price_alert(&id, request)?;
    Ok(Json(trade))
}

/// DELETE /api/trades/:id/price-alert
async fn clear_price_alert(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Trade>> {
    let trade = state.store.clear_price_alert(&id)?;
    Ok(Json(trade))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_trades).post(create_trade).delete(delete_trades))
        .route("/:id", get(get_trade).put(update_trade).delete(delete_trade))
        .route("/:id/close", post(close_trade))
        .route("/:id/journal", post(add_journal_note))
        .route(
            "/:id/price-alert",
            put(set_price_alert).delete(clear_price_alert),
        )
}
