use crate::error::Result;
use crate::types::{AssetPerformance, TradeStats};
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};

/// GET /api/stats
async fn get_stats(State(state): State<AppState>) -> Result<Json<TradeStats>> {
    Ok(Json(state.store.stats()))
}

/// GET /api/stats/assets
async fn get_asset_performance(
    State(state): State<AppState>,
) -> Result<Json<Vec<AssetPerformance>>> {
    Ok(Json(state.store.asset_performance()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_stats))
        .route("/assets", get(get_asset_performance))
}
