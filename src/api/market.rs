use crate::error::Result;
use crate::types::MarketData;
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::collections::HashMap;

/// GET /api/market
async fn get_market(State(state): State<AppState>) -> Result<Json<Vec<MarketData>>> {
    Ok(Json(state.feed.market_snapshot()))
}

#[derive(Debug, Serialize)]
pub struct PricesResponse {
    pub prices: HashMap<String, f64>,
    pub timestamp: i64,
}

/// GET /api/market/prices
async fn get_prices(State(state): State<AppState>) -> Result<Json<PricesResponse>> {
    Ok(Json(PricesResponse {
        prices: state.feed.price_snapshot().into_iter().collect(),
        timestamp: chrono::Utc::now().timestamp_millis(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_market))
        .route("/prices", get(get_prices))
}
