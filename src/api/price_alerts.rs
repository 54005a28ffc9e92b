use crate::error::Result;
use crate::types::{GlobalPriceAlert, SetGlobalAlertRequest};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

/// GET /api/price-alerts
async fn list_alerts(State(state): State<AppState>) -> Result<Json<Vec<GlobalPriceAlert>>> {
    Ok(Json(state.store.global_alerts()))
}

/// POST /api/price-alerts
async fn set_alert(
    State(state): State<AppState>,
    Json(request): Json<SetGlobalAlertRequest>,
) -> Result<Json<GlobalPriceAlert>> {
    Ok(Json(state.store.set_global_alert(request)))
}

/// DELETE /api/price-alerts/:id
async fn delete_alert(State(state): State<AppState>, Path(id): Path<String>) -> Result<()> {
    state.store.delete_global_alert(&id)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_alerts).post(set_alert))
        .route("/:id", axum::routing::delete(delete_alert))
}
