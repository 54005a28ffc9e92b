use crate::error::Result;
use crate::types::UserSettings;
use crate::AppState;
use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

/// GET /api/settings
async fn get_settings(State(state): State<AppState>) -> Result<Json<UserSettings>> {
    Ok(Json(state.store.settings()))
}

/// PUT /api/settings
async fn put_settings(
    State(state): State<AppState>,
    Json(settings): Json<UserSettings>,
) -> Result<Json<UserSettings>> {
    Ok(Json(state.store.update_settings(settings)))
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardedState {
    pub has_onboarded: bool,
}

/// GET /api/settings/onboarded
async fn get_onboarded(State(state): State<AppState>) -> Result<Json<OnboardedState>> {
    Ok(Json(OnboardedState {
        has_onboarded: state.store.has_onboarded(),
    }))
}

/// POST /api/settings/onboarded
async fn set_onboarded(
    State(state): State<AppState>,
    Json(request): Json<OnboardedState>,
) -> Result<Json<OnboardedState>> {
    state.store.set_onboarded(request.has_onboarded);
    Ok(Json(request))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_settings).put(put_settings))
        .route("/onboarded", get(get_onboarded).post(set_onboarded))
}
