pub mod alerts;
pub mod health;
pub mod market;
pub mod price_alerts;
pub mod settings;
pub mod stats;
pub mod traders;
pub mod trades;

use crate::AppState;
use axum::Router;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/api/market", market::router())
        .nest("/api/trades", trades::router())
        .nest("/api/alerts", alerts::router())
        .nest("/api/price-alerts", price_alerts::router())
        .nest("/api/stats", stats::router())
        .nest("/api/settings", settings::router())
        .nest("/api/traders", traders::router())
}
