use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tradelog::config::Config;
use tradelog::services::{CommentaryService, JournalStore, LocalStore, PriceFeed, ProTraderFeed};
use tradelog::types::default_market_data;
use tradelog::{api, websocket, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tradelog=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());
    info!("Starting Tradelog server on {}:{}", config.host, config.port);

    // Market feed, seeded with the default catalog
    let feed = PriceFeed::new(default_market_data());

    // Journal store over file-backed persistence; arms the trade monitor
    // with whatever survived the restart
    let storage = Arc::new(LocalStore::new(&config.data_dir));
    let store = JournalStore::open(storage, feed.clone());

    // Background simulations
    if config.feed.simulate {
        let _ = feed.spawn_simulation(config.feed.clone());
    }
    let traders = Arc::new(ProTraderFeed::new());
    if config.copy_trading.enabled {
        let _ = traders.spawn(store.clone(), feed.clone(), config.copy_trading.clone());
    }

    let state = AppState {
        config: config.clone(),
        store,
        feed,
        traders,
        commentary: Arc::new(CommentaryService::new()),
    };

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = Router::new()
        .merge(api::router())
        .route("/ws", get(websocket::ws_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Tradelog server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
