//! Tradelog: a trading journal server with a simulated live market.
//!
//! Trades are logged against a simulated price feed; an always-on monitor
//! closes them when their stop or a take-profit level is crossed and raises
//! price alerts. State is served over a JSON HTTP API and pushed over
//! WebSocket.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod types;
pub mod websocket;

use std::sync::Arc;

use config::Config;
use services::{CommentaryService, JournalStore, PriceFeed, ProTraderFeed};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<JournalStore>,
    pub feed: Arc<PriceFeed>,
    pub traders: Arc<ProTraderFeed>,
    pub commentary: Arc<CommentaryService>,
}
