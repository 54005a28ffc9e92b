use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::types::ServerMessage;
use crate::AppState;

/// WebSocket upgrade handler.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Send-only push stream: every feed tick plus store events (alerts created,
/// trades opened/closed). Client messages are ignored apart from close.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    let client_id = Uuid::new_v4();
    info!("WebSocket client connected: {}", client_id);

    let mut price_rx = state.feed.subscribe_updates();
    let mut event_rx = state.store.subscribe_events();

    let send_task = tokio::spawn(async move {
        loop {
            let message = tokio::select! {
                update = price_rx.recv() => match update {
                    Ok(data) => ServerMessage::PriceUpdate { data },
                    // Fell behind the feed; skip the lost ticks.
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(_) => break,
                },
                event = event_rx.recv() => match event {
                    Ok(message) => message,
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(_) => break,
                },
            };

            let json = match serde_json::to_string(&message) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize server message: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    while let Some(result) = receiver.next().await {
        match result {
            Ok(Message::Close(_)) => {
                info!("WebSocket client disconnecting: {}", client_id);
                break;
            }
            Ok(Message::Ping(_)) => {
                // Pong is handled automatically by axum
                debug!("Received ping from {}", client_id);
            }
            Ok(_) => {}
            Err(e) => {
                error!("WebSocket error for {}: {}", client_id, e);
                break;
            }
        }
    }

    send_task.abort();
    info!("WebSocket client disconnected: {}", client_id);
}
