//! WebSocket message types pushed to dashboard clients.

use serde::{Deserialize, Serialize};

use super::alert::AlertRecord;
use super::market::PriceUpdate;
use super::trade::Trade;

/// Server-to-client messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A price tick from the simulated feed.
    PriceUpdate { data: PriceUpdate },
    /// A notification record was created (trigger, custom alert, etc.).
    AlertCreated { data: AlertRecord },
    /// A trade left ACTIVE (monitor trigger or manual close).
    TradeClosed { data: Trade },
    /// A trade was logged (user action or copy-trading feed).
    TradeOpened { data: Trade },
}
