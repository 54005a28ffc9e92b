//! Alert Types
//!
//! Notification records created in reaction to monitor triggers, and
//! symbol-scoped global price alerts.

use serde::{Deserialize, Serialize};

use super::trade::AlertCondition;

/// Trade id used on alerts that are not tied to any trade.
pub const GLOBAL_TRADE_ID: &str = "system-global";

/// Alert type categories, matching toast styling downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Success,
    Error,
    Info,
}

/// An immutable notification log entry. Only `read` and the lazily filled
/// `aiCommentary` ever change after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRecord {
    /// Unique alert ID
    pub id: String,
    /// Owning trade id, or [`GLOBAL_TRADE_ID`]
    pub trade_id: String,
    /// Asset symbol the alert refers to
    pub asset: String,
    pub message: String,
    /// Timestamp in milliseconds
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    /// AI commentary, filled lazily on request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_commentary: Option<String>,
    pub read: bool,
}

impl AlertRecord {
    /// Create an unread alert for a trade.
    pub fn new(
        trade_id: impl Into<String>,
        asset: impl Into<String>,
        message: String,
        kind: AlertKind,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            trade_id: trade_id.into(),
            asset: asset.into(),
            message,
            timestamp: chrono::Utc::now().timestamp_millis(),
            kind,
            ai_commentary: None,
            read: false,
        }
    }

    /// Create an unread alert not tied to any trade.
    pub fn global(asset: impl Into<String>, message: String, kind: AlertKind) -> Self {
        Self::new(GLOBAL_TRADE_ID, asset, message, kind)
    }
}

/// A symbol-scoped price alert with its own lifecycle: created/edited/deleted
/// by the user, deleted automatically once triggered (never re-armed).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalPriceAlert {
    pub id: String,
    pub asset: String,
    pub price: f64,
    pub condition: AlertCondition,
    /// Timestamp in milliseconds
    pub created_at: i64,
}

impl GlobalPriceAlert {
    pub fn new(asset: String, price: f64, condition: AlertCondition) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            asset,
            price,
            condition,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Request to create or edit a global price alert. An `id` matching an
/// existing alert edits it in place, preserving `createdAt`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetGlobalAlertRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub asset: String,
    pub price: f64,
    pub condition: AlertCondition,
}

/// Request to mark specific alerts as read. If `ids` is omitted, marks all.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadRequest {
    #[serde(default)]
    pub ids: Option<Vec<String>>,
}
