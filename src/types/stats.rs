//! Aggregate performance statistics.

use serde::{Deserialize, Serialize};

/// Aggregate performance across the full trade collection, including
/// unrealized P/L on active trades at current prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeStats {
    pub total_trades: usize,
    /// Win rate over closed trades, percentage
    pub win_rate: f64,
    #[serde(rename = "totalPL")]
    pub total_pl: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    /// Gross profit / gross loss; 0 when gross loss is 0
    pub profit_factor: f64,
}

impl Default for TradeStats {
    fn default() -> Self {
        Self {
            total_trades: 0,
            win_rate: 0.0,
            total_pl: 0.0,
            avg_win: 0.0,
            avg_loss: 0.0,
            profit_factor: 0.0,
        }
    }
}

/// Per-asset performance breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetPerformance {
    pub symbol: String,
    pub total_trades: usize,
    /// Win rate over closed trades for this asset, percentage
    pub win_rate: f64,
    #[serde(rename = "totalPL")]
    pub total_pl: f64,
    #[serde(rename = "realizedPL")]
    pub realized_pl: f64,
    #[serde(rename = "unrealizedPL")]
    pub unrealized_pl: f64,
    /// Average P/L per trade on this asset
    #[serde(rename = "avgPL")]
    pub avg_pl: f64,
}
