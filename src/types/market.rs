//! Market Types
//!
//! Simulated market rows and the price update messages the feed pushes.

use serde::{Deserialize, Serialize};

/// A simulated market row for one asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketData {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    /// Absolute change vs 24h ago
    pub change: f64,
    pub change_percent: f64,
    /// Display volume, e.g. "1.2B"
    pub volume: String,
    #[serde(rename = "high24h")]
    pub high_24h: f64,
    #[serde(rename = "low24h")]
    pub low_24h: f64,
}

/// A single price tick for a subscribed symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceUpdate {
    pub symbol: String,
    pub price: f64,
    /// Timestamp in milliseconds
    pub timestamp: i64,
}

/// Seed catalog for the simulated market.
pub fn default_market_data() -> Vec<MarketData> {
    let rows = [
        ("BTC/USD", "Bitcoin", 68543.21, 1234.56, 1.83, "1.2B", 69123.45, 67345.67),
        ("ETH/USD", "Ethereum", 3789.45, -56.78, -1.48, "800M", 3850.12, 3750.89),
        ("SOL/USD", "Solana", 165.78, 5.12, 3.18, "300M", 170.00, 160.45),
        ("DOGE/USD", "Dogecoin", 0.158, 0.005, 3.26, "150M", 0.162, 0.151),
        ("AAPL", "Apple Inc.", 195.67, 1.23, 0.63, "45M", 196.50, 194.20),
        ("TSLA", "Tesla Inc.", 180.34, -2.45, -1.34, "90M", 184.00, 179.50),
        ("NVDA", "NVIDIA Corp.", 120.89, 3.45, 2.94, "150M", 122.00, 118.50),
        ("GOOGL", "Alphabet Inc.", 175.43, 0.89, 0.51, "30M", 176.00, 174.10),
    ];

    rows.iter()
        .map(
            |&(symbol, name, price, change, change_percent, volume, high, low)| MarketData {
                symbol: symbol.to_string(),
                name: name.to_string(),
                price,
                change,
                change_percent,
                volume: volume.to_string(),
                high_24h: high,
                low_24h: low,
            },
        )
        .collect()
}
