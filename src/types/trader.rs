//! Simulated pro-trader catalog types for the copy-trading feed.

use serde::{Deserialize, Serialize};

use super::trade::TradeDirection;

/// Coarse risk bucket shown on trader cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskScore {
    Low,
    Medium,
    High,
}

/// Headline stats for a simulated pro trader.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProTraderStats {
    #[serde(rename = "monthlyPL")]
    pub monthly_pl: f64,
    pub win_rate: f64,
    pub followers: u64,
    pub risk_score: RiskScore,
}

/// Skeleton of a trade a pro trader might execute; entry, stop, and target
/// are derived from the live price at emission time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeTemplate {
    pub asset: String,
    pub direction: TradeDirection,
    pub quantity: f64,
}

/// A simulated pro trader available for copy trading.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProTrader {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub bio: String,
    pub stats: ProTraderStats,
    pub trade_templates: Vec<TradeTemplate>,
}

/// Seed catalog of simulated pro traders.
pub fn default_pro_traders() -> Vec<ProTrader> {
    vec![
        ProTrader {
            id: "pro-1".to_string(),
            name: "CryptoWizard".to_string(),
            avatar: "https://api.dicebear.com/8.x/bottts/svg?seed=wizard".to_string(),
            bio: "Scalping major pairs with a focus on BTC and ETH volatility.".to_string(),
            stats: ProTraderStats {
                monthly_pl: 12.5,
                win_rate: 68.2,
                followers: 1250,
                risk_score: RiskScore::Medium,
            },
            trade_templates: vec![
                TradeTemplate {
                    asset: "BTC/USD".to_string(),
                    direction: TradeDirection::Long,
                    quantity: 0.05,
                },
                TradeTemplate {
                    asset: "ETH/USD".to_string(),
                    direction: TradeDirection::Short,
                    quantity: 1.5,
                },
            ],
        },
        ProTrader {
            id: "pro-2".to_string(),
            name: "MomentumMax".to_string(),
            avatar: "https://api.dicebear.com/8.x/bottts/svg?seed=momentum".to_string(),
            bio: "Swing trading high-growth tech stocks like NVDA and TSLA.".to_string(),
            stats: ProTraderStats {
                monthly_pl: 21.8,
                win_rate: 55.4,
                followers: 840,
                risk_score: RiskScore::High,
            },
            trade_templates: vec![
                TradeTemplate {
                    asset: "NVDA".to_string(),
                    direction: TradeDirection::Long,
                    quantity: 50.0,
                },
                TradeTemplate {
                    asset: "TSLA".to_string(),
                    direction: TradeDirection::Short,
                    quantity: 30.0,
                },
            ],
        },
        ProTrader {
            id: "pro-3".to_string(),
            name: "SteadyGains".to_string(),
            avatar: "https://api.dicebear.com/8.x/bottts/svg?seed=steady".to_string(),
            bio: "Low-risk, long-term positions on established market leaders.".to_string(),
            stats: ProTraderStats {
                monthly_pl: 4.2,
                win_rate: 81.0,
                followers: 2300,
                risk_score: RiskScore::Low,
            },
            trade_templates: vec![
                TradeTemplate {
                    asset: "AAPL".to_string(),
                    direction: TradeDirection::Long,
                    quantity: 100.0,
                },
                TradeTemplate {
                    asset: "GOOGL".to_string(),
                    direction: TradeDirection::Long,
                    quantity: 80.0,
                },
            ],
        },
    ]
}
