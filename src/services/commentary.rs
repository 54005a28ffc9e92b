//! Canned AI-style trade commentary.
//!
//! Produces a short retrospective for a closed trade from a template pool.
//! Filled lazily onto an alert record the first time it is requested.

use crate::types::{Trade, TradeStatus};
use rand::seq::SliceRandom;

const WIN_TEMPLATES: &[&str] = &[
    "Textbook execution on this {direction} {asset} position. The take-profit level was well placed and the market cooperated. Risking {risk}% kept the position sized sensibly.",
    "Solid outcome on {asset}. Letting the {direction} run to the target instead of closing early paid off here. Consider scaling out on similar setups to lock in partial gains.",
    "This {direction} on {asset} worked out cleanly. Entry timing was good and the {risk}% risk budget left room to hold through the noise.",
];

const LOSS_TEMPLATES: &[&str] = &[
    "The stop did its job on this {direction} {asset} trade. A {risk}% loss is survivable; review whether the entry had confirmation or was anticipating a move.",
    "{asset} went against the {direction} thesis and the stop-loss capped the damage. Losses like this are the cost of keeping risk at {risk}% per trade.",
    "Unlucky outcome on {asset}. The {direction} setup may still have been valid, but the market disagreed this time. Honoring the stop is what matters.",
];

/// Generates commentary text for closed trades.
pub struct CommentaryService;

impl CommentaryService {
    pub fn new() -> Self {
        Self
    }

    /// A 2-3 sentence retrospective for a closed trade, or a placeholder for
    /// trades that have not closed.
    pub fn commentary_for(&self, trade: &Trade) -> String {
        let templates = match trade.status {
            TradeStatus::ClosedTp => WIN_TEMPLATES,
            TradeStatus::ClosedSl => LOSS_TEMPLATES,
            TradeStatus::Active => {
                return "Commentary is only available for closed trades.".to_string()
            }
        };
        let prefix = match trade.status {
            TradeStatus::ClosedTp => "✅ ",
            _ => "❌ ",
        };

        let mut rng = rand::thread_rng();
        let template = templates.choose(&mut rng).unwrap_or(&templates[0]);
        let body = template
            .replace("{asset}", &trade.asset)
            .replace("{direction}", &trade.direction.to_string())
            .replace("{risk}", &format!("{}", trade.risk_percentage));
        format!("{}{}", prefix, body)
    }
}

impl Default for CommentaryService {
    fn default() -> Self {
        Self::new()
    }
}
