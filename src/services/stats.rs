//! Aggregate trade statistics.
//!
//! Pure functions over a trade slice plus a current-price map. Closed trades
//! drive the win/loss aggregates; active trades contribute unrealized P/L at
//! their symbol's current price.

use crate::types::{AssetPerformance, Trade, TradeStats};
use std::collections::HashMap;

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// P/L of a trade: realized at close price for closed trades, marked to the
/// current price (entry price when unknown) for active ones.
fn trade_pnl(trade: &Trade, prices: &HashMap<String, f64>) -> f64 {
    match trade.realized_pnl() {
        Some(pnl) => pnl,
        None => {
            let price = prices.get(&trade.asset).copied().unwrap_or(trade.entry_price);
            trade.pnl_at(price)
        }
    }
}

/// Headline statistics across all trades.
pub fn compute_stats(trades: &[Trade], prices: &HashMap<String, f64>) -> TradeStats {
    if trades.is_empty() {
        return TradeStats::default();
    }

    let closed: Vec<&Trade> = trades.iter().filter(|t| t.status.is_closed()).collect();
    let total_pl: f64 = trades.iter().map(|t| trade_pnl(t, prices)).sum();

    let mut wins = 0usize;
    let mut gross_profit = 0.0;
    let mut gross_loss = 0.0;
    for trade in &closed {
        let pnl = trade.realized_pnl().unwrap_or(0.0);
        if pnl > 0.0 {
            wins += 1;
            gross_profit += pnl;
        } else {
            gross_loss += pnl.abs();
        }
    }

    let losses = closed.len() - wins;
    let win_rate = if closed.is_empty() {
        0.0
    } else {
        wins as f64 / closed.len() as f64 * 100.0
    };
    let avg_win = if wins > 0 { gross_profit / wins as f64 } else { 0.0 };
    let avg_loss = if losses > 0 { gross_loss / losses as f64 } else { 0.0 };
    // No losing trades means no meaningful ratio; reported as zero.
    let profit_factor = if gross_loss > 0.0 { gross_profit / gross_loss } else { 0.0 };

    TradeStats {
        total_trades: trades.len(),
        win_rate: round2(win_rate),
        total_pl: round2(total_pl),
        avg_win: round2(avg_win),
        avg_loss: round2(avg_loss),
        profit_factor: round2(profit_factor),
    }
}

/// Per-symbol breakdown, sorted by total P/L descending.
pub fn asset_performance(trades: &[Trade], prices: &HashMap<String, f64>) -> Vec<AssetPerformance> {
    let mut by_asset: HashMap<String, Vec<&Trade>> = HashMap::new();
    for trade in trades {
        by_asset.entry(trade.asset.clone()).or_default().push(trade);
    }

    let mut rows: Vec<AssetPerformance> = by_asset
        .into_iter()
        .map(|(symbol, group)| {
            let realized: f64 = group.iter().filter_map(|t| t.realized_pnl()).sum();
            let unrealized: f64 = group
                .iter()
                .filter(|t| t.is_active())
                .map(|t| trade_pnl(t, prices))
                .sum();
            let closed: Vec<&&Trade> = group.iter().filter(|t| t.status.is_closed()).collect();
            let wins = closed
                .iter()
                .filter(|t| t.realized_pnl().unwrap_or(0.0) > 0.0)
                .count();
            let win_rate = if closed.is_empty() {
                0.0
            } else {
                wins as f64 / closed.len() as f64 * 100.0
            };
            let total = realized + unrealized;

            AssetPerformance {
                symbol,
                total_trades: group.len(),
                win_rate: round2(win_rate),
                total_pl: round2(total),
                realized_pl: round2(realized),
                unrealized_pl: round2(unrealized),
                avg_pl: round2(total / group.len() as f64),
            }
        })
        .collect();

    rows.sort_by(|a, b| b.total_pl.total_cmp(&a.total_pl));
    rows
}
