//! Simulated pro-trader activity.
//!
//! A background task that periodically has a random catalog trader "open" a
//! trade. When the user copies that trader, the trade is logged into the
//! journal at the current market price with generated stop and target
//! levels.

use crate::config::CopyTradingConfig;
use crate::services::price_feed::PriceFeed;
use crate::services::store::JournalStore;
use crate::types::{
    default_pro_traders, AlertKind, AlertRecord, NewTradeRequest, ProTrader, TakeProfitLevel,
    TradeDirection,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Catalog of followable traders plus the simulation task.
pub struct ProTraderFeed {
    traders: Vec<ProTrader>,
}

impl ProTraderFeed {
    pub fn new() -> Self {
        Self {
            traders: default_pro_traders(),
        }
    }

    /// The followable trader catalog.
    pub fn traders(&self) -> &[ProTrader] {
        &self.traders
    }

    pub fn get(&self, id: &str) -> Option<&ProTrader> {
        self.traders.iter().find(|t| t.id == id)
    }

    /// Start the copy-trading simulation. Every interval a random trader
    /// trades one of their preferred setups; copied traders' trades land in
    /// the journal.
    pub fn spawn(
        self: &Arc<Self>,
        store: Arc<JournalStore>,
        feed: Arc<PriceFeed>,
        config: CopyTradingConfig,
    ) -> tokio::task::JoinHandle<()> {
        let traders = Arc::clone(self);
        info!("Starting copy-trading feed");
        tokio::spawn(async move {
            let mut rng = StdRng::from_entropy();
            loop {
                tokio::time::sleep(Duration::from_millis(config.interval_ms)).await;

                let trader = &traders.traders[rng.gen_range(0..traders.traders.len())];
                if !store.is_copying(&trader.id) {
                    debug!("{} traded, not copied", trader.name);
                    continue;
                }

                let template = &trader.trade_templates[rng.gen_range(0..trader.trade_templates.len())];
                let request = build_copied_trade(template.asset.clone(), template.direction,
                    template.quantity, feed.initial_price(&template.asset).unwrap_or(100.0), &mut rng);

                match store.add_trade(request) {
                    Ok(trade) => {
                        store.record_alert(AlertRecord::new(
                            &trade.id,
                            &trade.asset,
                            format!(
                                "Copied {}'s new {} trade.",
                                trader.name, trade.direction
                            ),
                            AlertKind::Info,
                        ));
                    }
                    Err(e) => warn!("Failed to log copied trade: {}", e),
                }
            }
        })
    }
}

impl Default for ProTraderFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a copied trade around the current price: stop 1-3% away, target
/// 1.5-2.5x the stop distance.
fn build_copied_trade(
    asset: String,
    direction: TradeDirection,
    quantity: f64,
    price: f64,
    rng: &mut impl Rng,
) -> NewTradeRequest {
    let sl_distance = price * (0.01 + rng.gen::<f64>() * 0.02);
    let tp_distance = sl_distance * (1.5 + rng.gen::<f64>());
    let (stop_loss, tp_price) = match direction {
        TradeDirection::Long => (price - sl_distance, price + tp_distance),
        TradeDirection::Short => (price + sl_distance, price - tp_distance),
    };

    let round4 = |v: f64| (v * 10_000.0).round() / 10_000.0;
    NewTradeRequest {
        asset,
        direction,
        entry_price: round4(price),
        quantity,
        stop_loss: round4(stop_loss),
        take_profits: vec![TakeProfitLevel {
            level: 1,
            price: round4(tp_price),
        }],
        risk_percentage: Some((sl_distance / price * 10_000.0).round() / 100.0),
        price_alert: None,
    }
}
