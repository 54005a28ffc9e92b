//! Simulated price feed.
//!
//! Pushes price updates for subscribed symbols at an irregular cadence,
//! mimicking a real-time WebSocket stream. Per-symbol handlers receive every
//! tick for their symbol; a broadcast channel fans the same ticks out to
//! WebSocket consumers.

use crate::config::FeedConfig;
use crate::types::{MarketData, PriceUpdate};
use dashmap::DashMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info};
use uuid::Uuid;

/// Callback invoked for each tick of a subscribed symbol.
pub type PriceHandler = Arc<dyn Fn(&PriceUpdate) + Send + Sync>;

/// Opaque handle identifying one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerId(Uuid);

struct Listener {
    id: HandlerId,
    handler: PriceHandler,
}

/// Simulated market feed with per-symbol subscriptions.
pub struct PriceFeed {
    /// Current market rows keyed by symbol.
    market: DashMap<String, MarketData>,
    /// Subscribed handlers keyed by symbol.
    listeners: DashMap<String, Vec<Listener>>,
    /// Broadcast channel mirroring every published tick.
    tx: broadcast::Sender<PriceUpdate>,
}

impl PriceFeed {
    /// Create a feed seeded with the given market catalog.
    pub fn new(catalog: Vec<MarketData>) -> Arc<Self> {
        let (tx, _rx) = broadcast::channel(1024);
        let market = DashMap::new();
        for row in catalog {
            market.insert(row.symbol.clone(), row);
        }
        Arc::new(Self {
            market,
            listeners: DashMap::new(),
            tx,
        })
    }

    /// Subscribe a handler to a symbol's ticks.
    pub fn subscribe(&self, symbol: &str, handler: PriceHandler) -> HandlerId {
        let id = HandlerId(Uuid::new_v4());
        self.listeners
            .entry(symbol.to_string())
            .or_default()
            .push(Listener { id, handler });
        debug!("Subscribed handler to {}", symbol);
        id
    }

    /// Remove a subscription. Unconditional and idempotent: unknown symbols
    /// or already-removed handlers are a no-op.
    pub fn unsubscribe(&self, symbol: &str, id: HandlerId) {
        if let Some(mut entry) = self.listeners.get_mut(symbol) {
            entry.retain(|l| l.id != id);
            if entry.is_empty() {
                drop(entry);
                self.listeners.remove_if(symbol, |_, v| v.is_empty());
            }
        }
    }

    /// The last known price for a symbol.
    pub fn initial_price(&self, symbol: &str) -> Option<f64> {
        self.market.get(symbol).map(|row| row.price)
    }

    /// Snapshot of all market rows.
    pub fn market_snapshot(&self) -> Vec<MarketData> {
        let mut rows: Vec<MarketData> = self.market.iter().map(|e| e.value().clone()).collect();
        rows.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        rows
    }

    /// Snapshot of (symbol, price) pairs.
    pub fn price_snapshot(&self) -> Vec<(String, f64)> {
        self.market
            .iter()
            .map(|e| (e.key().clone(), e.value().price))
            .collect()
    }

    /// Subscribe to the broadcast mirror of all ticks.
    pub fn subscribe_updates(&self) -> broadcast::Receiver<PriceUpdate> {
        self.tx.subscribe()
    }

    /// Push a price for a symbol: update the market row, dispatch to the
    /// symbol's handlers, and mirror onto the broadcast channel.
    ///
    /// Handlers are invoked from a cloned snapshot, so a handler may
    /// subscribe or unsubscribe (including itself) without deadlocking.
    pub fn publish(&self, symbol: &str, price: f64) {
        let update = PriceUpdate {
            symbol: symbol.to_string(),
            price,
            timestamp: chrono::Utc::now().timestamp_millis(),
        };

        if let Some(mut row) = self.market.get_mut(symbol) {
            let yesterday = row.price / (1.0 + row.change_percent / 100.0);
            row.price = price;
            if yesterday.is_finite() && yesterday > 0.0 {
                row.change = price - yesterday;
                row.change_percent = (price - yesterday) / yesterday * 100.0;
            }
            row.high_24h = row.high_24h.max(price);
            row.low_24h = row.low_24h.min(price);
        }

        let handlers: Vec<PriceHandler> = self
            .listeners
            .get(symbol)
            .map(|entry| entry.iter().map(|l| l.handler.clone()).collect())
            .unwrap_or_default();

        for handler in handlers {
            handler(&update);
        }

        // Ignore errors if no receivers
        let _ = self.tx.send(update);
    }

    /// Symbols that currently have at least one handler.
    fn subscribed_symbols(&self) -> Vec<String> {
        self.listeners.iter().map(|e| e.key().clone()).collect()
    }

    /// Start the random-walk simulation task. Each iteration sleeps a random
    /// 50-500 ms (configurable), picks a random subscribed symbol, and steps
    /// its price.
    pub fn spawn_simulation(self: &Arc<Self>, config: FeedConfig) -> tokio::task::JoinHandle<()> {
        let feed = Arc::clone(self);
        info!("Starting simulated price feed");
        tokio::spawn(async move {
            let mut rng = StdRng::from_entropy();
            loop {
                let delay = rng.gen_range(config.tick_min_ms..=config.tick_max_ms);
                tokio::time::sleep(Duration::from_millis(delay)).await;

                let symbols = feed.subscribed_symbols();
                if symbols.is_empty() {
                    continue;
                }
                let symbol = &symbols[rng.gen_range(0..symbols.len())];

                let Some(price) = feed.initial_price(symbol) else {
                    continue;
                };
                let next = step_price(symbol, price, &mut rng);
                feed.publish(symbol, next);
            }
        })
    }
}

/// One random-walk step. Slash pairs move 0.1% per tick, everything else
/// 0.5%; prices are floored at zero and rounded to 4 decimals.
fn step_price(symbol: &str, price: f64, rng: &mut impl Rng) -> f64 {
    let volatility = if symbol.contains('/') {
        price * 0.001
    } else {
        price * 0.005
    };
    let change = (rng.gen::<f64>() - 0.5) * 2.0 * volatility;
    ((price + change).max(0.0) * 10_000.0).round() / 10_000.0
}
