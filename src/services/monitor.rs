//! Trade monitor.
//!
//! Watches the active trade set and global price alerts against the live
//! feed and detects stop-loss, take-profit and alert crossings. Each trade
//! fires at most one terminal trigger per watch cycle: the triggered set is
//! consulted before any evaluation and updated before the sink is called, so
//! a flood of ticks cannot double-close a trade.

use crate::services::price_feed::{HandlerId, PriceFeed};
use crate::types::{GlobalPriceAlert, Trade, TradeStatus};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, OnceLock, Weak};
use tracing::{debug, info};

/// Receiver of monitor trigger events.
///
/// Callbacks run synchronously on the feed's dispatch path and may re-enter
/// the monitor (e.g. call [`TradeMonitor::watch`] with a new trade set).
pub trait MonitorSink: Send + Sync {
    /// A trade crossed its stop or a take-profit level. `price` is the
    /// configured level price, not the tick price.
    fn on_trigger(&self, trade: &Trade, status: TradeStatus, price: f64);

    /// A trade's embedded price alert condition was met.
    fn on_custom_alert(&self, trade: &Trade);

    /// A global price alert condition was met.
    fn on_global_alert(&self, alert: &GlobalPriceAlert);
}

#[derive(Default)]
struct WatchState {
    trades_by_symbol: HashMap<String, Vec<Trade>>,
    globals_by_symbol: HashMap<String, Vec<GlobalPriceAlert>>,
    /// Trade ids that already fired a terminal trigger in this watch cycle.
    triggered: HashSet<String>,
    subscriptions: Vec<(String, HandlerId)>,
}

/// Crossing detector over the price feed.
pub struct TradeMonitor {
    feed: Arc<PriceFeed>,
    /// Held weak: the sink owns the monitor, not the other way around.
    sink: Weak<dyn MonitorSink>,
    state: Mutex<WatchState>,
    self_weak: OnceLock<Weak<TradeMonitor>>,
}

impl TradeMonitor {
    pub fn new(feed: Arc<PriceFeed>, sink: Weak<dyn MonitorSink>) -> Arc<Self> {
        let monitor = Arc::new(Self {
            feed,
            sink,
            state: Mutex::new(WatchState::default()),
            self_weak: OnceLock::new(),
        });
        let _ = monitor.self_weak.set(Arc::downgrade(&monitor));
        monitor
    }

    /// Replace the watched set. Tears down all previous subscriptions, clears
    /// the triggered set, and subscribes one feed handler per symbol in the
    /// union of active trades and global alerts.
    pub fn watch(&self, trades: Vec<Trade>, globals: Vec<GlobalPriceAlert>) {
        let mut trades_by_symbol: HashMap<String, Vec<Trade>> = HashMap::new();
        for trade in trades.into_iter().filter(|t| t.is_active()) {
            trades_by_symbol
                .entry(trade.asset.clone())
                .or_default()
                .push(trade);
        }
        let mut globals_by_symbol: HashMap<String, Vec<GlobalPriceAlert>> = HashMap::new();
        for alert in globals {
            globals_by_symbol
                .entry(alert.asset.clone())
                .or_default()
                .push(alert);
        }

        let mut symbols: Vec<String> = trades_by_symbol
            .keys()
            .chain(globals_by_symbol.keys())
            .cloned()
            .collect();
        symbols.sort();
        symbols.dedup();

        let old_subs;
        {
            let mut state = self.state.lock().unwrap();
            old_subs = std::mem::take(&mut state.subscriptions);
            state.triggered.clear();
            state.trades_by_symbol = trades_by_symbol;
            state.globals_by_symbol = globals_by_symbol;
        }
        for (symbol, id) in old_subs {
            self.feed.unsubscribe(&symbol, id);
        }

        let mut subscriptions = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let weak = self.self_weak.get().cloned().unwrap_or_default();
            let id = self.feed.subscribe(
                &symbol,
                Arc::new(move |update| {
                    if let Some(monitor) = weak.upgrade() {
                        monitor.evaluate(&update.symbol, update.price);
                    }
                }),
            );
            subscriptions.push((symbol, id));
        }

        let mut state = self.state.lock().unwrap();
        debug!(
            "Watching {} symbol(s) across trades and alerts",
            subscriptions.len()
        );
        state.subscriptions.extend(subscriptions);
    }

    /// Evaluate one tick against the watched set.
    ///
    /// Per trade: the embedded price alert is checked first and independently,
    /// then the take-profit ladder (nearest level to entry first), then the
    /// stop. TP wins when both are satisfied by the same tick. Global alerts
    /// for the symbol are checked last.
    pub fn evaluate(&self, symbol: &str, price: f64) {
        let Some(sink) = self.sink.upgrade() else {
            return;
        };

        // Snapshot under the lock, then release it before any sink call:
        // the sink may re-enter watch().
        let (trades, globals, already_triggered) = {
            let state = self.state.lock().unwrap();
            (
                state.trades_by_symbol.get(symbol).cloned().unwrap_or_default(),
                state.globals_by_symbol.get(symbol).cloned().unwrap_or_default(),
                state.triggered.clone(),
            )
        };

        for trade in &trades {
            if already_triggered.contains(&trade.id) {
                continue;
            }

            if let Some(alert) = &trade.price_alert {
                if !alert.triggered && alert.condition.is_met(price, alert.price) {
                    sink.on_custom_alert(trade);
                }
            }

            if let Some(tp) = trade
                .armed_take_profits()
                .into_iter()
                .find(|tp| self.crossed_tp(trade, tp.price, price))
            {
                self.mark_triggered(&trade.id);
                info!("Take profit hit for {} at {}", trade.asset, tp.price);
                sink.on_trigger(trade, TradeStatus::ClosedTp, tp.price);
                continue;
            }

            if self.crossed_stop(trade, price) {
                self.mark_triggered(&trade.id);
                info!("Stop loss triggered for {} at {}", trade.asset, trade.stop_loss);
                sink.on_trigger(trade, TradeStatus::ClosedSl, trade.stop_loss);
            }
        }

        for alert in &globals {
            if alert.condition.is_met(price, alert.price) {
                sink.on_global_alert(alert);
            }
        }
    }

    fn crossed_tp(&self, trade: &Trade, tp_price: f64, price: f64) -> bool {
        match trade.direction {
            crate::types::TradeDirection::Long => price >= tp_price,
            crate::types::TradeDirection::Short => price <= tp_price,
        }
    }

    fn crossed_stop(&self, trade: &Trade, price: f64) -> bool {
        match trade.direction {
            crate::types::TradeDirection::Long => price <= trade.stop_loss,
            crate::types::TradeDirection::Short => price >= trade.stop_loss,
        }
    }

    fn mark_triggered(&self, trade_id: &str) {
        let mut state = self.state.lock().unwrap();
        state.triggered.insert(trade_id.to_string());
    }

    /// Number of live feed subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.state.lock().unwrap().subscriptions.len()
    }

    /// Tear down all subscriptions and clear the watched set. Idempotent.
    pub fn shutdown(&self) {
        let old_subs = {
            let mut state = self.state.lock().unwrap();
            state.trades_by_symbol.clear();
            state.globals_by_symbol.clear();
            state.triggered.clear();
            std::mem::take(&mut state.subscriptions)
        };
        for (symbol, id) in old_subs {
            self.feed.unsubscribe(&symbol, id);
        }
    }
}
