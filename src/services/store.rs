//! Journal store.
//!
//! Owns the canonical state: trades, notification alerts, global price
//! alerts, settings, copy-trading selections and the onboarding flag. Every
//! canonical-state change persists the affected collection and re-arms the
//! trade monitor with the current active set. The store is also the
//! monitor's sink: crossing detections flow back in here, close trades
//! idempotently and fan out over the event channel.

use crate::error::AppError;
use crate::services::commentary::CommentaryService;
use crate::services::local_store::{
    LocalStore, KEY_COPIED_TRADERS, KEY_GLOBAL_PRICE_ALERTS, KEY_HAS_ONBOARDED, KEY_TRADES,
    KEY_USER_SETTINGS,
};
use crate::services::monitor::{MonitorSink, TradeMonitor};
use crate::services::price_feed::PriceFeed;
use crate::services::stats;
use crate::types::{
    AlertKind, AlertRecord, AssetPerformance, GlobalPriceAlert, MarkReadRequest, NewTradeRequest,
    PriceAlert, PriceAlertRequest, ServerMessage, SetGlobalAlertRequest, TakeProfit, Trade,
    TradeStats, TradeStatus, UpdateTradeRequest, UserSettings,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock, RwLock, Weak};
use tokio::sync::broadcast;
use tracing::{info, warn};

pub struct JournalStore {
    trades: RwLock<Vec<Trade>>,
    /// Notification log, newest first. In-memory only.
    alerts: RwLock<Vec<AlertRecord>>,
    global_alerts: RwLock<Vec<GlobalPriceAlert>>,
    settings: RwLock<UserSettings>,
    copied_traders: RwLock<HashSet<String>>,
    has_onboarded: RwLock<bool>,
    storage: Arc<LocalStore>,
    feed: Arc<PriceFeed>,
    monitor: OnceLock<Arc<TradeMonitor>>,
    events: broadcast::Sender<ServerMessage>,
}

impl JournalStore {
    /// Load persisted state, wire up the monitor and arm it with whatever
    /// active trades and global alerts survived the restart.
    pub fn open(storage: Arc<LocalStore>, feed: Arc<PriceFeed>) -> Arc<Self> {
        let trades: Vec<Trade> = storage.load(KEY_TRADES).unwrap_or_default();
        let global_alerts: Vec<GlobalPriceAlert> =
            storage.load(KEY_GLOBAL_PRICE_ALERTS).unwrap_or_default();
        let settings: UserSettings = storage.load(KEY_USER_SETTINGS).unwrap_or_default();
        let copied_traders: HashSet<String> =
            storage.load(KEY_COPIED_TRADERS).unwrap_or_default();
        let has_onboarded: bool = storage.load(KEY_HAS_ONBOARDED).unwrap_or(false);

        info!(
            "Loaded {} trade(s), {} global alert(s)",
            trades.len(),
            global_alerts.len()
        );

        let (events, _) = broadcast::channel(256);
        let store = Arc::new(Self {
            trades: RwLock::new(trades),
            alerts: RwLock::new(Vec::new()),
            global_alerts: RwLock::new(global_alerts),
            settings: RwLock::new(settings),
            copied_traders: RwLock::new(copied_traders),
            has_onboarded: RwLock::new(has_onboarded),
            storage,
            feed,
            monitor: OnceLock::new(),
            events,
        });

        let sink: Weak<dyn MonitorSink> = Arc::downgrade(&(store.clone() as Arc<dyn MonitorSink>));
        let monitor = TradeMonitor::new(store.feed.clone(), sink);
        let _ = store.monitor.set(monitor);
        store.rearm();
        store
    }

    /// Subscribe to trade/alert events for WebSocket push.
    pub fn subscribe_events(&self) -> broadcast::Receiver<ServerMessage> {
        self.events.subscribe()
    }

    pub fn shutdown(&self) {
        if let Some(monitor) = self.monitor.get() {
            monitor.shutdown();
        }
    }

    // =========================================================================
    // Trades
    // =========================================================================

    /// All trades, newest first.
    pub fn trades(&self) -> Vec<Trade> {
        self.trades.read().unwrap().clone()
    }

    pub fn get_trade(&self, id: &str) -> Option<Trade> {
        self.trades.read().unwrap().iter().find(|t| t.id == id).cloned()
    }

    /// Log a new trade. Validation failures reject the request before the
    /// trade reaches the collection.
    pub fn add_trade(&self, request: NewTradeRequest) -> Result<Trade, AppError> {
        let trade = Trade::new(request)?;
        self.trades.write().unwrap().insert(0, trade.clone());
        self.persist_trades();

        self.record_alert(AlertRecord::new(
            &trade.id,
            &trade.asset,
            format!("New {} trade logged for {}.", trade.direction, trade.asset),
            AlertKind::Info,
        ));
        self.rearm();
        let _ = self.events.send(ServerMessage::TradeOpened { data: trade.clone() });
        Ok(trade)
    }

    /// Edit an ACTIVE trade's terms. Closed trades are immutable apart from
    /// journal notes.
    pub fn update_trade(&self, id: &str, request: UpdateTradeRequest) -> Result<Trade, AppError> {
        let updated = {
            let mut trades = self.trades.write().unwrap();
            let trade = trades
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| AppError::NotFound(format!("Trade {} not found", id)))?;
            if !trade.is_active() {
                return Err(AppError::BadRequest(
                    "Only active trades can be edited".to_string(),
                ));
            }

            let mut candidate = trade.clone();
            if let Some(entry_price) = request.entry_price {
                candidate.entry_price = entry_price;
            }
            if let Some(quantity) = request.quantity {
                candidate.quantity = quantity;
            }
            if let Some(stop_loss) = request.stop_loss {
                candidate.stop_loss = stop_loss;
            }
            if let Some(levels) = request.take_profits {
                candidate.take_profits = levels
                    .into_iter()
                    .map(|tp| TakeProfit {
                        level: tp.level,
                        price: tp.price,
                        hit: false,
                    })
                    .collect();
            }
            candidate.risk_percentage = request.risk_percentage.unwrap_or_else(|| {
                ((candidate.entry_price - candidate.stop_loss).abs() / candidate.entry_price
                    * 10_000.0)
                    .round()
                    / 100.0
            });

            candidate.validate()?;
            *trade = candidate.clone();
            candidate
        };

        self.persist_trades();
        self.rearm();
        Ok(updated)
    }

    pub fn delete_trade(&self, id: &str) -> Result<(), AppError> {
        {
            let mut trades = self.trades.write().unwrap();
            let before = trades.len();
            trades.retain(|t| t.id != id);
            if trades.len() == before {
                return Err(AppError::NotFound(format!("Trade {} not found", id)));
            }
        }
        self.persist_trades();
        self.rearm();
        Ok(())
    }

    /// Bulk delete. Unknown ids are skipped; returns the number removed.
    pub fn delete_trades(&self, ids: &[String]) -> usize {
        let removed = {
            let mut trades = self.trades.write().unwrap();
            let before = trades.len();
            trades.retain(|t| !ids.contains(&t.id));
            before - trades.len()
        };
        if removed > 0 {
            self.persist_trades();
            self.rearm();
        }
        removed
    }

    /// Manually close a trade at the given price. A winning close is recorded
    /// as CLOSED_TP, a losing (or flat) one as CLOSED_SL.
    pub fn close_trade(&self, id: &str, price: f64) -> Result<Trade, AppError> {
        let closed = {
            let mut trades = self.trades.write().unwrap();
            let trade = trades
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| AppError::NotFound(format!("Trade {} not found", id)))?;
            let status = if trade.is_win_at(price) {
                TradeStatus::ClosedTp
            } else {
                TradeStatus::ClosedSl
            };
            trade.close(status, price)?;
            trade.clone()
        };

        self.persist_trades();
        self.record_alert(AlertRecord::new(
            &closed.id,
            &closed.asset,
            format!("Manually closed {} trade at ${:.2}.", closed.asset, price),
            AlertKind::Info,
        ));
        self.rearm();
        let _ = self.events.send(ServerMessage::TradeClosed { data: closed.clone() });
        Ok(closed)
    }

    /// Set (or replace) a trade's embedded price alert. Replacing re-arms it.
    pub fn set_price_alert(
        &self,
        id: &str,
        request: PriceAlertRequest,
    ) -> Result<Trade, AppError> {
        let updated = {
            let mut trades = self.trades.write().unwrap();
            let trade = trades
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| AppError::NotFound(format!("Trade {} not found", id)))?;
            trade.price_alert = Some(PriceAlert {
                price: request.price,
                condition: request.condition,
                triggered: false,
            });
            trade.clone()
        };
        self.persist_trades();
        self.rearm();
        Ok(updated)
    }

    pub fn clear_price_alert(&self, id: &str) -> Result<Trade, AppError> {
        let updated = {
            let mut trades = self.trades.write().unwrap();
            let trade = trades
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| AppError::NotFound(format!("Trade {} not found", id)))?;
            trade.price_alert = None;
            trade.clone()
        };
        self.persist_trades();
        self.rearm();
        Ok(updated)
    }

    /// Append a journal note. Allowed on closed trades.
    pub fn add_journal_note(&self, id: &str, note: String) -> Result<Trade, AppError> {
        let updated = {
            let mut trades = self.trades.write().unwrap();
            let trade = trades
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| AppError::NotFound(format!("Trade {} not found", id)))?;
            trade.add_journal_note(note);
            trade.clone()
        };
        self.persist_trades();
        Ok(updated)
    }

    // =========================================================================
    // Notification alerts
    // =========================================================================

    /// Notification log, newest first.
    pub fn alerts(&self) -> Vec<AlertRecord> {
        self.alerts.read().unwrap().clone()
    }

    /// Append to the notification log and push it over the event channel.
    pub fn record_alert(&self, alert: AlertRecord) {
        self.alerts.write().unwrap().insert(0, alert.clone());
        let _ = self.events.send(ServerMessage::AlertCreated { data: alert });
    }

    /// Mark alerts read. With no ids, marks everything.
    pub fn mark_alerts_read(&self, request: MarkReadRequest) -> usize {
        let mut alerts = self.alerts.write().unwrap();
        let mut marked = 0;
        for alert in alerts.iter_mut() {
            let selected = match &request.ids {
                Some(ids) => ids.contains(&alert.id),
                None => true,
            };
            if selected && !alert.read {
                alert.read = true;
                marked += 1;
            }
        }
        marked
    }

    /// Fill an alert's AI commentary lazily. Subsequent requests return the
    /// cached text.
    pub fn fill_commentary(
        &self,
        alert_id: &str,
        commentary: &CommentaryService,
    ) -> Result<AlertRecord, AppError> {
        let trade = {
            let alerts = self.alerts.read().unwrap();
            let alert = alerts
                .iter()
                .find(|a| a.id == alert_id)
                .ok_or_else(|| AppError::NotFound(format!("Alert {} not found", alert_id)))?;
            if alert.ai_commentary.is_some() {
                return Ok(alert.clone());
            }
            self.get_trade(&alert.trade_id).ok_or_else(|| {
                AppError::BadRequest("Commentary requires a trade-linked alert".to_string())
            })?
        };

        let text = commentary.commentary_for(&trade);
        let mut alerts = self.alerts.write().unwrap();
        let alert = alerts
            .iter_mut()
            .find(|a| a.id == alert_id)
            .ok_or_else(|| AppError::NotFound(format!("Alert {} not found", alert_id)))?;
        alert.ai_commentary = Some(text);
        Ok(alert.clone())
    }

    // =========================================================================
    // Global price alerts
    // =========================================================================

    pub fn global_alerts(&self) -> Vec<GlobalPriceAlert> {
        self.global_alerts.read().unwrap().clone()
    }

    /// Create or edit a global price alert. An id matching an existing alert
    /// edits it in place, keeping its creation time.
    pub fn set_global_alert(&self, request: SetGlobalAlertRequest) -> GlobalPriceAlert {
        let alert = {
            let mut alerts = self.global_alerts.write().unwrap();
            match request
                .id
                .as_deref()
                .and_then(|id| alerts.iter_mut().find(|a| a.id == id))
            {
                Some(existing) => {
                    existing.asset = request.asset;
                    existing.price = request.price;
                    existing.condition = request.condition;
                    existing.clone()
                }
                None => {
                    let alert =
                        GlobalPriceAlert::new(request.asset, request.price, request.condition);
                    alerts.push(alert.clone());
                    alert
                }
            }
        };
        self.persist_global_alerts();
        self.rearm();
        alert
    }

    pub fn delete_global_alert(&self, id: &str) -> Result<(), AppError> {
        {
            let mut alerts = self.global_alerts.write().unwrap();
            let before = alerts.len();
            alerts.retain(|a| a.id != id);
            if alerts.len() == before {
                return Err(AppError::NotFound(format!("Price alert {} not found", id)));
            }
        }
        self.persist_global_alerts();
        self.rearm();
        Ok(())
    }

    // =========================================================================
    // Settings / onboarding / copy trading
    // =========================================================================

    pub fn settings(&self) -> UserSettings {
        self.settings.read().unwrap().clone()
    }

    pub fn update_settings(&self, settings: UserSettings) -> UserSettings {
        *self.settings.write().unwrap() = settings.clone();
        self.storage.save(KEY_USER_SETTINGS, &settings);
        settings
    }

    pub fn has_onboarded(&self) -> bool {
        *self.has_onboarded.read().unwrap()
    }

    pub fn set_onboarded(&self, value: bool) {
        *self.has_onboarded.write().unwrap() = value;
        self.storage.save(KEY_HAS_ONBOARDED, &value);
    }

    pub fn copied_traders(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.copied_traders.read().unwrap().iter().cloned().collect();
        ids.sort();
        ids
    }

    pub fn is_copying(&self, trader_id: &str) -> bool {
        self.copied_traders.read().unwrap().contains(trader_id)
    }

    /// Toggle copy-trading for a trader. Returns whether the trader is now
    /// copied.
    pub fn toggle_copied(&self, trader_id: &str) -> bool {
        let copying = {
            let mut copied = self.copied_traders.write().unwrap();
            if !copied.remove(trader_id) {
                copied.insert(trader_id.to_string());
                true
            } else {
                false
            }
        };
        let snapshot = self.copied_traders();
        self.storage.save(KEY_COPIED_TRADERS, &snapshot);
        copying
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    pub fn stats(&self) -> TradeStats {
        let trades = self.trades();
        stats::compute_stats(&trades, &self.price_map())
    }

    pub fn asset_performance(&self) -> Vec<AssetPerformance> {
        let trades = self.trades();
        stats::asset_performance(&trades, &self.price_map())
    }

    fn price_map(&self) -> HashMap<String, f64> {
        self.feed.price_snapshot().into_iter().collect()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn persist_trades(&self) {
        let trades = self.trades.read().unwrap().clone();
        self.storage.save(KEY_TRADES, &trades);
    }

    fn persist_global_alerts(&self) {
        let alerts = self.global_alerts.read().unwrap().clone();
        self.storage.save(KEY_GLOBAL_PRICE_ALERTS, &alerts);
    }

    /// Point the monitor at the current active trades and global alerts.
    fn rearm(&self) {
        if let Some(monitor) = self.monitor.get() {
            let active: Vec<Trade> = self
                .trades
                .read()
                .unwrap()
                .iter()
                .filter(|t| t.is_active())
                .cloned()
                .collect();
            monitor.watch(active, self.global_alerts());
        }
    }
}

impl MonitorSink for JournalStore {
    fn on_trigger(&self, trade: &Trade, status: TradeStatus, price: f64) {
        let closed = {
            let mut trades = self.trades.write().unwrap();
            let Some(stored) = trades.iter_mut().find(|t| t.id == trade.id) else {
                warn!("Trigger for unknown trade {}", trade.id);
                return;
            };
            // Already closed by a racing manual close; the trigger is dropped.
            if stored.close(status, price).is_err() {
                return;
            }
            stored.clone()
        };
        self.persist_trades();

        let (message, kind) = match status {
            TradeStatus::ClosedTp => (
                format!("Take profit hit for {} at ${:.2}.", closed.asset, price),
                if closed.is_win_at(price) {
                    AlertKind::Success
                } else {
                    AlertKind::Error
                },
            ),
            _ => (
                format!("Stop loss triggered for {} at ${:.2}.", closed.asset, price),
                if closed.is_win_at(price) {
                    AlertKind::Success
                } else {
                    AlertKind::Error
                },
            ),
        };
        self.record_alert(AlertRecord::new(&closed.id, &closed.asset, message, kind));
        self.rearm();
        let _ = self.events.send(ServerMessage::TradeClosed { data: closed });
    }

    fn on_custom_alert(&self, trade: &Trade) {
        let (asset, message) = {
            let mut trades = self.trades.write().unwrap();
            let Some(stored) = trades.iter_mut().find(|t| t.id == trade.id) else {
                return;
            };
            let Some(alert) = stored.price_alert.as_mut() else {
                return;
            };
            if alert.triggered {
                return;
            }
            alert.triggered = true;
            (
                stored.asset.clone(),
                format!(
                    "Price alert for {}: Price is now {} ${:.2}.",
                    stored.asset, alert.condition, alert.price
                ),
            )
        };
        self.persist_trades();
        self.record_alert(AlertRecord::new(&trade.id, asset, message, AlertKind::Info));
        self.rearm();
    }

    fn on_global_alert(&self, alert: &GlobalPriceAlert) {
        // One-shot: the alert is removed the moment it fires.
        let removed = {
            let mut alerts = self.global_alerts.write().unwrap();
            let before = alerts.len();
            alerts.retain(|a| a.id != alert.id);
            alerts.len() != before
        };
        if !removed {
            return;
        }
        self.persist_global_alerts();
        self.record_alert(AlertRecord::global(
            &alert.asset,
            format!(
                "Price alert: {} is now {} ${:.2}.",
                alert.asset, alert.condition, alert.price
            ),
            AlertKind::Info,
        ));
        self.rearm();
    }
}
