//! Trade Types
//!
//! The journaled trade data model: directions, lifecycle status, take-profit
//! ladders, embedded price alerts, and journal entries.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Enums
// =============================================================================

/// Direction of a logged position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeDirection {
    Long,
    Short,
}

impl TradeDirection {
    /// Sign applied to P/L calculations: +1 for long, -1 for short.
    pub fn sign(&self) -> f64 {
        match self {
            TradeDirection::Long => 1.0,
            TradeDirection::Short => -1.0,
        }
    }
}

impl std::fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeDirection::Long => write!(f, "LONG"),
            TradeDirection::Short => write!(f, "SHORT"),
        }
    }
}

/// Trade lifecycle status. `Active` transitions at most once, to one of the
/// terminal closed states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeStatus {
    Active,
    ClosedTp,
    ClosedSl,
}

impl TradeStatus {
    pub fn is_closed(&self) -> bool {
        !matches!(self, TradeStatus::Active)
    }
}

impl std::fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeStatus::Active => write!(f, "ACTIVE"),
            TradeStatus::ClosedTp => write!(f, "CLOSED_TP"),
            TradeStatus::ClosedSl => write!(f, "CLOSED_SL"),
        }
    }
}

/// Crossing condition for price alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertCondition {
    Above,
    Below,
}

impl AlertCondition {
    /// Whether a tick at `price` satisfies this condition for `threshold`.
    pub fn is_met(&self, price: f64, threshold: f64) -> bool {
        match self {
            AlertCondition::Above => price >= threshold,
            AlertCondition::Below => price <= threshold,
        }
    }
}

impl std::fmt::Display for AlertCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertCondition::Above => write!(f, "above"),
            AlertCondition::Below => write!(f, "below"),
        }
    }
}

// =============================================================================
// Components
// =============================================================================

/// One rung of a trade's take-profit ladder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TakeProfit {
    /// Ladder level (1-indexed, user facing)
    pub level: u32,
    /// Target price
    pub price: f64,
    /// Whether this level has been hit. Monotonic: once true it stays true,
    /// unless the user explicitly edits the ladder before any trigger.
    pub hit: bool,
}

/// A trade-scoped price alert, independent of TP/SL. Re-armed by replacing it
/// (triggered resets to false), removed by setting it to `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceAlert {
    pub price: f64,
    pub condition: AlertCondition,
    pub triggered: bool,
}

/// An append-only journal note attached to a trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    /// Timestamp in milliseconds
    pub timestamp: i64,
    pub note: String,
}

// =============================================================================
// Trade
// =============================================================================

/// A logged position in the journal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    /// Unique trade ID (immutable once created)
    pub id: String,
    /// Asset symbol, e.g. "BTC/USD"
    pub asset: String,
    pub direction: TradeDirection,
    pub entry_price: f64,
    pub quantity: f64,
    pub stop_loss: f64,
    /// Take-profit ladder; at least one level required at creation
    pub take_profits: Vec<TakeProfit>,
    pub status: TradeStatus,
    /// When the trade was opened (ms)
    pub open_date: i64,
    /// Set exactly once, at the terminal transition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_date: Option<i64>,
    /// Set exactly once, at the terminal transition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_price: Option<f64>,
    /// Percentage of entry risked to the stop
    pub risk_percentage: f64,
    /// Optional embedded price alert
    #[serde(default)]
    pub price_alert: Option<PriceAlert>,
    /// Append-only journal
    #[serde(default)]
    pub journal: Vec<JournalEntry>,
}

/// Trade definition errors, rejected at creation/edit time before a trade
/// ever reaches the monitor.
#[derive(Debug, Error, PartialEq)]
pub enum TradeError {
    #[error("Asset symbol must not be empty")]
    EmptyAsset,
    #[error("Entry price must be a positive finite number")]
    InvalidEntryPrice,
    #[error("Quantity must be a positive finite number")]
    InvalidQuantity,
    #[error("Stop loss must be a positive finite number")]
    InvalidStopLoss,
    #[error("At least one take-profit level is required")]
    NoTakeProfits,
    #[error("Stop loss must be below entry for LONG and above entry for SHORT")]
    StopOnWrongSide,
    #[error("Take-profit {level} must be above entry for LONG and below entry for SHORT")]
    TakeProfitOnWrongSide { level: u32 },
    #[error("Take-profit {level} price must be a positive finite number")]
    InvalidTakeProfitPrice { level: u32 },
    #[error("Trade is already closed")]
    AlreadyClosed,
}

fn positive_finite(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

impl Trade {
    /// Create a new ACTIVE trade from validated terms.
    pub fn new(request: NewTradeRequest) -> Result<Self, TradeError> {
        let now = chrono::Utc::now().timestamp_millis();
        let take_profits = request
            .take_profits
            .into_iter()
            .map(|tp| TakeProfit {
                level: tp.level,
                price: tp.price,
                hit: false,
            })
            .collect();

        let risk_percentage = request.risk_percentage.unwrap_or_else(|| {
            ((request.entry_price - request.stop_loss).abs() / request.entry_price * 10_000.0)
                .round()
                / 100.0
        });

        let trade = Self {
            id: uuid::Uuid::new_v4().to_string(),
            asset: request.asset,
            direction: request.direction,
            entry_price: request.entry_price,
            quantity: request.quantity,
            stop_loss: request.stop_loss,
            take_profits,
            status: TradeStatus::Active,
            open_date: now,
            close_date: None,
            close_price: None,
            risk_percentage,
            price_alert: request.price_alert.map(|a| PriceAlert {
                price: a.price,
                condition: a.condition,
                triggered: false,
            }),
            journal: Vec::new(),
        };

        trade.validate()?;
        Ok(trade)
    }

    /// Check the invariant set for this trade's static terms.
    ///
    /// LONG: entry > stop, every TP > entry. SHORT: entry < stop, every
    /// TP < entry. All prices positive and finite, at least one TP level.
    pub fn validate(&self) -> Result<(), TradeError> {
        if self.asset.trim().is_empty() {
            return Err(TradeError::EmptyAsset);
        }
        if !positive_finite(self.entry_price) {
            return Err(TradeError::InvalidEntryPrice);
        }
        if !positive_finite(self.quantity) {
            return Err(TradeError::InvalidQuantity);
        }
        if !positive_finite(self.stop_loss) {
            return Err(TradeError::InvalidStopLoss);
        }
        if self.take_profits.is_empty() {
            return Err(TradeError::NoTakeProfits);
        }

        let stop_ok = match self.direction {
            TradeDirection::Long => self.entry_price > self.stop_loss,
            TradeDirection::Short => self.entry_price < self.stop_loss,
        };
        if !stop_ok {
            return Err(TradeError::StopOnWrongSide);
        }

        for tp in &self.take_profits {
            if !positive_finite(tp.price) {
                return Err(TradeError::InvalidTakeProfitPrice { level: tp.level });
            }
            let tp_ok = match self.direction {
                TradeDirection::Long => tp.price > self.entry_price,
                TradeDirection::Short => tp.price < self.entry_price,
            };
            if !tp_ok {
                return Err(TradeError::TakeProfitOnWrongSide { level: tp.level });
            }
        }

        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.status == TradeStatus::Active
    }

    /// Apply the terminal transition. Returns `AlreadyClosed` if the trade has
    /// left ACTIVE before; close price/date are written exactly once.
    pub fn close(&mut self, status: TradeStatus, price: f64) -> Result<(), TradeError> {
        if self.status.is_closed() {
            return Err(TradeError::AlreadyClosed);
        }
        self.status = status;
        self.close_price = Some(price);
        self.close_date = Some(chrono::Utc::now().timestamp_millis());

        // Record which ladder level closed the trade.
        if status == TradeStatus::ClosedTp {
            if let Some(tp) = self
                .take_profits
                .iter_mut()
                .find(|tp| !tp.hit && tp.price == price)
            {
                tp.hit = true;
            }
        }
        Ok(())
    }

    /// P/L at the given price: (price - entry) * quantity * direction sign.
    pub fn pnl_at(&self, price: f64) -> f64 {
        (price - self.entry_price) * self.quantity * self.direction.sign()
    }

    /// Realized P/L for a closed trade, `None` while still active.
    pub fn realized_pnl(&self) -> Option<f64> {
        self.close_price.map(|p| self.pnl_at(p))
    }

    /// Whether a close at `price` counts as a win for this direction.
    pub fn is_win_at(&self, price: f64) -> bool {
        match self.direction {
            TradeDirection::Long => price > self.entry_price,
            TradeDirection::Short => price < self.entry_price,
        }
    }

    /// Unhit take-profit levels ordered nearest-to-entry first: ascending by
    /// price for LONG, descending for SHORT.
    pub fn armed_take_profits(&self) -> Vec<TakeProfit> {
        let mut armed: Vec<TakeProfit> = self
            .take_profits
            .iter()
            .filter(|tp| !tp.hit)
            .cloned()
            .collect();
        match self.direction {
            TradeDirection::Long => armed.sort_by(|a, b| a.price.total_cmp(&b.price)),
            TradeDirection::Short => armed.sort_by(|a, b| b.price.total_cmp(&a.price)),
        }
        armed
    }

    /// Append a journal note. Allowed on closed trades; past entries are
    /// never mutated.
    pub fn add_journal_note(&mut self, note: String) -> &JournalEntry {
        self.journal.push(JournalEntry {
            timestamp: chrono::Utc::now().timestamp_millis(),
            note,
        });
        self.journal.last().unwrap()
    }
}

// =============================================================================
// Request types
// =============================================================================

/// A requested take-profit level.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TakeProfitLevel {
    pub level: u32,
    pub price: f64,
}

/// A requested price alert (trade- or symbol-scoped).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceAlertRequest {
    pub price: f64,
    pub condition: AlertCondition,
}

/// Request to log a new trade.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTradeRequest {
    pub asset: String,
    pub direction: TradeDirection,
    pub entry_price: f64,
    pub quantity: f64,
    pub stop_loss: f64,
    pub take_profits: Vec<TakeProfitLevel>,
    /// Computed from the stop distance when omitted
    #[serde(default)]
    pub risk_percentage: Option<f64>,
    #[serde(default)]
    pub price_alert: Option<PriceAlertRequest>,
}

/// Request to edit an ACTIVE trade's terms. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTradeRequest {
    #[serde(default)]
    pub entry_price: Option<f64>,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub stop_loss: Option<f64>,
    #[serde(default)]
    pub take_profits: Option<Vec<TakeProfitLevel>>,
    #[serde(default)]
    pub risk_percentage: Option<f64>,
}

/// Request to manually close a trade at a given price.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseTradeRequest {
    pub price: f64,
}

/// Request to append a journal note.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalNoteRequest {
    pub note: String,
}
