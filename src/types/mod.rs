pub mod alert;
pub mod market;
pub mod settings;
pub mod stats;
pub mod trade;
pub mod trader;
pub mod ws;

pub use alert::{
    AlertKind, AlertRecord, GlobalPriceAlert, MarkReadRequest, SetGlobalAlertRequest,
    GLOBAL_TRADE_ID,
};
pub use market::{default_market_data, MarketData, PriceUpdate};
pub use settings::{ChartSettings, NotificationSettings, UserSettings};
pub use stats::{AssetPerformance, TradeStats};
pub use trade::{
    AlertCondition, CloseTradeRequest, JournalEntry, JournalNoteRequest, NewTradeRequest,
    PriceAlert, PriceAlertRequest, TakeProfit, TakeProfitLevel, Trade, TradeDirection, TradeError,
    TradeStatus, UpdateTradeRequest,
};
pub use trader::{default_pro_traders, ProTrader, ProTraderStats, RiskScore, TradeTemplate};
pub use ws::ServerMessage;
