pub mod commentary;
pub mod local_store;
pub mod monitor;
pub mod price_feed;
pub mod pro_trader;
pub mod stats;
pub mod store;

pub use commentary::CommentaryService;
pub use local_store::LocalStore;
pub use monitor::{MonitorSink, TradeMonitor};
pub use price_feed::{HandlerId, PriceFeed, PriceHandler};
pub use pro_trader::ProTraderFeed;
pub use store::JournalStore;
