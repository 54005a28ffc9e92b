use std::env;

/// Simulated price feed configuration.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Minimum delay between simulated ticks (ms).
    pub tick_min_ms: u64,
    /// Maximum delay between simulated ticks (ms).
    pub tick_max_ms: u64,
    /// Whether the random-walk simulation task runs at all.
    pub simulate: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            tick_min_ms: 50,
            tick_max_ms: 500,
            simulate: true,
        }
    }
}

/// Copy-trading feed configuration.
#[derive(Debug, Clone)]
pub struct CopyTradingConfig {
    /// Interval between simulated pro-trader trades (ms).
    pub interval_ms: u64,
    /// Whether the pro-trader feed runs at all.
    pub enabled: bool,
}

impl Default for CopyTradingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 8_000,
            enabled: true,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Directory for the key-value journal store.
    pub data_dir: String,
    /// Simulated feed settings.
    pub feed: FeedConfig,
    /// Copy-trading feed settings.
    pub copy_trading: CopyTradingConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let feed_defaults = FeedConfig::default();
        let copy_defaults = CopyTradingConfig::default();

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| ".tradelog_data".to_string()),
            feed: FeedConfig {
                tick_min_ms: env::var("FEED_TICK_MIN_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(feed_defaults.tick_min_ms),
                tick_max_ms: env::var("FEED_TICK_MAX_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(feed_defaults.tick_max_ms),
                simulate: env::var("FEED_SIMULATE")
                    .map(|v| v != "false" && v != "0")
                    .unwrap_or(feed_defaults.simulate),
            },
            copy_trading: CopyTradingConfig {
                interval_ms: env::var("COPY_TRADING_INTERVAL_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(copy_defaults.interval_ms),
                enabled: env::var("COPY_TRADING_ENABLED")
                    .map(|v| v != "false" && v != "0")
                    .unwrap_or(copy_defaults.enabled),
            },
        }
    }
}
