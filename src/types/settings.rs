//! User settings with default-merge deserialization.
//!
//! Every field carries a serde default, so a partial or outdated settings
//! blob loaded from disk fills in with defaults instead of failing.

use serde::{Deserialize, Serialize};

/// Notification preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    #[serde(default = "default_true")]
    pub trade_alerts: bool,
    #[serde(default = "default_true")]
    pub ai_commentary: bool,
    #[serde(default)]
    pub market_news: bool,
    #[serde(default = "default_true")]
    pub sound_alerts: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            trade_alerts: true,
            ai_commentary: true,
            market_news: false,
            sound_alerts: true,
        }
    }
}

/// Chart display preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSettings {
    #[serde(default = "default_true")]
    pub default_ma: bool,
    #[serde(default)]
    pub default_rsi: bool,
    #[serde(default = "default_ma_period")]
    pub ma_period: u32,
    #[serde(default = "default_rsi_period")]
    pub rsi_period: u32,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            default_ma: true,
            default_rsi: false,
            ma_period: default_ma_period(),
            rsi_period: default_rsi_period(),
        }
    }
}

/// User-level settings, persisted under the `userSettings` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    #[serde(default = "default_currency")]
    pub default_currency: String,
    #[serde(default)]
    pub notifications: NotificationSettings,
    #[serde(default)]
    pub chart: ChartSettings,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            default_currency: default_currency(),
            notifications: NotificationSettings::default(),
            chart: ChartSettings::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_ma_period() -> u32 {
    20
}

fn default_rsi_period() -> u32 {
    14
}
