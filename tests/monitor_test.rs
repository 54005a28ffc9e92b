//! Trade monitor tests
//!
//! Crossing detection for stops, take-profit ladders, trade-scoped price
//! alerts and global alerts, plus the exactly-once and teardown guarantees.

use std::sync::{Arc, Mutex, Weak};

use tradelog::services::monitor::{MonitorSink, TradeMonitor};
use tradelog::services::price_feed::PriceFeed;
use tradelog::types::{
    default_market_data, AlertCondition, GlobalPriceAlert, NewTradeRequest, TakeProfitLevel,
    Trade, TradeDirection, TradeStatus,
};

// =============================================================================
// Test harness
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Trigger {
        trade_id: String,
        status: TradeStatus,
        price: f64,
    },
    CustomAlert {
        trade_id: String,
    },
    GlobalAlert {
        alert_id: String,
    },
}

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<Event>>,
}

impl RecordingSink {
    fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    fn triggers(&self) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|e| matches!(e, Event::Trigger { .. }))
            .collect()
    }
}

impl MonitorSink for RecordingSink {
    fn on_trigger(&self, trade: &Trade, status: TradeStatus, price: f64) {
        self.events.lock().unwrap().push(Event::Trigger {
            trade_id: trade.id.clone(),
            status,
            price,
        });
    }

    fn on_custom_alert(&self, trade: &Trade) {
        self.events.lock().unwrap().push(Event::CustomAlert {
            trade_id: trade.id.clone(),
        });
    }

    fn on_global_alert(&self, alert: &GlobalPriceAlert) {
        self.events.lock().unwrap().push(Event::GlobalAlert {
            alert_id: alert.id.clone(),
        });
    }
}

fn setup() -> (Arc<PriceFeed>, Arc<RecordingSink>, Arc<TradeMonitor>) {
    let feed = PriceFeed::new(default_market_data());
    let sink = Arc::new(RecordingSink::default());
    let weak: Weak<dyn MonitorSink> = Arc::<RecordingSink>::downgrade(&sink);
    let monitor = TradeMonitor::new(feed.clone(), weak);
    (feed, sink, monitor)
}

fn trade(
    asset: &str,
    direction: TradeDirection,
    entry: f64,
    stop: f64,
    tps: &[f64],
) -> Trade {
    Trade::new(NewTradeRequest {
        asset: asset.to_string(),
        direction,
        entry_price: entry,
        quantity: 1.0,
        stop_loss: stop,
        take_profits: tps
            .iter()
            .enumerate()
            .map(|(i, &price)| TakeProfitLevel {
                level: i as u32 + 1,
                price,
            })
            .collect(),
        risk_percentage: None,
        price_alert: None,
    })
    .unwrap()
}

fn trade_with_alert(
    asset: &str,
    direction: TradeDirection,
    entry: f64,
    stop: f64,
    tps: &[f64],
    alert_price: f64,
    condition: AlertCondition,
) -> Trade {
    let mut t = trade(asset, direction, entry, stop, tps);
    t.price_alert = Some(tradelog::types::PriceAlert {
        price: alert_price,
        condition,
        triggered: false,
    });
    t
}

// =============================================================================
// Take-profit and stop-loss triggers
// =============================================================================

mod trigger_tests {
    use super::*;

    #[test]
    fn test_long_tp_fires_once_at_configured_price() {
        let (_feed, sink, monitor) = setup();
        let t = trade("BTC/USD", TradeDirection::Long, 65000.0, 64000.0, &[66000.0]);
        let id = t.id.clone();
        monitor.watch(vec![t], vec![]);

        monitor.evaluate("BTC/USD", 65200.0);
        monitor.evaluate("BTC/USD", 65900.0);
        assert!(sink.events().is_empty());

        monitor.evaluate("BTC/USD", 66100.0);
        assert_eq!(
            sink.events(),
            vec![Event::Trigger {
                trade_id: id,
                status: TradeStatus::ClosedTp,
                price: 66000.0,
            }]
        );
    }

    #[test]
    fn test_short_sl_reports_configured_stop_not_tick() {
        let (_feed, sink, monitor) = setup();
        let t = trade("ETH/USD", TradeDirection::Short, 3800.0, 3900.0, &[3700.0]);
        let id = t.id.clone();
        monitor.watch(vec![t], vec![]);

        monitor.evaluate("ETH/USD", 3850.0);
        assert!(sink.events().is_empty());

        // Gap past the stop: the trigger reports the configured stop price.
        monitor.evaluate("ETH/USD", 3905.0);
        assert_eq!(
            sink.events(),
            vec![Event::Trigger {
                trade_id: id,
                status: TradeStatus::ClosedSl,
                price: 3900.0,
            }]
        );
    }

    #[test]
    fn test_long_sl_triggers_on_gap_below() {
        let (_feed, sink, monitor) = setup();
        let t = trade("BTC/USD", TradeDirection::Long, 65000.0, 64000.0, &[66000.0]);
        monitor.watch(vec![t], vec![]);

        monitor.evaluate("BTC/USD", 63500.0);
        assert!(matches!(
            sink.events()[..],
            [Event::Trigger {
                status: TradeStatus::ClosedSl,
                price,
                ..
            }] if price == 64000.0
        ));
    }

    #[test]
    fn test_trigger_fires_at_most_once_across_ticks() {
        let (_feed, sink, monitor) = setup();
        let t = trade("BTC/USD", TradeDirection::Long, 65000.0, 64000.0, &[66000.0]);
        monitor.watch(vec![t], vec![]);

        monitor.evaluate("BTC/USD", 66100.0);
        monitor.evaluate("BTC/USD", 66200.0);
        monitor.evaluate("BTC/USD", 63000.0);

        assert_eq!(sink.triggers().len(), 1);
    }

    #[test]
    fn test_nearest_unhit_tp_level_wins() {
        let (_feed, sink, monitor) = setup();
        let mut t = trade(
            "BTC/USD",
            TradeDirection::Long,
            65000.0,
            64000.0,
            &[66000.0, 67000.0],
        );
        // First rung already taken; only the far level is armed.
        t.take_profits[0].hit = true;
        monitor.watch(vec![t], vec![]);

        monitor.evaluate("BTC/USD", 66500.0);
        assert!(sink.events().is_empty());

        monitor.evaluate("BTC/USD", 67200.0);
        assert!(matches!(
            sink.events()[..],
            [Event::Trigger {
                status: TradeStatus::ClosedTp,
                price,
                ..
            }] if price == 67000.0
        ));
    }

    #[test]
    fn test_tp_wins_when_stop_also_crossed() {
        // Degenerate terms where one tick crosses both the stop and a TP
        // level (possible after an unvalidated edit). The TP branch is
        // checked first, so the close is CLOSED_TP at the TP price.
        let (_feed, sink, monitor) = setup();
        let mut t = trade("BTC/USD", TradeDirection::Long, 100.0, 90.0, &[103.0]);
        t.stop_loss = 105.0;
        monitor.watch(vec![t], vec![]);

        monitor.evaluate("BTC/USD", 104.0);
        let triggers = sink.triggers();
        assert_eq!(triggers.len(), 1);
        assert!(matches!(
            triggers[0],
            Event::Trigger {
                status: TradeStatus::ClosedTp,
                price,
                ..
            } if price == 103.0
        ));
    }

    #[test]
    fn test_direction_symmetry() {
        let (_feed, sink, monitor) = setup();
        let long = trade("BTC/USD", TradeDirection::Long, 100.0, 90.0, &[110.0]);
        let short = trade("ETH/USD", TradeDirection::Short, 100.0, 110.0, &[90.0]);
        let long_id = long.id.clone();
        let short_id = short.id.clone();
        monitor.watch(vec![long, short], vec![]);

        monitor.evaluate("BTC/USD", 110.0);
        monitor.evaluate("ETH/USD", 90.0);

        assert_eq!(
            sink.events(),
            vec![
                Event::Trigger {
                    trade_id: long_id,
                    status: TradeStatus::ClosedTp,
                    price: 110.0,
                },
                Event::Trigger {
                    trade_id: short_id,
                    status: TradeStatus::ClosedTp,
                    price: 90.0,
                },
            ]
        );
    }

    #[test]
    fn test_only_crossed_trade_triggers_on_shared_symbol() {
        let (_feed, sink, monitor) = setup();
        let near = trade("BTC/USD", TradeDirection::Long, 65000.0, 64000.0, &[65500.0]);
        let far = trade("BTC/USD", TradeDirection::Long, 65000.0, 63000.0, &[70000.0]);
        let near_id = near.id.clone();
        monitor.watch(vec![near, far], vec![]);

        monitor.evaluate("BTC/USD", 65600.0);

        let triggers = sink.triggers();
        assert_eq!(triggers.len(), 1);
        assert!(matches!(
            &triggers[0],
            Event::Trigger { trade_id, .. } if *trade_id == near_id
        ));

        // The far trade still receives ticks and triggers later.
        monitor.evaluate("BTC/USD", 70100.0);
        assert_eq!(sink.triggers().len(), 2);
    }

    #[test]
    fn test_closed_trades_are_not_watched() {
        let (_feed, sink, monitor) = setup();
        let mut t = trade("BTC/USD", TradeDirection::Long, 65000.0, 64000.0, &[66000.0]);
        t.close(TradeStatus::ClosedSl, 64000.0).unwrap();
        monitor.watch(vec![t], vec![]);

        monitor.evaluate("BTC/USD", 66100.0);
        assert!(sink.events().is_empty());
        assert_eq!(monitor.subscription_count(), 0);
    }
}

// =============================================================================
// Price alerts
// =============================================================================

mod alert_tests {
    use super::*;

    #[test]
    fn test_custom_alert_fires_and_trade_stays_watched() {
        let (_feed, sink, monitor) = setup();
        let t = trade_with_alert(
            "BTC/USD",
            TradeDirection::Long,
            65000.0,
            64000.0,
            &[70000.0],
            67000.0,
            AlertCondition::Above,
        );
        let id = t.id.clone();
        monitor.watch(vec![t.clone()], vec![]);

        monitor.evaluate("BTC/USD", 67050.0);
        assert_eq!(
            sink.events(),
            vec![Event::CustomAlert {
                trade_id: id.clone()
            }]
        );

        // Caller marks the alert triggered and re-watches; identical ticks
        // no longer fire.
        let mut rearmed = t;
        rearmed.price_alert.as_mut().unwrap().triggered = true;
        monitor.watch(vec![rearmed], vec![]);

        monitor.evaluate("BTC/USD", 67050.0);
        assert_eq!(sink.events().len(), 1);
    }

    #[test]
    fn test_custom_alert_below_condition() {
        let (_feed, sink, monitor) = setup();
        let t = trade_with_alert(
            "ETH/USD",
            TradeDirection::Short,
            3800.0,
            3900.0,
            &[3600.0],
            3750.0,
            AlertCondition::Below,
        );
        monitor.watch(vec![t], vec![]);

        monitor.evaluate("ETH/USD", 3760.0);
        assert!(sink.events().is_empty());

        monitor.evaluate("ETH/USD", 3750.0);
        assert_eq!(sink.events().len(), 1);
        assert!(matches!(sink.events()[0], Event::CustomAlert { .. }));
    }

    #[test]
    fn test_alert_is_independent_of_terminal_trigger() {
        // One tick satisfies both the alert and the TP; both fire.
        let (_feed, sink, monitor) = setup();
        let t = trade_with_alert(
            "BTC/USD",
            TradeDirection::Long,
            65000.0,
            64000.0,
            &[66000.0],
            65500.0,
            AlertCondition::Above,
        );
        monitor.watch(vec![t], vec![]);

        monitor.evaluate("BTC/USD", 66100.0);
        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Event::CustomAlert { .. }));
        assert!(matches!(
            events[1],
            Event::Trigger {
                status: TradeStatus::ClosedTp,
                ..
            }
        ));
    }

    #[test]
    fn test_global_alert_fires_without_any_trade() {
        let (_feed, sink, monitor) = setup();
        let alert = GlobalPriceAlert::new("SOL/USD".to_string(), 170.0, AlertCondition::Above);
        let alert_id = alert.id.clone();
        monitor.watch(vec![], vec![alert]);

        monitor.evaluate("SOL/USD", 169.0);
        assert!(sink.events().is_empty());

        monitor.evaluate("SOL/USD", 171.0);
        assert_eq!(sink.events(), vec![Event::GlobalAlert { alert_id }]);
    }
}

// =============================================================================
// Watch lifecycle
// =============================================================================

mod lifecycle_tests {
    use super::*;

    #[test]
    fn test_removed_trade_receives_no_further_events() {
        let (_feed, sink, monitor) = setup();
        let t = trade("BTC/USD", TradeDirection::Long, 65000.0, 64000.0, &[66000.0]);
        monitor.watch(vec![t], vec![]);
        assert_eq!(monitor.subscription_count(), 1);

        // Trade deleted externally; re-watch with the empty set.
        monitor.watch(vec![], vec![]);
        assert_eq!(monitor.subscription_count(), 0);

        monitor.evaluate("BTC/USD", 66100.0);
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_watch_subscribes_one_handler_per_symbol() {
        let (_feed, _sink, monitor) = setup();
        let a = trade("BTC/USD", TradeDirection::Long, 100.0, 90.0, &[110.0]);
        let b = trade("BTC/USD", TradeDirection::Long, 100.0, 80.0, &[120.0]);
        let c = trade("ETH/USD", TradeDirection::Short, 100.0, 110.0, &[90.0]);
        let alert = GlobalPriceAlert::new("SOL/USD".to_string(), 170.0, AlertCondition::Above);
        monitor.watch(vec![a, b, c], vec![alert]);

        assert_eq!(monitor.subscription_count(), 3);
    }

    #[test]
    fn test_feed_ticks_drive_evaluation() {
        let (feed, sink, monitor) = setup();
        let t = trade("BTC/USD", TradeDirection::Long, 65000.0, 64000.0, &[66000.0]);
        monitor.watch(vec![t], vec![]);

        feed.publish("BTC/USD", 66100.0);
        assert_eq!(sink.triggers().len(), 1);
    }

    #[test]
    fn test_shutdown_is_idempotent_and_tears_down() {
        let (feed, sink, monitor) = setup();
        let t = trade("BTC/USD", TradeDirection::Long, 65000.0, 64000.0, &[66000.0]);
        monitor.watch(vec![t], vec![]);

        monitor.shutdown();
        monitor.shutdown();
        assert_eq!(monitor.subscription_count(), 0);

        feed.publish("BTC/USD", 66100.0);
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_rewatch_resets_triggered_set() {
        let (_feed, sink, monitor) = setup();
        let t = trade("BTC/USD", TradeDirection::Long, 65000.0, 64000.0, &[66000.0]);
        monitor.watch(vec![t.clone()], vec![]);

        monitor.evaluate("BTC/USD", 66100.0);
        assert_eq!(sink.triggers().len(), 1);

        // The same still-active trade handed back in a new watch cycle is
        // eligible to trigger again.
        monitor.watch(vec![t], vec![]);
        monitor.evaluate("BTC/USD", 66100.0);
        assert_eq!(sink.triggers().len(), 2);
    }

    #[test]
    fn test_dropped_sink_silences_monitor() {
        let feed = PriceFeed::new(default_market_data());
        let sink = Arc::new(RecordingSink::default());
        let weak: Weak<dyn MonitorSink> = Arc::<RecordingSink>::downgrade(&sink);
        let monitor = TradeMonitor::new(feed, weak);
        let t = trade("BTC/USD", TradeDirection::Long, 65000.0, 64000.0, &[66000.0]);
        monitor.watch(vec![t], vec![]);

        drop(sink);
        monitor.evaluate("BTC/USD", 66100.0);
    }
}
