//! Type-level tests
//!
//! Trade term validation, the terminal close transition, TP ladder ordering,
//! and the wire format of the serialized types.

use tradelog::types::*;

fn request(direction: TradeDirection, entry: f64, stop: f64, tps: &[f64]) -> NewTradeRequest {
    NewTradeRequest {
        asset: "BTC/USD".to_string(),
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
    }
}

// =============================================================================
// Validation
// =============================================================================

mod validation_tests {
    use super::*;

    #[test]
    fn test_valid_long_and_short() {
        assert!(Trade::new(request(TradeDirection::Long, 100.0, 90.0, &[110.0])).is_ok());
        assert!(Trade::new(request(TradeDirection::Short, 100.0, 110.0, &[90.0])).is_ok());
    }

    #[test]
    fn test_empty_asset_rejected() {
        let mut req = request(TradeDirection::Long, 100.0, 90.0, &[110.0]);
        req.asset = "  ".to_string();
        assert_eq!(Trade::new(req).unwrap_err(), TradeError::EmptyAsset);
    }

    #[test]
    fn test_non_positive_prices_rejected() {
        let mut req = request(TradeDirection::Long, 100.0, 90.0, &[110.0]);
        req.entry_price = 0.0;
        assert_eq!(Trade::new(req).unwrap_err(), TradeError::InvalidEntryPrice);

        let mut req = request(TradeDirection::Long, 100.0, 90.0, &[110.0]);
        req.quantity = -1.0;
        assert_eq!(Trade::new(req).unwrap_err(), TradeError::InvalidQuantity);

        let mut req = request(TradeDirection::Long, 100.0, 90.0, &[110.0]);
        req.stop_loss = f64::NAN;
        assert_eq!(Trade::new(req).unwrap_err(), TradeError::InvalidStopLoss);
    }

    #[test]
    fn test_take_profit_ladder_required() {
        let req = request(TradeDirection::Long, 100.0, 90.0, &[]);
        assert_eq!(Trade::new(req).unwrap_err(), TradeError::NoTakeProfits);
    }

    #[test]
    fn test_stop_on_wrong_side_rejected() {
        let req = request(TradeDirection::Long, 100.0, 105.0, &[110.0]);
        assert_eq!(Trade::new(req).unwrap_err(), TradeError::StopOnWrongSide);

        let req = request(TradeDirection::Short, 100.0, 95.0, &[90.0]);
        assert_eq!(Trade::new(req).unwrap_err(), TradeError::StopOnWrongSide);
    }

    #[test]
    fn test_take_profit_on_wrong_side_rejected() {
        let req = request(TradeDirection::Long, 100.0, 90.0, &[110.0, 95.0]);
        assert_eq!(
            Trade::new(req).unwrap_err(),
            TradeError::TakeProfitOnWrongSide { level: 2 }
        );
    }

    #[test]
    fn test_risk_percentage_derived_from_stop_distance() {
        let trade = Trade::new(request(TradeDirection::Long, 100.0, 98.5, &[110.0])).unwrap();
        assert_eq!(trade.risk_percentage, 1.5);

        let mut req = request(TradeDirection::Long, 100.0, 98.5, &[110.0]);
        req.risk_percentage = Some(2.5);
        let trade = Trade::new(req).unwrap();
        assert_eq!(trade.risk_percentage, 2.5);
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

mod lifecycle_tests {
    use super::*;

    #[test]
    fn test_close_writes_terminal_fields_once() {
        let mut trade = Trade::new(request(TradeDirection::Long, 100.0, 90.0, &[110.0])).unwrap();
        assert!(trade.is_active());

        trade.close(TradeStatus::ClosedTp, 110.0).unwrap();
        assert_eq!(trade.status, TradeStatus::ClosedTp);
        assert_eq!(trade.close_price, Some(110.0));
        assert!(trade.close_date.is_some());
        assert!(trade.take_profits[0].hit);

        assert_eq!(
            trade.close(TradeStatus::ClosedSl, 90.0).unwrap_err(),
            TradeError::AlreadyClosed
        );
        assert_eq!(trade.close_price, Some(110.0));
    }

    #[test]
    fn test_armed_take_profits_ordering() {
        let mut long = Trade::new(request(
            TradeDirection::Long,
            100.0,
            90.0,
            &[130.0, 110.0, 120.0],
        ))
        .unwrap();
        let armed: Vec<f64> = long.armed_take_profits().iter().map(|tp| tp.price).collect();
        assert_eq!(armed, vec![110.0, 120.0, 130.0]);

        long.take_profits[1].hit = true; // 110 taken
        let armed: Vec<f64> = long.armed_take_profits().iter().map(|tp| tp.price).collect();
        assert_eq!(armed, vec![120.0, 130.0]);

        let short = Trade::new(request(
            TradeDirection::Short,
            100.0,
            110.0,
            &[70.0, 90.0, 80.0],
        ))
        .unwrap();
        let armed: Vec<f64> = short.armed_take_profits().iter().map(|tp| tp.price).collect();
        assert_eq!(armed, vec![90.0, 80.0, 70.0]);
    }

    #[test]
    fn test_pnl_direction_sign() {
        let long = Trade::new(request(TradeDirection::Long, 100.0, 90.0, &[110.0])).unwrap();
        assert_eq!(long.pnl_at(105.0), 5.0);
        assert_eq!(long.pnl_at(95.0), -5.0);

        let short = Trade::new(request(TradeDirection::Short, 100.0, 110.0, &[90.0])).unwrap();
        assert_eq!(short.pnl_at(95.0), 5.0);
        assert_eq!(short.pnl_at(105.0), -5.0);
    }

    #[test]
    fn test_alert_condition_boundaries_inclusive() {
        assert!(AlertCondition::Above.is_met(100.0, 100.0));
        assert!(AlertCondition::Above.is_met(100.1, 100.0));
        assert!(!AlertCondition::Above.is_met(99.9, 100.0));

        assert!(AlertCondition::Below.is_met(100.0, 100.0));
        assert!(AlertCondition::Below.is_met(99.9, 100.0));
        assert!(!AlertCondition::Below.is_met(100.1, 100.0));
    }
}

// =============================================================================
// Wire format
// =============================================================================

mod serialization_tests {
    use super::*;

    #[test]
    fn test_trade_wire_format() {
        let trade = Trade::new(request(TradeDirection::Long, 100.0, 90.0, &[110.0])).unwrap();
        let json = serde_json::to_string(&trade).unwrap();

        assert!(json.contains("\"direction\":\"LONG\""));
        assert!(json.contains("\"status\":\"ACTIVE\""));
        assert!(json.contains("\"entryPrice\":100.0"));
        assert!(json.contains("\"stopLoss\":90.0"));
        assert!(json.contains("\"takeProfits\""));
        assert!(json.contains("\"openDate\""));
        // Unset terminal fields are omitted entirely
        assert!(!json.contains("closeDate"));
        assert!(!json.contains("closePrice"));
    }

    #[test]
    fn test_closed_status_wire_values() {
        assert_eq!(
            serde_json::to_string(&TradeStatus::ClosedTp).unwrap(),
            "\"CLOSED_TP\""
        );
        assert_eq!(
            serde_json::to_string(&TradeStatus::ClosedSl).unwrap(),
            "\"CLOSED_SL\""
        );
        assert_eq!(
            serde_json::to_string(&AlertCondition::Above).unwrap(),
            "\"ABOVE\""
        );
    }

    #[test]
    fn test_alert_record_wire_format() {
        let alert = AlertRecord::new(
            "trade-1",
            "BTC/USD",
            "Take profit hit for BTC/USD at $110.00.".to_string(),
            AlertKind::Success,
        );
        let json = serde_json::to_string(&alert).unwrap();

        assert!(json.contains("\"type\":\"success\""));
        assert!(json.contains("\"tradeId\":\"trade-1\""));
        assert!(!json.contains("aiCommentary"));
    }

    #[test]
    fn test_global_alert_record_uses_system_trade_id() {
        let alert = AlertRecord::global("SOL/USD", "msg".to_string(), AlertKind::Info);
        assert_eq!(alert.trade_id, GLOBAL_TRADE_ID);
        assert_eq!(alert.trade_id, "system-global");
    }

    #[test]
    fn test_trade_deserializes_without_optional_fields() {
        // Rows persisted before alerts/journal existed still load.
        let json = r#"{
            "id": "t-1",
            "asset": "BTC/USD",
            "direction": "LONG",
            "entryPrice": 100.0,
            "quantity": 1.0,
            "stopLoss": 90.0,
            "takeProfits": [{"level": 1, "price": 110.0, "hit": false}],
            "status": "ACTIVE",
            "openDate": 1700000000000,
            "riskPercentage": 10.0
        }"#;

        let trade: Trade = serde_json::from_str(json).unwrap();
        assert!(trade.price_alert.is_none());
        assert!(trade.journal.is_empty());
    }

    #[test]
    fn test_market_data_wire_format() {
        let rows = default_market_data();
        let btc = rows.iter().find(|r| r.symbol == "BTC/USD").unwrap();
        let json = serde_json::to_string(btc).unwrap();

        assert!(json.contains("\"high24h\""));
        assert!(json.contains("\"low24h\""));
        assert!(json.contains("\"changePercent\""));
    }

    #[test]
    fn test_ws_message_tagging() {
        let message = ServerMessage::PriceUpdate {
            data: PriceUpdate {
                symbol: "BTC/USD".to_string(),
                price: 68543.21,
                timestamp: 1700000000000,
            },
        };
        let json = serde_json::to_string(&message).unwrap();
        assert!(json.contains("\"type\":\"price_update\""));
        assert!(json.contains("\"data\""));
    }

    #[test]
    fn test_settings_default_merge() {
        let settings: UserSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.default_currency, "USD");
        assert!(settings.notifications.trade_alerts);
        assert_eq!(settings.chart.rsi_period, 14);

        let settings: UserSettings =
            serde_json::from_str(r#"{"defaultCurrency":"GBP"}"#).unwrap();
        assert_eq!(settings.default_currency, "GBP");
        assert_eq!(settings.chart.ma_period, 20);
    }
}
