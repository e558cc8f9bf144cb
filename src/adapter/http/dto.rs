//! Wire shapes that differ from the domain types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{
    AnalysisSummary, BotState, Portfolio, RiskMetrics, StatusSnapshot, StrategyConfig,
    TradingMode,
};

#[derive(Debug, Serialize)]
pub(super) struct LoginRequest<'a> {
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub(super) struct StartRequest<'a> {
    pub symbols: Option<&'a [String]>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SymbolsResponse {
    #[serde(default)]
    pub symbols: Vec<String>,
}

/// `GET /api/status` payload.
#[derive(Debug, Deserialize)]
pub(super) struct StatusResponse {
    pub is_running: bool,
    pub paper_trading_mode: bool,
    pub portfolio: Portfolio,
    pub risk_metrics: RiskMetrics,
    #[serde(default)]
    pub last_analysis: BTreeMap<String, AnalysisSummary>,
    #[serde(default)]
    pub symbols: Vec<String>,
    #[allow(dead_code)]
    #[serde(default)]
    pub strategy_config: Option<StrategyConfig>,
}

impl From<StatusResponse> for StatusSnapshot {
    fn from(response: StatusResponse) -> Self {
        Self {
            bot: BotState::new(
                response.is_running,
                TradingMode::from_paper_flag(response.paper_trading_mode),
                response.symbols,
            ),
            portfolio: response.portfolio,
            risk: response.risk_metrics,
            last_analysis: response.last_analysis,
        }
    }
}

/// Extract the operator-facing reason from a non-2xx body.
///
/// FastAPI puts a string in `detail` for handled errors and a list of
/// field errors for request validation failures.
pub(super) fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(detail) => Some(detail.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn status_response_maps_to_snapshot() {
        let response: StatusResponse = serde_json::from_value(json!({
            "is_running": true,
            "paper_trading_mode": false,
            "portfolio": {
                "total_value": 1000,
                "available_cash": 250,
                "positions": {"dogecoin": 100},
                "daily_pnl": 1.5,
                "total_pnl": 20,
                "last_updated": "2024-05-01T12:30:00.000001"
            },
            "risk_metrics": {
                "daily_trades_count": 2,
                "daily_trades_limit": 10,
                "daily_loss": 0,
                "daily_loss_limit": 10,
                "daily_loss_percentage": 0,
                "available_cash": 250,
                "portfolio_value": 1000,
                "max_trade_value": 10,
                "risk_level": "LOW",
                "trading_enabled": true
            },
            "strategy_config": {"name": "default", "enabled": true},
            "symbols": ["dogecoin", "cardano"],
            "last_analysis": {
                "dogecoin": {
                    "signal": "buy",
                    "confidence": 0.8,
                    "reasoning": "RSI oversold",
                    "price": 0.15,
                    "timestamp": "2024-05-01T12:29:00"
                }
            }
        }))
        .unwrap();

        let snapshot = StatusSnapshot::from(response);
        assert!(snapshot.bot.running);
        assert_eq!(snapshot.bot.mode, TradingMode::Live);
        assert!(snapshot.bot.symbols.contains("cardano"));
        assert_eq!(snapshot.portfolio.available_cash, dec!(250));
        assert_eq!(snapshot.risk.max_trade_value, Some(dec!(10)));
        assert_eq!(snapshot.last_analysis["dogecoin"].signal, "buy");
    }

    #[test]
    fn status_without_optional_sections() {
        let response: StatusResponse = serde_json::from_value(json!({
            "is_running": false,
            "paper_trading_mode": true,
            "portfolio": {
                "total_value": 100,
                "available_cash": 100,
                "daily_pnl": 0,
                "total_pnl": 0,
                "last_updated": "2024-05-01T12:30:00"
            },
            "risk_metrics": {
                "daily_trades_count": 0,
                "daily_trades_limit": 10,
                "daily_loss": 0,
                "daily_loss_limit": 10,
                "daily_loss_percentage": 0,
                "risk_level": "LOW",
                "trading_enabled": true
            }
        }))
        .unwrap();
        let snapshot = StatusSnapshot::from(response);
        assert_eq!(snapshot.bot.mode, TradingMode::Paper);
        assert!(snapshot.bot.symbols.is_empty());
        assert!(snapshot.last_analysis.is_empty());
    }

    #[test]
    fn start_request_sends_null_without_symbols() {
        let body = serde_json::to_value(StartRequest { symbols: None }).unwrap();
        assert_eq!(body, json!({"symbols": null}));

        let symbols = vec!["dogecoin".to_string()];
        let body = serde_json::to_value(StartRequest {
            symbols: Some(&symbols),
        })
        .unwrap();
        assert_eq!(body, json!({"symbols": ["dogecoin"]}));
    }

    #[test]
    fn detail_string_and_list() {
        assert_eq!(
            error_detail(r#"{"detail": "Insufficient funds"}"#).as_deref(),
            Some("Insufficient funds")
        );
        let list = error_detail(r#"{"detail": [{"msg": "field required"}]}"#).unwrap();
        assert!(list.contains("field required"));
        assert!(error_detail("<html>").is_none());
        assert!(error_detail(r#"{"other": 1}"#).is_none());
    }

    #[test]
    fn symbols_response_unwraps_list() {
        let response: SymbolsResponse =
            serde_json::from_value(json!({"symbols": ["dogecoin", "cardano"]})).unwrap();
        assert_eq!(response.symbols, vec!["dogecoin", "cardano"]);
    }
}
