//! Overlap results summary
//!
//! An overlap results document maps each token address to its check history.
//! The summary keeps the latest check per token and ranks tokens by when they
//! were last checked.

use crate::error::{Result, TokenLoaderError};
use crate::processing::normalizer::value_kind;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_SUMMARY_LIMIT: usize = 100;

const DEXSCREENER_BASE_URL: &str = "https://dexscreener.com/solana";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSummary {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub address: String,
    pub grade: String,
    pub overlap_percentage: f64,
    pub concentration: f64,
    pub discovered_at: Option<String>,
    pub dexscreener_url: String,
}

impl TokenSummary {
    fn from_history(address: &str, history: &[Value]) -> Option<Self> {
        let latest = history.last()?;
        let result = latest.get("result");
        let field = |name: &str| result.and_then(|r| r.get(name));
        let meta = |name: &str| {
            field("token_metadata")
                .and_then(|m| m.get(name))
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
        };

        Some(Self {
            id: address.to_string(),
            symbol: meta("symbol").unwrap_or_default().to_string(),
            name: meta("name").unwrap_or("Unknown").to_string(),
            address: address.to_string(),
            grade: field("grade")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .unwrap_or("NONE")
                .to_string(),
            overlap_percentage: field("overlap_percentage").and_then(Value::as_f64).unwrap_or(0.0),
            concentration: field("concentration").and_then(Value::as_f64).unwrap_or(0.0),
            discovered_at: field("checked_at")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            dexscreener_url: format!("{}/{}", DEXSCREENER_BASE_URL, address),
        })
    }

    /// Timestamp used for ranking; missing or unparseable values rank as the epoch
    pub fn discovered_timestamp(&self) -> i64 {
        self.discovered_at
            .as_deref()
            .and_then(parse_timestamp)
            .map(|dt| dt.timestamp_millis())
            .unwrap_or(0)
    }
}

/// Build the ranked summary of an overlap results document.
///
/// Tokens whose history is empty or not an array are skipped. Rows are
/// ordered newest check first and cut to `limit`.
pub fn summarize(document: &Value, limit: usize) -> Result<Vec<TokenSummary>> {
    let entries = document.as_object().ok_or_else(|| {
        TokenLoaderError::UnsupportedFormat(format!(
            "overlap results must be an object keyed by token address, found a {}",
            value_kind(document)
        ))
    })?;

    let mut tokens: Vec<TokenSummary> = entries
        .iter()
        .filter_map(|(address, history)| {
            history
                .as_array()
                .and_then(|history| TokenSummary::from_history(address, history))
        })
        .collect();

    tokens.sort_by_key(|token| std::cmp::Reverse(token.discovered_timestamp()));
    tokens.truncate(limit);

    Ok(tokens)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(symbol: &str, grade: &str, checked_at: &str) -> Value {
        json!({
            "result": {
                "token_metadata": {"symbol": symbol, "name": format!("{} token", symbol)},
                "grade": grade,
                "overlap_percentage": 42.5,
                "concentration": 7,
                "checked_at": checked_at
            }
        })
    }

    #[test]
    fn test_latest_check_wins() {
        let document = json!({
            "Addr1": [check("OLD", "LOW", "2024-01-01T00:00:00"), check("NEW", "HIGH", "2024-01-02T00:00:00")]
        });
        let tokens = summarize(&document, DEFAULT_SUMMARY_LIMIT).unwrap();

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].symbol, "NEW");
        assert_eq!(tokens[0].grade, "HIGH");
        assert_eq!(tokens[0].overlap_percentage, 42.5);
        assert_eq!(tokens[0].concentration, 7.0);
        assert_eq!(tokens[0].dexscreener_url, "https://dexscreener.com/solana/Addr1");
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let document = json!({"Addr1": [{"result": {}}], "Addr2": [{}]});
        let tokens = summarize(&document, DEFAULT_SUMMARY_LIMIT).unwrap();

        assert_eq!(tokens.len(), 2);
        for token in &tokens {
            assert_eq!(token.symbol, "");
            assert_eq!(token.name, "Unknown");
            assert_eq!(token.grade, "NONE");
            assert_eq!(token.overlap_percentage, 0.0);
            assert_eq!(token.discovered_at, None);
        }
    }

    #[test]
    fn test_empty_or_invalid_history_is_skipped() {
        let document = json!({"Addr1": [], "Addr2": "oops", "Addr3": [check("A", "LOW", "2024-01-01T00:00:00Z")]});
        let tokens = summarize(&document, DEFAULT_SUMMARY_LIMIT).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].id, "Addr3");
    }

    #[test]
    fn test_sorted_newest_first_and_limited() {
        let document = json!({
            "A": [check("A", "LOW", "2024-03-01T00:00:00+00:00")],
            "B": [check("B", "LOW", "not a date")],
            "C": [check("C", "LOW", "2024-05-01 10:00:00.123456")],
            "D": [check("D", "LOW", "2024-04-01T00:00:00Z")]
        });

        let tokens = summarize(&document, DEFAULT_SUMMARY_LIMIT).unwrap();
        let order: Vec<&str> = tokens.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(order, vec!["C", "D", "A", "B"]);

        let limited = summarize(&document, 2).unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[test]
    fn test_non_object_document_is_rejected() {
        assert!(summarize(&json!([1, 2]), DEFAULT_SUMMARY_LIMIT).is_err());
    }
}
