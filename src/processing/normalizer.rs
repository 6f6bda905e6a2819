//! Normalization of decoded token data into a list of records

use crate::error::{Result, TokenLoaderError};
use serde_json::{Map, Value};

/// One token's metadata: field name to value, in insertion order.
pub type Record = Map<String, Value>;

/// Field carrying the mapping key when the source is keyed by symbol
pub const SYMBOL_FIELD: &str = "symbol";

/// Field holding a scalar value that had no fields of its own
pub const DATA_FIELD: &str = "data";

/// Reduce a decoded value to a list of records.
///
/// * mapping: one record per entry, `symbol` set to the key. Inner mappings
///   contribute their fields (an inner `symbol` field wins over the key);
///   anything else is kept under `data`.
/// * sequence: passed through, every element must already be a record.
/// * anything else is rejected.
pub fn normalize(value: Value) -> Result<Vec<Record>> {
    match value {
        Value::Object(entries) => Ok(entries
            .into_iter()
            .map(|(key, value)| keyed_record(key, value))
            .collect()),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(record) => Ok(record),
                other => Err(TokenLoaderError::UnsupportedFormat(format!(
                    "element {} is a {}, expected an object",
                    index,
                    value_kind(&other)
                ))),
            })
            .collect(),
        other => Err(TokenLoaderError::UnsupportedFormat(format!(
            "top-level value is a {}, expected an object or an array",
            value_kind(&other)
        ))),
    }
}

fn keyed_record(key: String, value: Value) -> Record {
    let mut record = Record::new();
    record.insert(SYMBOL_FIELD.to_string(), Value::String(key));

    match value {
        Value::Object(fields) => record.extend(fields),
        other => {
            record.insert(DATA_FIELD.to_string(), other);
        }
    }

    record
}

pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_values(records: Vec<Record>) -> Value {
        Value::Array(records.into_iter().map(Value::Object).collect())
    }

    #[test]
    fn test_list_passes_through_unchanged() {
        let input = json!([{"symbol": "BTC", "price": 1}, {"symbol": "ETH"}]);
        let records = normalize(input.clone()).unwrap();
        assert_eq!(as_values(records), input);
    }

    #[test]
    fn test_mapping_of_mappings_adds_symbol() {
        let input = json!({
            "BTC": {"name": "Bitcoin", "decimals": 8},
            "ETH": {"name": "Ether", "listed": true}
        });
        let records = normalize(input).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(
            Value::Object(records[0].clone()),
            json!({"symbol": "BTC", "name": "Bitcoin", "decimals": 8})
        );
        assert_eq!(records[1]["symbol"], json!("ETH"));
        assert_eq!(records[1]["listed"], json!(true));
        assert_eq!(records[1].len(), 3);
    }

    #[test]
    fn test_mapping_of_scalars_uses_data_field() {
        let records = normalize(json!({"BTC": 50000, "DOGE": null})).unwrap();
        assert_eq!(
            as_values(records),
            json!([{"symbol": "BTC", "data": 50000}, {"symbol": "DOGE", "data": null}])
        );
    }

    #[test]
    fn test_nested_list_value_is_data() {
        let records = normalize(json!({"SOL": [1, 2, 3]})).unwrap();
        assert_eq!(records[0].len(), 2);
        assert_eq!(records[0]["data"], json!([1, 2, 3]));
    }

    #[test]
    fn test_inner_symbol_field_wins_but_stays_first() {
        let records = normalize(json!({"wbtc": {"price": 1, "symbol": "WBTC"}})).unwrap();
        let keys: Vec<&String> = records[0].keys().collect();
        assert_eq!(keys, vec!["symbol", "price"]);
        assert_eq!(records[0]["symbol"], json!("WBTC"));
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let records = normalize(json!({"ZEC": 1, "ADA": 2, "MKR": 3})).unwrap();
        let symbols: Vec<&Value> = records.iter().map(|r| &r["symbol"]).collect();
        assert_eq!(symbols, vec!["ZEC", "ADA", "MKR"]);
    }

    #[test]
    fn test_scalar_top_level_is_unsupported() {
        let err = normalize(json!(42)).unwrap_err();
        assert!(matches!(err, TokenLoaderError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_list_with_scalar_element_is_unsupported() {
        let err = normalize(json!([{"symbol": "BTC"}, "ETH"])).unwrap_err();
        match err {
            TokenLoaderError::UnsupportedFormat(message) => assert!(message.contains("element 1")),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_empty_inputs() {
        assert!(normalize(json!({})).unwrap().is_empty());
        assert!(normalize(json!([])).unwrap().is_empty());
    }
}
