//! Rows handed to the batch insert builder.

use crate::error::{QueryError, QueryResult};
use crate::value::Value;
use serde::Deserialize;
use std::collections::BTreeMap;

/// One row to insert: column name → value.
///
/// Columns are looked up by the table's declaration order when the statement is
/// built; keys the table does not declare are ignored and missing ones bind
/// `NULL`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowUpdate {
    values: BTreeMap<String, Value>,
}

impl RowUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chainable setter.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(column.into(), value.into());
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Convert a JSON object of scalars.
    pub fn from_json(json: &serde_json::Value) -> QueryResult<Self> {
        let serde_json::Value::Object(map) = json else {
            return Err(QueryError::validation(format!(
                "expected a JSON object for a row, got {json}"
            )));
        };
        map.iter()
            .map(|(k, v)| {
                Value::try_from(v)
                    .map(|v| (k.clone(), v))
                    .map_err(|e| QueryError::validation(format!("column {k}: {e}")))
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RowUpdate {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A row of `current_transactions`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransactionRow {
    pub timestamp: i64,
    pub round: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<TransactionRow> for RowUpdate {
    fn from(row: TransactionRow) -> Self {
        RowUpdate::new()
            .set("timestamp", row.timestamp)
            .set("round", row.round)
            .set("type", row.kind)
    }
}

/// A row of `current_network`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NetworkRow {
    pub timestamp: i64,
    pub difficulty: f64,
    pub hashrate: f64,
    pub height: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<NetworkRow> for RowUpdate {
    fn from(row: NetworkRow) -> Self {
        RowUpdate::new()
            .set("timestamp", row.timestamp)
            .set("difficulty", row.difficulty)
            .set("hashrate", row.hashrate)
            .set("height", row.height)
            .set("type", row.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_json_object() {
        let row = RowUpdate::from_json(&json!({
            "timestamp": 1,
            "difficulty": 1.5,
            "type": "primary",
            "note": null,
        }))
        .unwrap();
        assert_eq!(row.get("timestamp"), Some(&Value::Int(1)));
        assert_eq!(row.get("difficulty"), Some(&Value::Float(1.5)));
        assert_eq!(row.get("type"), Some(&Value::from("primary")));
        assert_eq!(row.get("note"), Some(&Value::Null));
        assert_eq!(row.len(), 4);
    }

    #[test]
    fn from_json_rejects_non_objects_and_nested_values() {
        assert!(RowUpdate::from_json(&json!([1, 2])).is_err());
        let err = RowUpdate::from_json(&json!({"type": {"a": 1}})).unwrap_err();
        assert!(err.to_string().contains("column type"));
    }

    #[test]
    fn typed_rows_convert() {
        let row: TransactionRow =
            serde_json::from_value(json!({"timestamp": 1, "round": "r1", "type": "primary"}))
                .unwrap();
        let update = RowUpdate::from(row);
        assert_eq!(update.get("type"), Some(&Value::from("primary")));

        let update = RowUpdate::from(NetworkRow {
            timestamp: 1,
            difficulty: 2.0,
            hashrate: 3.0,
            height: 4,
            kind: "auxiliary".into(),
        });
        assert_eq!(update.get("height"), Some(&Value::Int(4)));
        assert_eq!(update.get("hashrate"), Some(&Value::Float(3.0)));
    }

    #[test]
    fn collects_from_pairs() {
        let row: RowUpdate = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(row.len(), 2);
        assert!(!row.is_empty());
    }
}
