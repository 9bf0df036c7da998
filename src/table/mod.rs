// src/table/mod.rs
pub mod axis;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use axis::{axis_value_millis, parse_timestamp_millis};

/// Tag carried in the `type` field of every serialized datatable.
pub const DATATABLE_TYPE: &str = "opensearch_dashboards_datatable";

/// A single row, keyed by column id.
pub type Row = Map<String, Value>;

/// A column descriptor. Row values are looked up by `id`; `name` is for display.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct DatatableColumn {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl DatatableColumn {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            meta: None,
        }
    }
}

/// Tabular result set as produced by the search pipeline.
///
/// `columns[0]` is the x-axis (time) column; rows are expected to be sorted
/// ascending on it.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Datatable {
    #[serde(rename = "type", default = "default_type")]
    pub kind: String,
    #[serde(default)]
    pub columns: Vec<DatatableColumn>,
    #[serde(default)]
    pub rows: Vec<Row>,
}

fn default_type() -> String {
    DATATABLE_TYPE.to_string()
}

impl Datatable {
    pub fn new(columns: Vec<DatatableColumn>, rows: Vec<Row>) -> Self {
        Self {
            kind: default_type(),
            columns,
            rows,
        }
    }

    /// The x-axis column, if the table has any columns at all.
    pub fn x_axis(&self) -> Option<&DatatableColumn> {
        self.columns.first()
    }

    pub fn has_column(&self, id: &str) -> bool {
        self.columns.iter().any(|c| c.id == id)
    }

    /// Append `column` unless a column with the same id is already registered.
    /// Returns `true` if the column was added.
    pub fn push_column(&mut self, column: DatatableColumn) -> bool {
        if self.has_column(&column.id) {
            return false;
        }
        self.columns.push(column);
        true
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_datatable_json() {
        let raw = json!({
            "type": "opensearch_dashboards_datatable",
            "columns": [
                {"id": "col-0-2", "name": "order_date per 30 minutes"},
                {"id": "col-1-1", "name": "Count", "meta": {"type": "count"}}
            ],
            "rows": [
                {"col-0-2": 1_700_000_000_000_i64, "col-1-1": 4},
                {"col-0-2": 1_700_001_800_000_i64, "col-1-1": 7}
            ]
        });

        let table: Datatable = serde_json::from_value(raw).unwrap();
        assert_eq!(table.kind, DATATABLE_TYPE);
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.x_axis().unwrap().id, "col-0-2");
        assert_eq!(table.columns[1].meta, Some(json!({"type": "count"})));
        assert_eq!(table.num_rows(), 2);
    }

    #[test]
    fn missing_fields_default() {
        let table: Datatable = serde_json::from_value(json!({})).unwrap();
        assert_eq!(table.kind, DATATABLE_TYPE);
        assert!(table.columns.is_empty());
        assert!(table.rows.is_empty());
        assert!(table.x_axis().is_none());
    }

    #[test]
    fn push_column_skips_duplicate_ids() {
        let mut table = Datatable::new(vec![DatatableColumn::new("t", "time")], Vec::new());
        assert!(table.push_column(DatatableColumn::new("a", "alert")));
        assert!(!table.push_column(DatatableColumn::new("a", "alert again")));
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.columns[1].name, "alert");
    }

    #[test]
    fn serializes_without_empty_meta() {
        let table = Datatable::new(vec![DatatableColumn::new("t", "time")], Vec::new());
        let out = serde_json::to_value(&table).unwrap();
        assert_eq!(
            out,
            json!({
                "type": "opensearch_dashboards_datatable",
                "columns": [{"id": "t", "name": "time"}],
                "rows": []
            })
        );
    }
}
