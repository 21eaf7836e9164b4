//! Record reconciliation: overlay a newer record set onto an older one.
//!
//! Independent of rendering. Both sets are tables of JSON values with a
//! column list; rows are joined on a unique key column.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, SheetshotError};

/// A column-aligned table of JSON values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl RecordSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// Position of a column by name.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Build from a list of JSON objects; columns follow first appearance.
    pub fn from_objects(objects: &[serde_json::Map<String, Value>]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for object in objects {
            for key in object.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }
        let rows = objects
            .iter()
            .map(|o| {
                columns
                    .iter()
                    .map(|c| o.get(c).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();
        Self { columns, rows }
    }

    /// Rows as JSON objects keyed by column name.
    pub fn to_objects(&self) -> Vec<serde_json::Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect()
    }

    fn check_shape(&self, which: &str) -> Result<()> {
        for (i, row) in self.rows.iter().enumerate() {
            if row.len() != self.columns.len() {
                return Err(SheetshotError::Reconcile(format!(
                    "{which} row {i} has {} values for {} columns",
                    row.len(),
                    self.columns.len()
                )));
            }
        }
        Ok(())
    }

    /// Index rows by key, rejecting duplicates. Null keys never match.
    fn index_by(&self, key_col: usize, which: &str) -> Result<IndexMap<String, usize>> {
        let mut index = IndexMap::with_capacity(self.rows.len());
        for (i, row) in self.rows.iter().enumerate() {
            let key = match row.get(key_col) {
                Some(Value::Null) | None => continue,
                Some(v) => key_string(v),
            };
            if index.insert(key.clone(), i).is_some() {
                return Err(SheetshotError::Reconcile(format!(
                    "duplicate key {key} in {which} records"
                )));
            }
        }
        Ok(index)
    }
}

/// Overlay `new` onto `old`, joined on column `key`.
///
/// - Keys in both: each old column takes the new value when the new set has
///   that column and the value is not null.
/// - Keys only in old: kept unchanged.
/// - Keys only in new: appended, projected onto the old columns (missing
///   columns become null). Rows with a null key never match and are
///   treated the same way.
///
/// The output has exactly the old column list, in order. Old rows keep
/// their order; new-only rows follow in their own order.
///
/// # Errors
/// Returns [`SheetshotError::Reconcile`] when `key` is missing from either
/// set, a row's width differs from its column list, or a key repeats.
pub fn reconcile(old: &RecordSet, new: &RecordSet, key: &str) -> Result<RecordSet> {
    old.check_shape("old")?;
    new.check_shape("new")?;

    let old_key = old
        .column(key)
        .ok_or_else(|| SheetshotError::Reconcile(format!("old records have no column {key:?}")))?;
    let new_key = new
        .column(key)
        .ok_or_else(|| SheetshotError::Reconcile(format!("new records have no column {key:?}")))?;

    // old column index -> new column index
    let projection: Vec<Option<usize>> = old.columns.iter().map(|c| new.column(c)).collect();

    // duplicate keys in either set are rejected up front
    old.index_by(old_key, "old")?;
    let new_index = new.index_by(new_key, "new")?;

    let mut consumed = vec![false; new.rows.len()];
    let mut rows = Vec::with_capacity(old.rows.len() + new.rows.len());
    let mut updated = 0usize;
    for old_row in &old.rows {
        let matched = old_row
            .get(old_key)
            .filter(|v| !v.is_null())
            .and_then(|v| new_index.get(&key_string(v)).copied());

        match matched.and_then(|i| Some((i, new.rows.get(i)?))) {
            Some((i, new_row)) => {
                if let Some(flag) = consumed.get_mut(i) {
                    *flag = true;
                }
                updated += 1;
                rows.push(overlay(old_row, new_row, &projection));
            }
            None => rows.push(old_row.clone()),
        }
    }

    let mut appended = 0usize;
    for (new_row, _) in new.rows.iter().zip(&consumed).filter(|(_, used)| !**used) {
        appended += 1;
        rows.push(project(new_row, &projection));
    }

    tracing::debug!(
        old = old.rows.len(),
        new = new.rows.len(),
        updated,
        appended,
        "reconciled records"
    );

    Ok(RecordSet {
        columns: old.columns.clone(),
        rows,
    })
}

fn overlay(old_row: &[Value], new_row: &[Value], projection: &[Option<usize>]) -> Vec<Value> {
    old_row
        .iter()
        .zip(projection)
        .map(|(old_value, source)| {
            source
                .and_then(|j| new_row.get(j))
                .filter(|v| !v.is_null())
                .unwrap_or(old_value)
                .clone()
        })
        .collect()
}

fn project(new_row: &[Value], projection: &[Option<usize>]) -> Vec<Value> {
    projection
        .iter()
        .map(|source| {
            source
                .and_then(|j| new_row.get(j))
                .cloned()
                .unwrap_or(Value::Null)
        })
        .collect()
}

/// Join key for a value. JSON text, so `"1"` and `1` stay distinct.
fn key_string(value: &Value) -> String {
    value.to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn set(columns: &[&str], rows: Vec<Vec<Value>>) -> RecordSet {
        RecordSet::new(columns.iter().map(|c| c.to_string()).collect(), rows)
    }

    #[test]
    fn test_null_new_value_keeps_old() {
        let old = set(&["id", "name", "status"], vec![vec![json!(1), json!("Old"), json!("A")]]);
        let new = set(&["id", "name", "status"], vec![vec![json!(1), Value::Null, json!("B")]]);
        let merged = reconcile(&old, &new, "id").unwrap();
        assert_eq!(merged, set(&["id", "name", "status"], vec![vec![json!(1), json!("Old"), json!("B")]]));
    }

    #[test]
    fn test_schema_follows_old() {
        let old = set(&["lead_id", "stage", "owner"], vec![vec![json!("L1"), json!("new"), json!("ana")]]);
        let new = set(
            &["owner", "lead_id", "score"],
            vec![vec![json!("ben"), json!("L1"), json!(9)]],
        );
        let merged = reconcile(&old, &new, "lead_id").unwrap();
        assert_eq!(merged.columns, vec!["lead_id", "stage", "owner"]);
        assert_eq!(merged.rows, vec![vec![json!("L1"), json!("new"), json!("ben")]]);
    }

    #[test]
    fn test_outer_join_keeps_and_appends() {
        let old = set(
            &["id", "v", "only_old"],
            vec![
                vec![json!(1), json!("a"), json!(true)],
                vec![json!(2), json!("b"), json!(false)],
            ],
        );
        let new = set(
            &["id", "v"],
            vec![vec![json!(3), json!("c")], vec![json!(1), json!("a2")]],
        );
        let merged = reconcile(&old, &new, "id").unwrap();
        assert_eq!(
            merged.rows,
            vec![
                vec![json!(1), json!("a2"), json!(true)],
                vec![json!(2), json!("b"), json!(false)],
                vec![json!(3), json!("c"), Value::Null],
            ]
        );
    }

    #[test]
    fn test_missing_key_column() {
        let old = set(&["id"], vec![]);
        let new = set(&["other"], vec![]);
        assert!(matches!(reconcile(&old, &new, "id"), Err(SheetshotError::Reconcile(_))));
        assert!(matches!(reconcile(&new, &old, "id"), Err(SheetshotError::Reconcile(_))));
    }

    #[test]
    fn test_ragged_row_rejected() {
        let old = set(&["id", "x"], vec![vec![json!(1)]]);
        let new = set(&["id", "x"], vec![]);
        assert!(matches!(reconcile(&old, &new, "id"), Err(SheetshotError::Reconcile(_))));
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let old = set(&["id"], vec![vec![json!(1)], vec![json!(1)]]);
        let new = set(&["id"], vec![]);
        assert!(matches!(reconcile(&old, &new, "id"), Err(SheetshotError::Reconcile(_))));
    }

    #[test]
    fn test_null_keys_never_match() {
        let old = set(&["id", "v"], vec![vec![Value::Null, json!("old")]]);
        let new = set(&["id", "v"], vec![vec![Value::Null, json!("new")]]);
        let merged = reconcile(&old, &new, "id").unwrap();
        assert_eq!(
            merged.rows,
            vec![vec![Value::Null, json!("old")], vec![Value::Null, json!("new")]]
        );
    }

    #[test]
    fn test_object_round_trip() {
        let objects: Vec<serde_json::Map<String, Value>> = serde_json::from_value(json!([
            {"id": 1, "name": "a"},
            {"id": 2, "extra": 5}
        ]))
        .unwrap();
        let records = RecordSet::from_objects(&objects);
        assert_eq!(records.columns, vec!["id", "name", "extra"]);
        assert_eq!(records.rows[1], vec![json!(2), Value::Null, json!(5)]);
        assert_eq!(records.to_objects()[0]["name"], json!("a"));
    }
}
