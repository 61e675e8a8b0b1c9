//! Flattening of API records into a table

use bf_core::{Cell, Table};
use indexmap::IndexSet;
use serde_json::Value;

/// Build a table from JSON objects
///
/// Columns are the union of all keys in first-seen order; a record missing
/// a key gets a null cell. Non-object records are skipped.
pub fn records_to_table(records: &[Value]) -> Table {
    let mut columns: IndexSet<&str> = IndexSet::new();
    for record in records {
        if let Value::Object(map) = record {
            columns.extend(map.keys().map(String::as_str));
        }
    }

    let mut table = Table::new(columns.iter().copied());
    for (i, record) in records.iter().enumerate() {
        let Value::Object(map) = record else {
            log::warn!("Skipping API record {}: not a JSON object", i);
            continue;
        };
        table.push_row(
            columns
                .iter()
                .map(|column| map.get(*column).and_then(cell_text))
                .collect(),
        );
    }
    table
}

fn cell_text(value: &Value) -> Cell {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(true) => Some("True".to_string()),
        Value::Bool(false) => Some("False".to_string()),
        Value::Number(n) => Some(n.to_string()),
        nested => Some(nested.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_columns_follow_first_seen_order() {
        let table = records_to_table(&[
            json!({"set_num": "fig-000001", "name": "Toy Store Employee", "num_parts": 4}),
            json!({"set_num": "fig-000002", "set_img_url": "https://img/2.jpg"}),
        ]);
        assert_eq!(
            table.columns(),
            &["set_num", "name", "num_parts", "set_img_url"]
        );
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.rows()[1],
            vec![
                Some("fig-000002".to_string()),
                None,
                None,
                Some("https://img/2.jpg".to_string())
            ]
        );
    }

    #[test]
    fn test_scalar_rendering() {
        let table = records_to_table(&[json!({
            "n": 12,
            "f": 1.5,
            "b": true,
            "z": null,
            "nested": {"a": [1, 2]}
        })]);
        assert_eq!(
            table.rows()[0],
            vec![
                Some("12".to_string()),
                Some("1.5".to_string()),
                Some("True".to_string()),
                None,
                Some(r#"{"a":[1,2]}"#.to_string())
            ]
        );
    }

    #[test]
    fn test_non_objects_are_skipped() {
        let table = records_to_table(&[json!(7), json!({"a": "x"})]);
        assert_eq!(table.columns(), &["a"]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let table = records_to_table(&[]);
        assert!(table.columns().is_empty());
        assert!(table.is_empty());
    }
}
