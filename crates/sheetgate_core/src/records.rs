//! Shape raw rows into header-keyed records.
use serde_json::{Map, Number, Value};

/// A data row keyed by header name, in header order.
pub type Record = Map<String, Value>;

/// Convert every data row (all rows after the header) into a record.
///
/// Short rows are padded with empty strings, cells beyond the header width
/// are dropped. When a header name repeats, the right-most cell wins.
pub fn rows_to_records(rows: &[Vec<String>]) -> Vec<Record> {
    let Some((header, data)) = rows.split_first() else {
        return Vec::new();
    };
    data.iter().map(|row| to_record(header, row)).collect()
}

fn to_record(header: &[String], row: &[String]) -> Record {
    header
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let cell = row.get(idx).map(String::as_str).unwrap_or("");
            (name.clone(), numericise(cell))
        })
        .collect()
}

/// Interpret a cell as a number when it parses as one.
///
/// Integers first, then finite floats. Everything else, including the empty
/// string, stays a string.
pub fn numericise(cell: &str) -> Value {
    if let Ok(i) = cell.parse::<i64>() {
        return Value::Number(i.into());
    }
    if let Ok(f) = cell.parse::<f64>() {
        if let Some(n) = Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    Value::String(cell.to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn rows(vals: &[&[&str]]) -> Vec<Vec<String>> {
        vals.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn empty_table() {
        assert!(rows_to_records(&[]).is_empty());
        assert!(rows_to_records(&rows(&[&["Nom"]])).is_empty());
    }

    #[test]
    fn keyed_in_header_order() {
        let records = rows_to_records(&rows(&[&["Nom", "Age"], &["Alice", "31"]]));
        assert_eq!(1, records.len());
        let keys: Vec<_> = records[0].keys().cloned().collect();
        assert_eq!(vec!["Nom", "Age"], keys);
        assert_eq!(json!({"Nom": "Alice", "Age": 31}), Value::Object(records[0].clone()));
    }

    #[test]
    fn pads_and_truncates() {
        let records = rows_to_records(&rows(&[&["A", "B"], &["1"], &["x", "y", "z"]]));
        assert_eq!(json!({"A": 1, "B": ""}), Value::Object(records[0].clone()));
        assert_eq!(json!({"A": "x", "B": "y"}), Value::Object(records[1].clone()));
    }

    #[test]
    fn numbers() {
        assert_eq!(json!(42), numericise("42"));
        assert_eq!(json!(-3), numericise("-3"));
        assert_eq!(json!(2.5), numericise("2.5"));
        assert_eq!(json!(""), numericise(""));
        assert_eq!(json!("NaN"), numericise("NaN"));
        assert_eq!(json!("inf"), numericise("inf"));
        assert_eq!(json!("12 rue"), numericise("12 rue"));
    }
}
