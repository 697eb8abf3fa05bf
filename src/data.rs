// Tabular data as delivered by the file preview endpoint

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rectangular text table as handed over by the file preview endpoint.
///
/// Rows are aligned positionally to `headers`, but nothing guarantees they have
/// the same length, so readers look cells up with `row.get(col)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Position of the first header equal to `name`
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// First `n` rows, headers unchanged
    pub fn head(&self, n: usize) -> Self {
        Self {
            headers: self.headers.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Create a Table from JSON.
    ///
    /// Accepts the preview payload `{"headers": [...], "rows": [[...], ...]}` or an
    /// array of flat objects (headers taken from the first object's keys).
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Object(obj) if obj.contains_key("headers") => Self::from_preview(obj),
            Value::Array(array) => Self::from_records(array),
            _ => Err(anyhow!(
                "Input data must be a {{headers, rows}} object or a JSON array of objects"
            )),
        }
    }

    fn from_preview(obj: &serde_json::Map<String, Value>) -> Result<Self> {
        let headers = obj
            .get("headers")
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("'headers' must be an array"))?
            .iter()
            .map(|h| stringify(h, "headers"))
            .collect::<Result<Vec<_>>>()?;

        let rows = match obj.get("rows") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(rows)) => rows
                .iter()
                .enumerate()
                .map(|(idx, row)| {
                    row.as_array()
                        .ok_or_else(|| anyhow!("Row {} is not an array", idx + 1))?
                        .iter()
                        .map(|cell| stringify(cell, "rows"))
                        .collect::<Result<Vec<_>>>()
                })
                .collect::<Result<Vec<_>>>()?,
            Some(_) => return Err(anyhow!("'rows' must be an array of arrays")),
        };

        Ok(Self { headers, rows })
    }

    fn from_records(array: &[Value]) -> Result<Self> {
        let Some(first) = array.first() else {
            return Ok(Self::default());
        };

        let first_obj = first
            .as_object()
            .ok_or_else(|| anyhow!("Items in array must be objects"))?;
        let headers: Vec<String> = first_obj.keys().cloned().collect();

        let mut rows = Vec::with_capacity(array.len());
        for item in array {
            let obj = item
                .as_object()
                .ok_or_else(|| anyhow!("Items in array must be objects"))?;

            let mut row = Vec::with_capacity(headers.len());
            for header in &headers {
                let val = match obj.get(header) {
                    Some(v) => stringify(v, header)?,
                    None => String::new(),
                };
                row.push(val);
            }
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }
}

fn stringify(value: &Value, field: &str) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        _ => Err(anyhow!("Unsupported value type for field '{}'", field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_preview_payload() {
        let v = json!({"headers": ["name", "age"], "rows": [["Alice", "30"], ["Bob", 41]]});
        let t = Table::from_json(&v).unwrap();
        assert_eq!(t.headers, vec!["name", "age"]);
        assert_eq!(t.rows[1], vec!["Bob", "41"]);
    }

    #[test]
    fn test_from_preview_without_rows() {
        let v = json!({"headers": ["a"]});
        let t = Table::from_json(&v).unwrap();
        assert!(t.rows.is_empty());
    }

    #[test]
    fn test_from_records_fills_missing_and_null() {
        let v = json!([{"a": 1, "b": "x"}, {"a": null}]);
        let t = Table::from_json(&v).unwrap();
        assert_eq!(t.headers, vec!["a", "b"]);
        assert_eq!(t.rows[1], vec!["", ""]);
    }

    #[test]
    fn test_rejects_nested_values() {
        let v = json!([{"a": [1, 2]}]);
        assert!(Table::from_json(&v).is_err());
        assert!(Table::from_json(&json!("text")).is_err());
    }

    #[test]
    fn test_column_index_first_match() {
        let t = Table::new(vec!["x".into(), "y".into(), "x".into()], vec![]);
        assert_eq!(t.column_index("x"), Some(0));
        assert_eq!(t.column_index("z"), None);
    }

    #[test]
    fn test_head() {
        let rows = (0..5).map(|i| vec![i.to_string()]).collect();
        let t = Table::new(vec!["n".into()], rows).head(2);
        assert_eq!(t.rows.len(), 2);
    }
}
