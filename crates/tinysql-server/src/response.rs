//! JSON response envelope encoding.
//!
//! Hand-rolled rather than derived: success-with-rows,
//! success-without-rows, and error responses have different field
//! sets, so a single `#[derive(Serialize)]` enum would need to fake a
//! uniform shape.

use serde_json::{json, Value as Json};

use tinysql_core::{EngineError, ExecOutcome, Value};

/// Encodes a successful [`ExecOutcome`] into its wire JSON form.
#[must_use]
pub fn encode_outcome(outcome: &ExecOutcome) -> Json {
    match outcome {
        ExecOutcome::Ok => json!({ "status": "ok" }),
        ExecOutcome::Rows { column_names, rows } => {
            let rows: Vec<Json> = rows
                .iter()
                .map(|row| Json::Array(row.iter().map(encode_value).collect()))
                .collect();
            let mut body = json!({ "status": "ok", "rows": rows });
            if let Some(names) = column_names {
                body["column_names"] = json!(names);
            }
            body
        }
    }
}

/// Encodes an [`EngineError`] into its wire JSON form.
#[must_use]
pub fn encode_error(err: &EngineError) -> Json {
    json!({ "status": "error", "error_type": err.error_type() })
}

fn encode_value(value: &Value) -> Json {
    match value {
        Value::Integer(n) => json!(n),
        Value::Boolean(true) => Json::String("TRUE".to_string()),
        Value::Boolean(false) => Json::String("FALSE".to_string()),
        Value::Null => Json::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_with_no_rows_has_only_status() {
        let body = encode_outcome(&ExecOutcome::Ok);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[test]
    fn rows_with_column_names_are_encoded() {
        let outcome = ExecOutcome::Rows {
            column_names: Some(vec!["a".to_string(), "b".to_string()]),
            rows: vec![vec![Value::Integer(1), Value::Boolean(true)]],
        };
        let body = encode_outcome(&outcome);
        assert_eq!(
            body,
            json!({
                "status": "ok",
                "rows": [[1, "TRUE"]],
                "column_names": ["a", "b"],
            })
        );
    }

    #[test]
    fn rows_without_column_names_omit_the_field() {
        let outcome = ExecOutcome::Rows {
            column_names: None,
            rows: vec![vec![Value::Integer(2)]],
        };
        let body = encode_outcome(&outcome);
        assert_eq!(body, json!({ "status": "ok", "rows": [[2]] }));
    }

    #[test]
    fn null_value_encodes_as_json_null() {
        let outcome = ExecOutcome::Rows {
            column_names: None,
            rows: vec![vec![Value::Null]],
        };
        let body = encode_outcome(&outcome);
        assert_eq!(body, json!({ "status": "ok", "rows": [[null]] }));
    }

    #[test]
    fn error_encodes_its_wire_type() {
        let body = encode_error(&EngineError::DivisionByZero);
        assert_eq!(
            body,
            json!({ "status": "error", "error_type": "division_by_zero_error" })
        );
    }
}
