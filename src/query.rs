//! Filter expressions
//!
//! The text after `|` in a locator is a JMESPath expression searched
//! against each enumerated record (`data.State.Name`,
//! `data.Reservations[].Instances[].InstanceId`, `data.Tags[?Key=='env']`).

use serde_json::Value;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("empty expression")]
    Empty,
    #[error("invalid expression {expression:?}: {message}")]
    Invalid { expression: String, message: String },
    #[error("evaluating {expression:?} failed: {message}")]
    Search { expression: String, message: String },
}

/// Compiled filter expression
///
/// Only the validated source is kept; `jmespath::Expression` holds
/// reference counted values and cannot cross threads with the [`Arn`]
/// that owns it.
///
/// [`Arn`]: crate::Arn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    source: String,
}

impl Query {
    pub fn compile(expression: &str) -> Result<Self, QueryError> {
        let source = expression.trim();
        if source.is_empty() {
            return Err(QueryError::Empty);
        }

        jmespath::compile(source).map_err(|e| QueryError::Invalid {
            expression: source.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            source: source.to_string(),
        })
    }

    /// Search one record
    ///
    /// A `null` result drops the record.
    pub fn apply(&self, record: &Value) -> Result<Option<Value>, QueryError> {
        let search_error = |message: String| QueryError::Search {
            expression: self.source.clone(),
            message,
        };

        let expression = jmespath::compile(&self.source).map_err(|e| search_error(e.to_string()))?;
        let found = expression
            .search(record.clone())
            .map_err(|e| search_error(e.to_string()))?;

        if found.is_null() {
            return Ok(None);
        }
        serde_json::to_value(&*found)
            .map(Some)
            .map_err(|e| search_error(e.to_string()))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> Value {
        json!({
            "arn": "arn:aws:ec2:us-east-1:123:instance/i-1",
            "id": "i-1",
            "data": {
                "State": {"Name": "running"},
                "Name": "a==b",
                "Tags": [
                    {"Key": "env", "Value": "prod"},
                    {"Key": "team", "Value": "infra"}
                ]
            }
        })
    }

    fn apply(expression: &str) -> Option<Value> {
        Query::compile(expression).unwrap().apply(&record()).unwrap()
    }

    #[test]
    fn test_projection() {
        assert_eq!(apply("data.State.Name"), Some(json!("running")));
        assert_eq!(apply("data.Tags[1].Value"), Some(json!("infra")));
        assert_eq!(apply("data.Tags[].Key"), Some(json!(["env", "team"])));
    }

    #[test]
    fn test_missing_path_drops_record() {
        assert_eq!(apply("data.Nope"), None);
    }

    #[test]
    fn test_filter_projection() {
        assert_eq!(
            apply("data.Tags[?Key=='env'].Value | [0]"),
            Some(json!("prod"))
        );
    }

    #[test]
    fn test_comparisons_with_operators_inside_literals() {
        assert_eq!(apply("data.Name != 'a==b'"), Some(json!(false)));
        assert_eq!(apply("data.Name == 'a==b'"), Some(json!(true)));
        assert_eq!(apply("data.Name == 'a!=b'"), Some(json!(false)));
    }

    #[test]
    fn test_malformed_expressions() {
        assert_eq!(Query::compile("  "), Err(QueryError::Empty));
        assert!(matches!(
            Query::compile("data..State"),
            Err(QueryError::Invalid { .. })
        ));
        assert!(matches!(
            Query::compile("data[?"),
            Err(QueryError::Invalid { .. })
        ));
    }

    #[test]
    fn test_display_is_trimmed_source() {
        let query = Query::compile(" data.State.Name ").unwrap();
        assert_eq!(query.to_string(), "data.State.Name");
    }
}
