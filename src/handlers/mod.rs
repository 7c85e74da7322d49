//! HTTP handlers: parse and validate, call the service, wrap the result.

pub mod catalog;
pub mod cats;
pub mod users;

use crate::error::AppError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

pub(crate) fn parse_id(id_str: &str) -> Result<i64, AppError> {
    match id_str.trim().parse::<i64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(AppError::BadRequest(format!("invalid id: {}", id_str))),
    }
}

pub(crate) fn body_to_map(value: Value) -> Result<Map<String, Value>, AppError> {
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

/// Typed view of an already validated body.
pub(crate) fn decode<T: DeserializeOwned>(body: Map<String, Value>) -> Result<T, AppError> {
    serde_json::from_value(Value::Object(body)).map_err(|e| AppError::Validation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ids_must_be_positive_integers() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("0"), Err(AppError::BadRequest(_))));
        assert!(matches!(parse_id("abc"), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn body_must_be_object() {
        assert!(body_to_map(json!([1, 2])).is_err());
        assert!(body_to_map(json!({})).unwrap().is_empty());
    }

    #[test]
    fn decode_reports_type_mismatch_as_validation() {
        let body = body_to_map(json!({ "category_name": 5 })).unwrap();
        let err = decode::<crate::models::NewCategory>(body).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
