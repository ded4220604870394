//! Validation of the `/recommend` request body.
//!
//! The body is read as loose JSON and checked by hand so every bad field
//! turns into a 400 with a message naming it.

use data_access::StudentId;
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::orchestrator::DEFAULT_LIMIT;

/// A validated recommendation request.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendRequest {
    pub student_id: StudentId,
    pub interests: Vec<String>,
    pub limit: usize,
}

impl RecommendRequest {
    /// Parse raw request bytes.
    pub fn from_slice(body: &[u8]) -> Result<Self, ApiError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| ApiError::Validation(format!("request body is not valid JSON: {e}")))?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self, ApiError> {
        let body = value
            .as_object()
            .ok_or_else(|| ApiError::Validation("request body must be a JSON object".into()))?;

        Ok(Self {
            student_id: parse_student_id(body)?,
            interests: parse_interests(body)?,
            limit: parse_limit(body)?,
        })
    }
}

fn present<'a>(body: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    body.get(key).filter(|v| !v.is_null())
}

/// Integers, integral floats and integer strings.
fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_student_id(body: &Map<String, Value>) -> Result<StudentId, ApiError> {
    let raw = present(body, "student_id")
        .ok_or_else(|| ApiError::Validation("student_id is required in request body".into()))?;
    as_integer(raw)
        .ok_or_else(|| ApiError::Validation(format!("student_id must be an integer, got {raw}")))
}

fn parse_interests(body: &Map<String, Value>) -> Result<Vec<String>, ApiError> {
    let Some(raw) = present(body, "interests") else {
        return Ok(Vec::new());
    };
    let items = raw
        .as_array()
        .ok_or_else(|| ApiError::Validation("interests must be a list of strings".into()))?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| ApiError::Validation(format!("interest must be a string, got {item}")))
        })
        .collect()
}

fn parse_limit(body: &Map<String, Value>) -> Result<usize, ApiError> {
    let Some(raw) = present(body, "limit") else {
        return Ok(DEFAULT_LIMIT);
    };
    as_integer(raw)
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| ApiError::Validation(format!("limit must be a non-negative integer, got {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Result<RecommendRequest, ApiError> {
        RecommendRequest::from_value(&value)
    }

    #[test]
    fn test_minimal_request_uses_defaults() {
        let request = parse(json!({"student_id": 42})).unwrap();
        assert_eq!(
            request,
            RecommendRequest {
                student_id: 42,
                interests: vec![],
                limit: 5,
            }
        );
    }

    #[test]
    fn test_full_request() {
        let request = parse(json!({"student_id": "42", "interests": ["ai", "ml"], "limit": 2})).unwrap();
        assert_eq!(request.student_id, 42);
        assert_eq!(request.interests, vec!["ai", "ml"]);
        assert_eq!(request.limit, 2);
    }

    #[test]
    fn test_null_fields_fall_back() {
        let request = parse(json!({"student_id": 7.0, "interests": null, "limit": null})).unwrap();
        assert_eq!(request.student_id, 7);
        assert!(request.interests.is_empty());
        assert_eq!(request.limit, 5);
    }

    #[test]
    fn test_limit_zero_is_allowed() {
        assert_eq!(parse(json!({"student_id": 1, "limit": 0})).unwrap().limit, 0);
    }

    #[test]
    fn test_missing_student_id() {
        let err = parse(json!({"interests": ["ai"]})).unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref m) if m.contains("student_id is required")));

        let err = parse(json!({"student_id": null})).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_malformed_fields() {
        assert!(parse(json!({"student_id": "abc"})).is_err());
        assert!(parse(json!({"student_id": 4.5})).is_err());
        assert!(parse(json!({"student_id": true})).is_err());
        assert!(parse(json!({"student_id": 1, "interests": "ai"})).is_err());
        assert!(parse(json!({"student_id": 1, "interests": ["ai", 3]})).is_err());
        assert!(parse(json!({"student_id": 1, "limit": -1})).is_err());
        assert!(parse(json!({"student_id": 1, "limit": "many"})).is_err());
        assert!(parse(json!([1, 2])).is_err());
    }

    #[test]
    fn test_invalid_json_bytes() {
        let err = RecommendRequest::from_slice(b"{not json").unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
