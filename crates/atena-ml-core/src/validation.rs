//! Boundary validation for incoming JSON payloads.
//!
//! Payloads are checked for presence of required fields first, so the caller
//! gets one message naming every missing field, and only then decoded into
//! typed records.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{CoreError, TrainingError, ValidationError};
use crate::session::{SessionRecord, UserContext};

/// Fields a full-service recommendation request must carry.
pub const RECOMMEND_REQUIRED_FIELDS: [&str; 5] = [
    "time_of_day",
    "day_of_week",
    "subject",
    "difficulty",
    "energy_level",
];

/// Fields a feedback submission must carry.
pub const FEEDBACK_REQUIRED_FIELDS: [&str; 9] = [
    "time_of_day",
    "day_of_week",
    "subject",
    "difficulty",
    "energy_level",
    "focus_score",
    "session_length",
    "break_length",
    "effectiveness",
];

/// Parse raw bytes as JSON.
///
/// Empty bodies and `null` both count as "no data".
pub fn parse_body(bytes: &[u8]) -> Result<Value, ValidationError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ValidationError::NoData);
    }
    let value: Value = serde_json::from_slice(bytes).map_err(|_| ValidationError::InvalidJson)?;
    if value.is_null() {
        return Err(ValidationError::NoData);
    }
    Ok(value)
}

/// Reject empty payloads (`{}`, `[]`, `""`) and pass anything else through.
pub fn require_data(value: &Value) -> Result<&Value, ValidationError> {
    let empty = match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(text) => text.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    };
    if empty {
        Err(ValidationError::NoData)
    } else {
        Ok(value)
    }
}

/// Require a non-empty JSON object.
pub fn require_object(value: &Value) -> Result<&Map<String, Value>, ValidationError> {
    match value {
        Value::Null => Err(ValidationError::NoData),
        Value::Object(map) if map.is_empty() => Err(ValidationError::NoData),
        Value::Object(map) => Ok(map),
        _ => Err(ValidationError::InvalidShape(
            "Expected a JSON object".to_string(),
        )),
    }
}

/// Names of `required` fields absent from `object`, in `required` order.
pub fn missing_fields(object: &Map<String, Value>, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|field| !object.contains_key(**field))
        .map(|field| field.to_string())
        .collect()
}

/// Require every field in `required` to be present.
pub fn require_fields<'a>(
    value: &'a Value,
    required: &[&str],
) -> Result<&'a Map<String, Value>, ValidationError> {
    let object = require_object(value)?;
    let missing = missing_fields(object, required);
    if missing.is_empty() {
        Ok(object)
    } else {
        Err(ValidationError::MissingFields(missing))
    }
}

fn decode<T: DeserializeOwned>(value: &Value) -> Result<T, ValidationError> {
    serde_json::from_value(value.clone()).map_err(|e| ValidationError::Malformed(e.to_string()))
}

/// Validate and decode a full-service recommendation request.
pub fn parse_user_context(value: &Value) -> Result<UserContext, ValidationError> {
    require_fields(value, &RECOMMEND_REQUIRED_FIELDS)?;
    decode(value)
}

/// Decode a context object where every field is optional.
pub fn parse_partial_context(value: &Value) -> Result<UserContext, ValidationError> {
    match value {
        Value::Null => Ok(UserContext::default()),
        Value::Object(_) => decode(value),
        _ => Err(ValidationError::InvalidShape(
            "Expected 'context' to be a JSON object".to_string(),
        )),
    }
}

/// Validate and decode a feedback submission.
pub fn parse_session_record(value: &Value) -> Result<SessionRecord, ValidationError> {
    require_fields(value, &FEEDBACK_REQUIRED_FIELDS)?;
    decode(value)
}

/// Decode a retraining batch.
///
/// A non-array or empty array is a validation failure; an element that is
/// not a complete session record is a training failure, since the batch
/// shape was right but its content cannot be fitted.
pub fn decode_training_batch(value: &Value) -> Result<Vec<SessionRecord>, CoreError> {
    let items = match value {
        Value::Array(items) if !items.is_empty() => items,
        _ => {
            return Err(ValidationError::InvalidShape(
                "Expected a list of session records".to_string(),
            )
            .into())
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<SessionRecord>(item.clone()).map_err(|e| {
                CoreError::from(TrainingError::InvalidRecord {
                    index,
                    message: e.to_string(),
                })
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_record() -> Value {
        json!({
            "time_of_day": 14,
            "day_of_week": 3,
            "subject": "history",
            "difficulty": 2,
            "energy_level": 3,
            "focus_score": 3,
            "session_length": 25,
            "break_length": 5,
            "effectiveness": 0.75
        })
    }

    #[test]
    fn parse_body_distinguishes_empty_and_invalid() {
        assert_eq!(parse_body(b""), Err(ValidationError::NoData));
        assert_eq!(parse_body(b"  \n"), Err(ValidationError::NoData));
        assert_eq!(parse_body(b"null"), Err(ValidationError::NoData));
        assert_eq!(parse_body(b"{oops"), Err(ValidationError::InvalidJson));
        assert_eq!(parse_body(br#"{"a": 1}"#).unwrap()["a"], 1);
    }

    #[test]
    fn require_data_rejects_only_empty_payloads() {
        for empty in [json!({}), json!([]), json!(""), Value::Null] {
            assert_eq!(require_data(&empty), Err(ValidationError::NoData));
        }
        let partial = json!({"subject": "math"});
        assert_eq!(require_data(&partial), Ok(&partial));
        assert!(require_data(&json!([1])).is_ok());
    }

    #[test]
    fn missing_fields_are_listed_in_required_order() {
        let value = json!({"subject": "math", "difficulty": 3});
        let err = parse_user_context(&value).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingFields(vec![
                "time_of_day".into(),
                "day_of_week".into(),
                "energy_level".into(),
            ])
        );
    }

    #[test]
    fn empty_object_is_no_data() {
        assert_eq!(parse_user_context(&json!({})), Err(ValidationError::NoData));
    }

    #[test]
    fn wrong_field_type_is_malformed() {
        let value = json!({
            "time_of_day": 9,
            "day_of_week": 1,
            "subject": "math",
            "difficulty": "hard",
            "energy_level": 4
        });
        assert!(matches!(
            parse_user_context(&value),
            Err(ValidationError::Malformed(_))
        ));
    }

    #[test]
    fn feedback_requires_focus_score() {
        let mut value = full_record();
        value.as_object_mut().unwrap().remove("focus_score");
        assert_eq!(
            parse_session_record(&value),
            Err(ValidationError::MissingFields(vec!["focus_score".into()]))
        );
        assert!(parse_session_record(&full_record()).is_ok());
    }

    #[test]
    fn partial_context_accepts_absent_and_empty() {
        assert_eq!(
            parse_partial_context(&Value::Null).unwrap(),
            UserContext::default()
        );
        let ctx = parse_partial_context(&json!({"difficulty": 4})).unwrap();
        assert_eq!(ctx.difficulty, Some(4));
        assert!(parse_partial_context(&json!([1, 2])).is_err());
    }

    #[test]
    fn training_batch_rejects_non_lists() {
        for value in [json!({"a": 1}), json!([]), json!("x")] {
            assert!(matches!(
                decode_training_batch(&value),
                Err(CoreError::Validation(ValidationError::InvalidShape(_)))
            ));
        }
    }

    #[test]
    fn training_batch_reports_bad_record_index() {
        let mut bad = full_record();
        bad.as_object_mut().unwrap().remove("effectiveness");
        let value = Value::Array(vec![full_record(), bad]);

        match decode_training_batch(&value) {
            Err(CoreError::Training(TrainingError::InvalidRecord { index, message })) => {
                assert_eq!(index, 1);
                assert!(message.contains("effectiveness"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
