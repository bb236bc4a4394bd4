//! The uniform response envelope.
//!
//! Every simulated request resolves to one [`Envelope`], success or
//! error. Success envelopes carry `status: 200`, a timestamp, and the
//! payload fields flattened at the top level (`data`, `pagination`,
//! `results`, ...); error envelopes carry the status code and an
//! `error` object with its own timestamp. Envelopes serialize to JSON
//! and deserialize back to the same structure.

use crate::query::ApiError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of the `error` field in an error envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// The uniform success/error wrapper returned for every query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope {
    /// HTTP-style status code (200, 400, 404, 500, 503)
    pub status: u16,
    pub success: bool,
    /// Response time, success envelopes only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Payload fields, flattened to the top level
    #[serde(flatten)]
    pub payload: Map<String, Value>,
    /// Error details, error envelopes only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl Envelope {
    /// Wrap a payload struct into a success envelope.
    ///
    /// The payload must serialize to a JSON object so its fields can be
    /// flattened; anything else is an internal fault.
    pub fn success<T: Serialize>(payload: &T) -> Result<Self, ApiError> {
        let value =
            serde_json::to_value(payload).map_err(|e| ApiError::Internal(e.to_string()))?;
        let payload = match value {
            Value::Object(map) => map,
            other => {
                return Err(ApiError::Internal(format!(
                    "response payload must be a JSON object, got {}",
                    json_type_name(&other)
                )))
            }
        };

        Ok(Self {
            status: 200,
            success: true,
            timestamp: Some(Utc::now()),
            payload,
            error: None,
        })
    }

    /// Turn a query-engine error into an error envelope.
    pub fn failure(error: &ApiError) -> Self {
        Self {
            status: error.status(),
            success: false,
            timestamp: None,
            payload: Map::new(),
            error: Some(ErrorBody {
                message: error.to_string(),
                timestamp: Utc::now(),
            }),
        }
    }

    /// Status line suffix, as shown next to the code.
    pub fn status_text(&self) -> &'static str {
        if self.status == 200 {
            "OK"
        } else {
            "Error"
        }
    }

    /// Pretty-printed JSON rendering of the envelope.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct DemoPayload {
        data: Vec<u64>,
        note: String,
    }

    #[test]
    fn test_success_envelope_shape() {
        let envelope = Envelope::success(&DemoPayload {
            data: vec![1, 2, 3],
            note: "hello".to_string(),
        })
        .unwrap();

        assert_eq!(envelope.status, 200);
        assert!(envelope.success);
        assert!(envelope.timestamp.is_some());
        assert!(envelope.error.is_none());
        assert_eq!(envelope.status_text(), "OK");

        let json: Value = serde_json::from_str(&envelope.to_pretty_json().unwrap()).unwrap();
        assert_eq!(json["status"], 200);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"][2], 3);
        assert_eq!(json["note"], "hello");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_error_envelope_shape() {
        let envelope = Envelope::failure(&ApiError::NotFound("Endpoint not found".to_string()));

        assert_eq!(envelope.status, 404);
        assert!(!envelope.success);
        assert!(envelope.timestamp.is_none());
        assert_eq!(envelope.status_text(), "Error");

        let json: Value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["error"]["message"], "Endpoint not found");
        assert!(json["error"]["timestamp"].is_string());
        assert!(json.get("timestamp").is_none());
    }

    #[test]
    fn test_envelope_round_trip() {
        let success = Envelope::success(&DemoPayload {
            data: vec![7],
            note: "round trip".to_string(),
        })
        .unwrap();
        let decoded: Envelope =
            serde_json::from_str(&serde_json::to_string(&success).unwrap()).unwrap();
        assert_eq!(decoded, success);

        let failure = Envelope::failure(&ApiError::ServiceUnavailable);
        let decoded: Envelope =
            serde_json::from_str(&serde_json::to_string(&failure).unwrap()).unwrap();
        assert_eq!(decoded, failure);
        assert_eq!(decoded.status, 503);
    }

    #[test]
    fn test_non_object_payload_is_internal_error() {
        let err = Envelope::success(&vec![1, 2, 3]).unwrap_err();
        assert_eq!(err.status(), 500);
    }
}
