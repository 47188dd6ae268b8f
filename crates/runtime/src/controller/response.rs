//! Uniform response envelope returned by every controller operation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response<T = Value> {
    pub success: bool,
    pub message: String,
    /// Payload on success; always `null` on failure.
    pub data: Option<T>,
}

impl<T> Response<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Success without a payload.
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_shape() {
        let ok = Response::ok("好", json!({ "id": 1 }));
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({ "success": true, "message": "好", "data": { "id": 1 } })
        );

        let fail: Response = Response::fail("坏");
        assert_eq!(
            serde_json::to_value(&fail).unwrap(),
            json!({ "success": false, "message": "坏", "data": null })
        );
    }
}
