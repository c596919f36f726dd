//! The uniform response envelope.

use serde::{Deserialize, Serialize};

/// `{success: true, data}` on success, `{success: false, error, message}` on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Machine-readable failure reason, e.g. `not-found`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }
    }
}

impl ApiResponse<()> {
    /// Success with no payload, e.g. after a delete.
    pub fn done() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
            message: None,
        }
    }

    pub fn failure(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_omits_error_fields() {
        let body = serde_json::to_value(ApiResponse::ok(json!({ "id": "1" }))).unwrap();
        assert_eq!(body, json!({ "success": true, "data": { "id": "1" } }));
    }

    #[test]
    fn done_is_a_bare_success() {
        let body = serde_json::to_value(ApiResponse::done()).unwrap();
        assert_eq!(body, json!({ "success": true }));
    }

    #[test]
    fn failure_carries_reason_and_message() {
        let body =
            serde_json::to_value(ApiResponse::failure("unauthorized", "Unauthorized access"))
                .unwrap();
        assert_eq!(
            body,
            json!({ "success": false, "error": "unauthorized", "message": "Unauthorized access" })
        );
    }
}
