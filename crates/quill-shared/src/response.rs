//! Response envelopes: a success wrapper and RFC 7807 error bodies.

use serde::{Deserialize, Serialize};

/// Success envelope for operations that return a confirmation message
/// alongside their data (e.g. post deletion).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }
}

/// Problem Details error body (RFC 7807).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// URI identifying the problem type; `about:blank` for plain HTTP errors.
    #[serde(rename = "type")]
    pub error_type: String,

    /// Short summary of the problem type.
    pub title: String,

    /// HTTP status code, repeated in the body.
    pub status: u16,

    /// Explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: u16, title: impl Into<String>) -> Self {
        Self {
            error_type: "about:blank".to_string(),
            title: title.into(),
            status,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(400, "Bad Request").with_detail(detail)
    }

    pub fn unauthorized() -> Self {
        Self::new(401, "Unauthorized")
    }

    pub fn forbidden() -> Self {
        Self::new(403, "Forbidden")
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(404, "Not Found").with_detail(detail)
    }

    pub fn internal_error() -> Self {
        Self::new(500, "Internal Server Error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_skips_empty_detail() {
        let json = serde_json::to_value(ErrorResponse::unauthorized()).unwrap();

        assert_eq!(json["type"], "about:blank");
        assert_eq!(json["status"], 401);
        assert!(json.get("detail").is_none());
    }

    #[test]
    fn error_body_carries_detail() {
        let json =
            serde_json::to_value(ErrorResponse::bad_request("Username already exists")).unwrap();

        assert_eq!(json["status"], 400);
        assert_eq!(json["detail"], "Username already exists");
    }

    #[test]
    fn success_envelope_skips_empty_message() {
        let json = serde_json::to_value(ApiResponse::ok(1)).unwrap();

        assert_eq!(json["success"], true);
        assert!(json.get("message").is_none());
    }
}
