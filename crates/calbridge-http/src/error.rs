//! Error-to-response mapping for the HTTP surface.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use calbridge_google::BridgeError;

/// An HTTP error: a status code plus the `{"error": ...}` body message.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// The response the API-key gate returns for a missing or wrong key.
    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<BridgeError> for ApiError {
    fn from(err: BridgeError) -> Self {
        match &err {
            BridgeError::Validation(validation) => {
                Self::new(StatusCode::BAD_REQUEST, validation.to_string())
            }
            BridgeError::Unauthorized(_) => {
                Self::new(StatusCode::UNAUTHORIZED, "Unauthorized - re-run auth")
            }
            _ => Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calbridge_core::EventRequest;

    #[test]
    fn validation_maps_to_400_with_stable_message() {
        let err = EventRequest::new("", "", "").validate().unwrap_err();
        let api_err = ApiError::from(BridgeError::from(err));
        assert_eq!(api_err.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_err.message, "title, startISO, endISO required");
    }

    #[test]
    fn unauthorized_maps_to_rerun_auth() {
        let api_err = ApiError::from(BridgeError::unauthorized("token expired"));
        assert_eq!(api_err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(api_err.message, "Unauthorized - re-run auth");
    }

    #[test]
    fn provider_error_maps_to_500() {
        let api_err = ApiError::from(BridgeError::provider(503, "backend down"));
        assert_eq!(api_err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
