//! Error responses
//!
//! Every failure leaves the server as `{success: false, message}` with a
//! user-safe message; driver details only go to the log.

use crate::domain::ClassrollError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

/// Body of every non-file response that carries a message
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Handler error, rendered as a status code plus [`MessageResponse`]
#[derive(Debug)]
pub struct ApiError(pub ClassrollError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ClassrollError::Validation(_) => StatusCode::BAD_REQUEST,
            ClassrollError::Forbidden(_) => StatusCode::FORBIDDEN,
            ClassrollError::SourceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ClassrollError> for ApiError {
    fn from(err: ClassrollError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            crate::log_error_with_context!(&self.0, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self.0, "Request rejected");
        }
        (status, Json(MessageResponse::failure(self.0.user_message()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Store;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ClassrollError::Validation("bad date".into()), StatusCode::BAD_REQUEST),
            (ClassrollError::Forbidden("student".into()), StatusCode::FORBIDDEN),
            (
                ClassrollError::source_unavailable(Store::Teacher, "refused"),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (ClassrollError::Io("disk".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).status(), status);
        }
    }

    #[test]
    fn test_response_status() {
        let response = ApiError(ClassrollError::Forbidden("x".into())).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
