use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::error::DbErr;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

fn current_request_id() -> Option<String> {
    crate::tracing::current_request_id().map(|rid| rid.as_str().to_string())
}

/// JSON error body.
///
/// Client errors carry `error`, credential failures carry `message`, and
/// server failures carry `error` plus `details`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "Menu item with ID 7 not found")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    ValidationError(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Hash error: {0}")]
    HashError(String),

    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        ServiceError::ValidationError(rejection.body_text())
    }
}

impl ServiceError {
    pub fn order_not_found() -> Self {
        ServiceError::NotFound("Order not found".to_string())
    }

    pub fn menu_item_not_found(id: i32) -> Self {
        ServiceError::NotFound(format!("Menu item with ID {} not found", id))
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unauthorized(_) | Self::JwtError(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::DatabaseError(_)
            | Self::HashError(_)
            | Self::InternalError(_)
            | Self::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Internal errors return generic messages to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Database error".to_string(),
            Self::HashError(_) | Self::InternalError(_) | Self::Other(_) => {
                "Internal server error".to_string()
            }
            Self::JwtError(_) => "Invalid or expired token".to_string(),
            _ => self.to_string(),
        }
    }

    fn to_body(&self) -> ErrorResponse {
        let message = self.response_message();
        let mut body = ErrorResponse {
            error: None,
            message: None,
            details: None,
            request_id: current_request_id(),
        };
        match self.status_code() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => body.message = Some(message),
            status if status.is_server_error() => {
                body.error = Some("Failed to process request".to_string());
                body.details = Some(message);
            }
            _ => body.error = Some(message),
        }
        body
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(self.to_body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use rstest::rstest;

    async fn body_of(response: Response) -> ErrorResponse {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn service_error_response_includes_request_id() {
        let response =
            crate::tracing::scope_request_id(crate::tracing::RequestId::new("req-123"), async {
                ServiceError::order_not_found().into_response()
            })
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let payload = body_of(response).await;
        assert_eq!(payload.error.as_deref(), Some("Order not found"));
        assert_eq!(payload.request_id.as_deref(), Some("req-123"));
    }

    #[tokio::test]
    async fn credential_errors_use_message_field() {
        let payload =
            body_of(ServiceError::Unauthorized("Invalid credentials".into()).into_response()).await;
        assert_eq!(payload.message.as_deref(), Some("Invalid credentials"));
        assert!(payload.error.is_none());
    }

    #[tokio::test]
    async fn server_errors_carry_generic_details() {
        let response = ServiceError::DatabaseError(DbErr::Custom("disk on fire".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let payload = body_of(response).await;
        assert_eq!(payload.error.as_deref(), Some("Failed to process request"));
        assert_eq!(payload.details.as_deref(), Some("Database error"));
    }

    #[rstest]
    #[case(ServiceError::menu_item_not_found(7), StatusCode::NOT_FOUND)]
    #[case(ServiceError::ValidationError("x".into()), StatusCode::BAD_REQUEST)]
    #[case(ServiceError::Conflict("x".into()), StatusCode::CONFLICT)]
    #[case(ServiceError::JwtError("x".into()), StatusCode::UNAUTHORIZED)]
    #[case(ServiceError::Forbidden("x".into()), StatusCode::FORBIDDEN)]
    #[case(ServiceError::InternalError("x".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    fn service_error_status_code_mapping(#[case] err: ServiceError, #[case] expected: StatusCode) {
        assert_eq!(err.status_code(), expected);
    }

    #[test]
    fn response_message_hides_internal_details() {
        assert_eq!(
            ServiceError::HashError("salt mismatch".into()).response_message(),
            "Internal server error"
        );
        assert_eq!(
            ServiceError::menu_item_not_found(7).response_message(),
            "Menu item with ID 7 not found"
        );
    }
}
