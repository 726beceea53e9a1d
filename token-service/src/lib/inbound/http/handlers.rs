use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::session::errors::AuthenticationError;

pub mod authenticate;
pub mod refresh;

const INVALID_FORMAT: &str = "invalid format";
const NO_MATCH: &str = "no match";
const INTERNAL_ERROR: &str = "internal error";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Outward error. Messages are fixed strings; adapter detail stays in the logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest,
    NotFound,
    InternalServerError,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest => (StatusCode::BAD_REQUEST, INVALID_FORMAT),
            ApiError::NotFound => (StatusCode::NOT_FOUND, NO_MATCH),
            ApiError::InternalServerError => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR),
        };

        (
            status,
            Json(ApiResponseBody::new_error(status, message.to_string())),
        )
            .into_response()
    }
}

impl From<AuthenticationError> for ApiError {
    fn from(err: AuthenticationError) -> Self {
        match err {
            AuthenticationError::CredentialsRejected => ApiError::NotFound,
            AuthenticationError::CredentialStore(_)
            | AuthenticationError::PasswordVerifier(_)
            | AuthenticationError::TokenSigning(_)
            | AuthenticationError::RefreshTokenStore(_) => {
                tracing::error!(error = %err, "Dependency failure");
                ApiError::InternalServerError
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected request body");
        ApiError::BadRequest
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::errors::CredentialStoreError;
    use crate::session::errors::RefreshTokenStoreError;

    #[test]
    fn test_rejection_maps_to_not_found() {
        assert_eq!(
            ApiError::from(AuthenticationError::CredentialsRejected),
            ApiError::NotFound
        );
    }

    #[test]
    fn test_faults_map_to_internal_error() {
        let faults = [
            AuthenticationError::CredentialStore(CredentialStoreError::DatabaseError(
                "connection refused".to_string(),
            )),
            AuthenticationError::PasswordVerifier("malformed hash".to_string()),
            AuthenticationError::RefreshTokenStore(RefreshTokenStoreError::Collision),
        ];

        for fault in faults {
            assert_eq!(ApiError::from(fault), ApiError::InternalServerError);
        }
    }

    #[test]
    fn test_error_body_shape() {
        let body = ApiResponseBody::new_error(StatusCode::NOT_FOUND, NO_MATCH.to_string());
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "status_code": 404, "data": { "message": "no match" } })
        );
    }
}
