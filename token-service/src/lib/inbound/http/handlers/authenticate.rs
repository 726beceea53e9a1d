use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::session::models::AuthenticatedUser;
use crate::domain::session::models::Credentials;
use crate::domain::session::ports::AuthenticationServicePort;
use crate::inbound::http::router::AppState;

pub async fn authenticate<S: AuthenticationServicePort>(
    State(state): State<AppState<S>>,
    body: Result<Json<AuthenticateRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<AuthenticateResponseData>, ApiError> {
    let Json(body) = body?;

    let credentials = Credentials::new(body.email, body.password).map_err(|e| {
        tracing::debug!(error = %e, "Invalid credentials payload");
        ApiError::BadRequest
    })?;

    let authenticated = state.auth_service.authenticate(credentials).await?;

    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        AuthenticateResponseData::from(authenticated),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthenticateRequestBody {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticateResponseData {
    pub user_id: i64,
    pub role: String,
    pub name: String,
    pub email: String,
    pub token: String,
    pub refresh_token: String,
}

impl From<AuthenticatedUser> for AuthenticateResponseData {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            user_id: user.user_id.0,
            role: user.role,
            name: user.name,
            email: user.email,
            token: user.access_token,
            refresh_token: user.refresh_token.to_string(),
        }
    }
}
