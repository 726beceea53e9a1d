use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::session::models::RefreshToken;
use crate::domain::session::ports::AuthenticationServicePort;
use crate::inbound::http::router::AppState;

pub async fn refresh<S: AuthenticationServicePort>(
    State(state): State<AppState<S>>,
    body: Result<Json<RefreshRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<RefreshResponseData>, ApiError> {
    let Json(body) = body?;

    let refresh_token = RefreshToken::parse(&body.refresh_token).map_err(|e| {
        tracing::debug!(error = %e, "Invalid refresh token payload");
        ApiError::BadRequest
    })?;

    let token = state.auth_service.refresh(&refresh_token).await?;

    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        RefreshResponseData { token },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RefreshRequestBody {
    refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshResponseData {
    pub token: String,
}
