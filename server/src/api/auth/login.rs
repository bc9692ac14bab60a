use crate::api::{ApiError, ErrorResponse, ValidationErrorResponse};
use crate::auth::{create_session, verify_password};
use crate::config::Config;
use crate::db::DbPool;
use crate::get_conn;
use crate::store;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub auth_token: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/token/login",
    tag = "auth",
    request_body(content = LoginRequest, example = json!({"email": "cook@example.com", "password": "password"})),
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid credentials", body = ValidationErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
pub async fn login(
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_conn!(pool);

    let invalid = || {
        ApiError::field(
            "non_field_errors",
            "Unable to log in with provided credentials",
        )
    };

    let user = store::users::find_by_email(&mut conn, &req.email)?.ok_or_else(invalid)?;
    if !verify_password(&req.password, &user.password_hash) {
        return Err(invalid());
    }

    let auth_token = create_session(&mut conn, user.id, config.session_ttl_days)?;
    tracing::info!(user_id = %user.id, "session created");

    Ok((StatusCode::OK, Json(LoginResponse { auth_token })))
}
