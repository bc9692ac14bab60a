use crate::api::{ApiError, ValidationErrorResponse};
use crate::auth::hash_password;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{NewUser, ROLE_USER};
use crate::schema::users;
use crate::store::unique_violation;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use ladle_core::validation::{validate_signup, SignupDraft};
use ladle_core::FieldErrors;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// Every field is required; missing ones are reported per field.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateUserResponse {
    pub email: String,
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User registered", body = CreateUserResponse),
        (status = 400, description = "Invalid or duplicate fields", body = ValidationErrorResponse)
    )
)]
pub async fn create_user(
    State(pool): State<Arc<DbPool>>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;

    let mut missing = FieldErrors::new();
    for (field, value) in [
        ("email", &req.email),
        ("username", &req.username),
        ("first_name", &req.first_name),
        ("last_name", &req.last_name),
        ("password", &req.password),
    ] {
        if value.is_none() {
            missing.add(field, "This field is required");
        }
    }
    missing.into_result()?;

    let draft = SignupDraft {
        email: req.email.as_deref().unwrap_or_default(),
        username: req.username.as_deref().unwrap_or_default(),
        first_name: req.first_name.as_deref().unwrap_or_default(),
        last_name: req.last_name.as_deref().unwrap_or_default(),
        password: req.password.as_deref().unwrap_or_default(),
    };
    validate_signup(&draft)?;

    let email = draft.email.trim().to_lowercase();
    let password_hash = hash_password(draft.password).map_err(|e| {
        tracing::error!("Failed to hash password: {}", e);
        ApiError::Internal
    })?;

    let mut conn = get_conn!(pool);

    let mut duplicates = FieldErrors::new();
    let email_taken: bool = diesel::select(diesel::dsl::exists(
        users::table.filter(users::email.eq(&email)),
    ))
    .get_result(&mut conn)?;
    if email_taken {
        duplicates.add("email", "A user with that email already exists");
    }
    let username_taken: bool = diesel::select(diesel::dsl::exists(
        users::table.filter(users::username.eq(draft.username)),
    ))
    .get_result(&mut conn)?;
    if username_taken {
        duplicates.add("username", "A user with that username already exists");
    }
    duplicates.into_result()?;

    let inserted = diesel::insert_into(users::table)
        .values(NewUser {
            email: &email,
            username: draft.username,
            first_name: draft.first_name.trim(),
            last_name: draft.last_name.trim(),
            password_hash: &password_hash,
            role: ROLE_USER,
        })
        .returning(users::id)
        .get_result::<Uuid>(&mut conn);

    let id = match inserted {
        Ok(id) => id,
        Err(e) => {
            let constraint = unique_violation(&e).map(str::to_owned);
            return Err(match constraint.as_deref() {
                Some("users_email_key") => {
                    ApiError::field("email", "A user with that email already exists")
                }
                Some("users_username_key") => {
                    ApiError::field("username", "A user with that username already exists")
                }
                _ => e.into(),
            });
        }
    };

    tracing::info!(user_id = %id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            email,
            id,
            username: draft.username.to_string(),
            first_name: draft.first_name.trim().to_string(),
            last_name: draft.last_name.trim().to_string(),
        }),
    ))
}
