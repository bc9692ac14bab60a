use crate::api::{ApiError, ErrorResponse};
use crate::auth::MaybeAuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::ingredients;
use axum::{
    extract::{Path, State},
    http::{Method, StatusCode},
};
use diesel::prelude::*;
use ladle_core::Policy;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    delete,
    path = "/api/ingredients/{id}",
    tag = "ingredients",
    params(
        ("id" = Uuid, Path, description = "Ingredient ID")
    ),
    responses(
        (status = 204, description = "Ingredient deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Administrators only", body = ErrorResponse),
        (status = 404, description = "Ingredient not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_ingredient(
    caller: MaybeAuthUser,
    method: Method,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    Policy::AdminOrReadOnly.check_request(&method, &caller.actor())?;

    let mut conn = get_conn!(pool);
    match diesel::delete(ingredients::table.find(id)).execute(&mut conn)? {
        0 => Err(ApiError::NotFound("Ingredient")),
        _ => Ok(StatusCode::NO_CONTENT),
    }
}
