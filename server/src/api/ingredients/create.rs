use crate::api::{ApiError, ErrorResponse, ValidationErrorResponse};
use crate::auth::MaybeAuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::Ingredient;
use crate::store::{self, unique_violation};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{Method, StatusCode},
    response::IntoResponse,
    Json,
};
use ladle_core::validation::validate_ingredient;
use ladle_core::Policy;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateIngredientRequest {
    pub name: String,
    pub measurement_unit: String,
}

#[utoipa::path(
    post,
    path = "/api/ingredients",
    tag = "ingredients",
    request_body = CreateIngredientRequest,
    responses(
        (status = 201, description = "Ingredient created", body = Ingredient),
        (status = 400, description = "Invalid fields or duplicate (name, unit)", body = ValidationErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Administrators only", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_ingredient(
    caller: MaybeAuthUser,
    method: Method,
    State(pool): State<Arc<DbPool>>,
    body: Result<Json<CreateIngredientRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    Policy::AdminOrReadOnly.check_request(&method, &caller.actor())?;
    let Json(request) = body?;

    let name = request.name.trim();
    let measurement_unit = request.measurement_unit.trim();
    validate_ingredient(name, measurement_unit)?;

    let mut conn = get_conn!(pool);

    let result = store::ingredients::insert(&mut conn, name, measurement_unit);

    match result {
        Ok(ingredient) => Ok((StatusCode::CREATED, Json(ingredient))),
        Err(e) if unique_violation(&e).is_some() => Err(ApiError::field(
            "name",
            "This ingredient already exists with that measurement unit",
        )),
        Err(e) => Err(e.into()),
    }
}
