use crate::api::{ApiError, ErrorResponse, ValidationErrorResponse};
use crate::auth::MaybeAuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::RecipeChanges;
use crate::store;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::Method,
    Json,
};
use chrono::Utc;
use ladle_core::validation::{validate_recipe, DraftMode, RecipeDraft};
use ladle_core::Policy;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::create::{check_references, to_amounts, IngredientAmountRequest};
use super::get::RecipeResponse;

/// Any subset of the create fields. Supplied `tags` and `ingredients` replace
/// the existing sets.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateRecipeRequest {
    pub name: Option<String>,
    pub text: Option<String>,
    pub image: Option<String>,
    pub cooking_time: Option<i32>,
    pub tags: Option<Vec<Uuid>>,
    pub ingredients: Option<Vec<IngredientAmountRequest>>,
}

#[utoipa::path(
    patch,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = UpdateRecipeRequest,
    responses(
        (status = 200, description = "Recipe updated", body = RecipeResponse),
        (status = 400, description = "Invalid fields", body = ValidationErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_recipe(
    caller: MaybeAuthUser,
    method: Method,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    body: Result<Json<UpdateRecipeRequest>, JsonRejection>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let actor = caller.actor();
    let policy = Policy::AuthorOrAdminOrReadOnly;
    policy.check_request(&method, &actor)?;
    let Json(request) = body?;

    let mut conn = get_conn!(pool);

    let author_id =
        store::recipes::find_author(&mut conn, id)?.ok_or(ApiError::NotFound("Recipe"))?;
    policy.check_object(&method, &actor, author_id)?;

    let amounts = to_amounts(request.ingredients.as_deref());
    validate_recipe(
        &RecipeDraft {
            name: request.name.as_deref(),
            text: request.text.as_deref(),
            image: request.image.as_deref(),
            cooking_time: request.cooking_time,
            tags: request.tags.as_deref(),
            ingredients: amounts.as_deref(),
        },
        DraftMode::Update,
    )?;
    check_references(&mut conn, request.tags.as_deref(), amounts.as_deref())?;

    store::recipes::update(
        &mut conn,
        id,
        &RecipeChanges {
            name: request.name.as_deref().map(str::trim),
            text: request.text.as_deref(),
            image: request.image.as_deref().map(str::trim),
            cooking_time: request.cooking_time,
            updated_at: Utc::now(),
        },
        request.tags.as_deref(),
        amounts.as_deref(),
    )?;
    tracing::info!(recipe_id = %id, "recipe updated");

    let detail = store::recipes::load_detail(&mut conn, id, caller.user_id())?
        .ok_or(ApiError::NotFound("Recipe"))?;
    Ok(Json(detail.into()))
}
