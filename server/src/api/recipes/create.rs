use crate::api::{ApiError, ErrorResponse, ValidationErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::NewRecipe;
use crate::store;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::PgConnection;
use ladle_core::validation::{validate_recipe, DraftMode, IngredientAmount, RecipeDraft};
use ladle_core::FieldErrors;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::get::RecipeResponse;

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct IngredientAmountRequest {
    /// Ingredient ID
    pub id: Uuid,
    pub amount: i32,
}

impl From<IngredientAmountRequest> for IngredientAmount {
    fn from(item: IngredientAmountRequest) -> Self {
        IngredientAmount {
            id: item.id,
            amount: item.amount,
        }
    }
}

/// Every field is required; they are optional here so that missing ones are
/// reported per field.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRecipeRequest {
    pub name: Option<String>,
    pub text: Option<String>,
    /// Image reference (URL or stored path)
    pub image: Option<String>,
    /// Minutes, at least 1
    pub cooking_time: Option<i32>,
    /// Tag IDs
    pub tags: Option<Vec<Uuid>>,
    pub ingredients: Option<Vec<IngredientAmountRequest>>,
}

pub fn to_amounts(items: Option<&[IngredientAmountRequest]>) -> Option<Vec<IngredientAmount>> {
    items.map(|items| items.iter().copied().map(IngredientAmount::from).collect())
}

/// Reject references to tags or ingredients that do not exist.
pub fn check_references(
    conn: &mut PgConnection,
    tag_ids: Option<&[Uuid]>,
    items: Option<&[IngredientAmount]>,
) -> Result<(), ApiError> {
    let (missing_tags, missing_ingredients) =
        store::recipes::missing_references(conn, tag_ids, items)?;

    let mut errors = FieldErrors::new();
    for id in missing_tags {
        errors.add("tags", format!("Tag {id} does not exist"));
    }
    for id in missing_ingredients {
        errors.add("ingredients", format!("Ingredient {id} does not exist"));
    }
    errors.into_result().map_err(ApiError::from)
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body = CreateRecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Invalid fields", body = ValidationErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<CreateRecipeRequest>,
) -> Result<impl IntoResponse, ApiError> {
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
        DraftMode::Create,
    )?;

    let tag_ids = request.tags.as_deref().unwrap_or_default();
    let amounts = amounts.unwrap_or_default();

    let mut conn = get_conn!(pool);
    check_references(&mut conn, Some(tag_ids), Some(amounts.as_slice()))?;

    let recipe_id = store::recipes::insert(
        &mut conn,
        &NewRecipe {
            author_id: user.id,
            name: request.name.as_deref().unwrap_or_default().trim(),
            text: request.text.as_deref().unwrap_or_default(),
            image: request.image.as_deref().unwrap_or_default().trim(),
            cooking_time: request.cooking_time.unwrap_or_default(),
        },
        tag_ids,
        &amounts,
    )?;
    tracing::info!(user_id = %user.id, recipe_id = %recipe_id, "recipe created");

    let detail = store::recipes::load_detail(&mut conn, recipe_id, Some(user.id))?
        .ok_or(ApiError::Internal)?;
    Ok((StatusCode::CREATED, Json(RecipeResponse::from(detail))))
}
