use crate::api::users::get::UserResponse;
use crate::api::{ApiError, ErrorResponse};
use crate::auth::MaybeAuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::Tag;
use crate::store::{self, recipes::RecipeDetail};
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeIngredientResponse {
    /// Ingredient ID
    pub id: Uuid,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeResponse {
    pub id: Uuid,
    pub tags: Vec<Tag>,
    pub author: UserResponse,
    pub ingredients: Vec<RecipeIngredientResponse>,
    /// Whether the caller has favorited this recipe (false when anonymous)
    pub is_favorited: bool,
    /// Whether this recipe is in the caller's cart (false when anonymous)
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    /// Minutes
    pub cooking_time: i32,
    pub created_at: DateTime<Utc>,
}

impl From<RecipeDetail> for RecipeResponse {
    fn from(detail: RecipeDetail) -> Self {
        let RecipeDetail {
            recipe,
            author,
            tags,
            ingredients,
            is_favorited,
            is_in_shopping_cart,
            author_subscribed,
        } = detail;

        RecipeResponse {
            id: recipe.id,
            tags,
            author: UserResponse::new(author, author_subscribed),
            ingredients: ingredients
                .into_iter()
                .map(|(ingredient, amount)| RecipeIngredientResponse {
                    id: ingredient.id,
                    name: ingredient.name,
                    measurement_unit: ingredient.measurement_unit,
                    amount,
                })
                .collect(),
            is_favorited,
            is_in_shopping_cart,
            name: recipe.name,
            image: recipe.image,
            text: recipe.text,
            cooking_time: recipe.cooking_time,
            created_at: recipe.created_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe details", body = RecipeResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    viewer: MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let mut conn = get_conn!(pool);
    let detail = store::recipes::load_detail(&mut conn, id, viewer.user_id())?
        .ok_or(ApiError::NotFound("Recipe"))?;
    Ok(Json(detail.into()))
}
