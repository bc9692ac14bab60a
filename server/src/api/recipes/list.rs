use crate::api::{ApiError, PaginationMetadata, ValidationErrorResponse};
use crate::auth::MaybeAuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::store;
use axum::{
    extract::{RawQuery, State},
    Json,
};
use ladle_core::RecipeQuery;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::get::RecipeResponse;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeResponse>,
    pub pagination: PaginationMetadata,
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(
        ("tags" = Option<Vec<String>>, Query, description = "Tag slug; repeat to match any of several"),
        ("author" = Option<Uuid>, Query, description = "Only recipes by this user"),
        ("is_favorited" = Option<bool>, Query, description = "1 for only the caller's favorites, 0 to exclude them"),
        ("is_in_shopping_cart" = Option<bool>, Query, description = "1 for only recipes in the caller's cart, 0 to exclude them"),
        ("limit" = Option<i64>, Query, description = "Number of items to return (default: 6, max: 100)"),
        ("offset" = Option<i64>, Query, description = "Number of items to skip (default: 0)"),
        ("page" = Option<i64>, Query, description = "1-based page number, used when offset is absent")
    ),
    responses(
        (status = 200, description = "Recipes, newest first", body = ListRecipesResponse),
        (status = 400, description = "Malformed filter value", body = ValidationErrorResponse)
    )
)]
pub async fn list_recipes(
    viewer: MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    RawQuery(raw): RawQuery,
) -> Result<Json<ListRecipesResponse>, ApiError> {
    let query = RecipeQuery::from_pairs(form_urlencoded::parse(
        raw.as_deref().unwrap_or_default().as_bytes(),
    ))?;
    let filter = query.resolve(&viewer.actor());
    let window = query.page.window();

    let mut conn = get_conn!(pool);

    let (ids, total) = store::recipes::filter_recipe_ids(&mut conn, &filter, window)?;
    let details = store::recipes::load_details(&mut conn, &ids, viewer.user_id())?;

    Ok(Json(ListRecipesResponse {
        recipes: details.into_iter().map(RecipeResponse::from).collect(),
        pagination: PaginationMetadata::new(window, total),
    }))
}
