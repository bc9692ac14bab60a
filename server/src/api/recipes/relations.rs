//! Favorite and shopping cart toggles.

use crate::api::{ApiError, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{RecipeSummary, User};
use crate::store::{self, relations::PgRelations};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ladle_core::{toggle, Relation, ToggleAction, Toggled};
use std::sync::Arc;
use uuid::Uuid;

fn toggle_recipe(
    pool: &DbPool,
    user: &User,
    recipe_id: Uuid,
    relation: Relation,
    action: ToggleAction,
) -> Result<Response, ApiError> {
    let mut conn = get_conn!(pool);

    let summary = store::recipes::find_summary(&mut conn, recipe_id)?
        .ok_or(ApiError::NotFound("Recipe"))?;

    let outcome = toggle(
        &mut PgRelations::new(&mut conn),
        relation,
        action,
        user.id,
        recipe_id,
    )?;
    tracing::info!(
        user_id = %user.id,
        recipe_id = %recipe_id,
        relation = %relation,
        ?outcome,
        "relation toggled"
    );

    Ok(match outcome {
        Toggled::Added => (StatusCode::CREATED, Json(summary)).into_response(),
        Toggled::Removed => StatusCode::NO_CONTENT.into_response(),
    })
}

#[utoipa::path(
    method(post, get),
    path = "/api/recipes/{id}/favorite",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 201, description = "Added to favorites", body = RecipeSummary),
        (status = 400, description = "Already in favorites", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn add_favorite(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    toggle_recipe(&pool, &user, id, Relation::Favorite, ToggleAction::Add)
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/favorite",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 204, description = "Removed from favorites"),
        (status = 400, description = "Not in favorites", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn remove_favorite(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    toggle_recipe(&pool, &user, id, Relation::Favorite, ToggleAction::Remove)
}

#[utoipa::path(
    method(post, get),
    path = "/api/recipes/{id}/shopping_cart",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 201, description = "Added to the shopping cart", body = RecipeSummary),
        (status = 400, description = "Already in the shopping cart", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn add_to_cart(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    toggle_recipe(&pool, &user, id, Relation::ShoppingCart, ToggleAction::Add)
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/shopping_cart",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 204, description = "Removed from the shopping cart"),
        (status = 400, description = "Not in the shopping cart", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn remove_from_cart(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    toggle_recipe(&pool, &user, id, Relation::ShoppingCart, ToggleAction::Remove)
}
