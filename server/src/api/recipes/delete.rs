use crate::api::{ApiError, ErrorResponse};
use crate::auth::MaybeAuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::store;
use axum::{
    extract::{Path, State},
    http::{Method, StatusCode},
};
use ladle_core::Policy;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_recipe(
    caller: MaybeAuthUser,
    method: Method,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let actor = caller.actor();
    let policy = Policy::AuthorOrAdminOrReadOnly;
    policy.check_request(&method, &actor)?;

    let mut conn = get_conn!(pool);

    let author_id =
        store::recipes::find_author(&mut conn, id)?.ok_or(ApiError::NotFound("Recipe"))?;
    policy.check_object(&method, &actor, author_id)?;

    // Favorites, cart entries and join rows go with it (ON DELETE CASCADE)
    if !store::recipes::delete(&mut conn, id)? {
        return Err(ApiError::NotFound("Recipe"));
    }
    tracing::info!(recipe_id = %id, "recipe deleted");

    Ok(StatusCode::NO_CONTENT)
}
