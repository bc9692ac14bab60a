use crate::api::{ApiError, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::store::{self, relations::PgRelations};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use ladle_core::{toggle, Relation, ToggleAction};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;
use uuid::Uuid;

use super::subscriptions::{author_cards, AuthorWithRecipes};

#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
pub struct SubscribeParams {
    /// Maximum number of the author's recipes included in the response
    pub recipes_limit: Option<usize>,
}

#[utoipa::path(
    method(post, get),
    path = "/api/users/{id}/subscribe",
    tag = "users",
    params(
        ("id" = Uuid, Path, description = "Author ID"),
        SubscribeParams
    ),
    responses(
        (status = 201, description = "Subscribed", body = AuthorWithRecipes),
        (status = 400, description = "Already subscribed, or subscribing to yourself", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Author not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn subscribe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    Query(params): Query<SubscribeParams>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_conn!(pool);

    let author = store::users::find(&mut conn, id)?.ok_or(ApiError::NotFound("User"))?;
    toggle(
        &mut PgRelations::new(&mut conn),
        Relation::Subscription,
        ToggleAction::Add,
        user.id,
        author.id,
    )?;
    tracing::info!(user_id = %user.id, author_id = %author.id, "subscribed");

    let mut cards = author_cards(&mut conn, vec![author], params.recipes_limit)?;
    let card = cards.pop().ok_or(ApiError::Internal)?;
    Ok((StatusCode::CREATED, Json(card)))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}/subscribe",
    tag = "users",
    params(
        ("id" = Uuid, Path, description = "Author ID")
    ),
    responses(
        (status = 204, description = "Unsubscribed"),
        (status = 400, description = "Not subscribed", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Author not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn unsubscribe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut conn = get_conn!(pool);

    let author = store::users::find(&mut conn, id)?.ok_or(ApiError::NotFound("User"))?;
    toggle(
        &mut PgRelations::new(&mut conn),
        Relation::Subscription,
        ToggleAction::Remove,
        user.id,
        author.id,
    )?;
    tracing::info!(user_id = %user.id, author_id = %author.id, "unsubscribed");

    Ok(StatusCode::NO_CONTENT)
}
