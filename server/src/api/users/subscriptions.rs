use crate::api::{ApiError, ErrorResponse, PaginationMetadata};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{RecipeSummary, User};
use crate::store;
use axum::{
    extract::{Query, State},
    Json,
};
use diesel::PgConnection;
use ladle_core::PageParams;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// A followed author with their most recent recipes.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorWithRecipes {
    pub email: String,
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
    /// Newest first, truncated to `recipes_limit` when given
    pub recipes: Vec<RecipeSummary>,
    /// Total number of recipes by this author
    pub recipes_count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubscriptionsListResponse {
    pub subscriptions: Vec<AuthorWithRecipes>,
    pub pagination: PaginationMetadata,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
pub struct SubscriptionsParams {
    /// Number of authors to return (default: 6, max: 100)
    pub limit: Option<i64>,
    /// Number of authors to skip (default: 0)
    pub offset: Option<i64>,
    /// 1-based page number, used when offset is absent
    pub page: Option<i64>,
    /// Maximum number of recipes listed per author
    pub recipes_limit: Option<usize>,
}

/// Build cards for `authors`, all of whom `viewer` follows.
pub fn author_cards(
    conn: &mut PgConnection,
    authors: Vec<User>,
    recipes_limit: Option<usize>,
) -> Result<Vec<AuthorWithRecipes>, ApiError> {
    let ids: Vec<Uuid> = authors.iter().map(|a| a.id).collect();
    let mut recipes = store::users::recipes_by_authors(conn, &ids, recipes_limit)?;

    Ok(authors
        .into_iter()
        .map(|author| {
            let (recipes, recipes_count) = recipes.remove(&author.id).unwrap_or_default();
            AuthorWithRecipes {
                email: author.email,
                id: author.id,
                username: author.username,
                first_name: author.first_name,
                last_name: author.last_name,
                is_subscribed: true,
                recipes,
                recipes_count,
            }
        })
        .collect())
}

#[utoipa::path(
    get,
    path = "/api/users/subscriptions",
    tag = "users",
    params(SubscriptionsParams),
    responses(
        (status = 200, description = "Authors the caller follows", body = SubscriptionsListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_subscriptions(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<SubscriptionsParams>,
) -> Result<Json<SubscriptionsListResponse>, ApiError> {
    let window = PageParams {
        limit: params.limit,
        offset: params.offset,
        page: params.page,
    }
    .window();

    let mut conn = get_conn!(pool);
    let (authors, total) = store::users::followed_authors(&mut conn, user.id, window)?;
    let subscriptions = author_cards(&mut conn, authors, params.recipes_limit)?;

    Ok(Json(SubscriptionsListResponse {
        subscriptions,
        pagination: PaginationMetadata::new(window, total),
    }))
}
