use crate::api::{ApiError, PageQuery, PaginationMetadata};
use crate::auth::MaybeAuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::store;
use axum::{
    extract::{Query, State},
    Json,
};
use ladle_core::PageParams;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use super::get::UserResponse;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UsersListResponse {
    pub users: Vec<UserResponse>,
    pub pagination: PaginationMetadata,
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    params(PageQuery),
    responses(
        (status = 200, description = "Users ordered by username", body = UsersListResponse)
    )
)]
pub async fn list_users(
    viewer: MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<PageQuery>,
) -> Result<Json<UsersListResponse>, ApiError> {
    let window = PageParams::from(params).window();
    let mut conn = get_conn!(pool);

    let (users, total) = store::users::list(&mut conn, window)?;
    let subscribed = match viewer.user_id() {
        Some(viewer) => {
            let ids: Vec<_> = users.iter().map(|u| u.id).collect();
            store::users::subscribed_among(&mut conn, viewer, &ids)?
        }
        None => Default::default(),
    };

    Ok(Json(UsersListResponse {
        users: users
            .into_iter()
            .map(|user| {
                let is_subscribed = subscribed.contains(&user.id);
                UserResponse::new(user, is_subscribed)
            })
            .collect(),
        pagination: PaginationMetadata::new(window, total),
    }))
}
