use crate::api::{ApiError, ErrorResponse};
use crate::db::DbPool;
use crate::get_conn;
use crate::models::Tag;
use crate::schema::tags;
use axum::{
    extract::{Path, State},
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/tags",
    tag = "tags",
    responses(
        (status = 200, description = "All tags ordered by name", body = Vec<Tag>)
    )
)]
pub async fn list_tags(State(pool): State<Arc<DbPool>>) -> Result<Json<Vec<Tag>>, ApiError> {
    let mut conn = get_conn!(pool);
    let tags = tags::table
        .order(tags::name.asc())
        .select(Tag::as_select())
        .load(&mut conn)?;
    Ok(Json(tags))
}

#[utoipa::path(
    get,
    path = "/api/tags/{id}",
    tag = "tags",
    params(
        ("id" = Uuid, Path, description = "Tag ID")
    ),
    responses(
        (status = 200, description = "The tag", body = Tag),
        (status = 404, description = "Tag not found", body = ErrorResponse)
    )
)]
pub async fn get_tag(
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Tag>, ApiError> {
    let mut conn = get_conn!(pool);
    let tag = tags::table
        .find(id)
        .select(Tag::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Tag"))?;
    Ok(Json(tag))
}
