use crate::api::{ApiError, ErrorResponse, ValidationErrorResponse};
use crate::auth::MaybeAuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{NewTag, Tag};
use crate::schema::tags;
use crate::store::unique_violation;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{Method, StatusCode},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use ladle_core::validation::validate_tag;
use ladle_core::Policy;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateTagRequest {
    pub name: String,
    /// Hex color, `#RRGGBB`
    pub color: String,
    pub slug: String,
}

#[utoipa::path(
    post,
    path = "/api/tags",
    tag = "tags",
    request_body = CreateTagRequest,
    responses(
        (status = 201, description = "Tag created", body = Tag),
        (status = 400, description = "Invalid or duplicate fields", body = ValidationErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Administrators only", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_tag(
    caller: MaybeAuthUser,
    method: Method,
    State(pool): State<Arc<DbPool>>,
    body: Result<Json<CreateTagRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    Policy::AdminOrReadOnly.check_request(&method, &caller.actor())?;
    let Json(request) = body?;

    let name = request.name.trim();
    let color = request.color.trim().to_uppercase();
    let slug = request.slug.trim();
    validate_tag(name, &color, slug)?;

    let mut conn = get_conn!(pool);

    let result = diesel::insert_into(tags::table)
        .values(NewTag {
            name,
            color: &color,
            slug,
        })
        .returning(Tag::as_returning())
        .get_result(&mut conn);

    match result {
        Ok(tag) => Ok((StatusCode::CREATED, Json(tag))),
        Err(e) => {
            let constraint = unique_violation(&e).map(str::to_owned);
            Err(match constraint.as_deref() {
                Some("tags_name_key") => {
                    ApiError::field("name", "A tag with this name already exists")
                }
                Some("tags_color_key") => {
                    ApiError::field("color", "A tag with this color already exists")
                }
                Some("tags_slug_key") => {
                    ApiError::field("slug", "A tag with this slug already exists")
                }
                _ => e.into(),
            })
        }
    }
}
