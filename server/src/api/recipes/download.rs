use crate::api::{ApiError, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::store;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};
use ladle_core::shopping_list::EXPORT_FILENAME;
use ladle_core::{aggregate, render_csv};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/recipes/download_shopping_cart",
    tag = "recipes",
    responses(
        (status = 200, description = "Summed ingredients of every recipe in the cart, as UTF-8 CSV with a byte-order mark", content_type = "text/csv", body = String),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn download_shopping_cart(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_conn!(pool);

    let rows = store::cart::cart_rows(&mut conn, user.id)?;
    let entries = aggregate(rows);
    let body = render_csv(&entries)?;
    tracing::info!(user_id = %user.id, lines = entries.len(), "shopping list exported");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILENAME}\""),
            ),
        ],
        body,
    ))
}
