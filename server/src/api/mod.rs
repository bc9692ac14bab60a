pub mod auth;
mod error;
pub mod ingredients;
pub mod recipes;
pub mod tags;
pub mod users;

pub use error::ApiError;

use crate::AppState;
use axum::Router;
use serde::{Deserialize, Serialize};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{IntoParams, OpenApi, ToSchema};

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Field-level validation failures
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ValidationErrorResponse {
    /// Messages keyed by the offending field
    #[schema(value_type = Object)]
    pub errors: ladle_core::FieldErrors,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginationMetadata {
    /// Total number of items available
    pub total: i64,
    /// Number of items requested (limit)
    pub limit: i64,
    /// Number of items skipped (offset)
    pub offset: i64,
}

impl PaginationMetadata {
    pub fn new(window: ladle_core::Window, total: i64) -> Self {
        PaginationMetadata {
            total,
            limit: window.limit,
            offset: window.offset,
        }
    }
}

/// `limit`/`offset`/`page` for the simple paginated listings.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
pub struct PageQuery {
    /// Number of items to return (default: 6, max: 100)
    pub limit: Option<i64>,
    /// Number of items to skip (default: 0)
    pub offset: Option<i64>,
    /// 1-based page number, used when offset is absent
    pub page: Option<i64>,
}

impl From<PageQuery> for ladle_core::PageParams {
    fn from(query: PageQuery) -> Self {
        ladle_core::PageParams {
            limit: query.limit,
            offset: query.offset,
            page: query.page,
        }
    }
}

/// All `/api` routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth::router())
        .nest("/api/users", users::router())
        .nest("/api/tags", tags::router())
        .nest("/api/ingredients", ingredients::router())
        .nest("/api/recipes", recipes::router())
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Base spec with shared components and security
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Ladle", description = "Recipe sharing API"),
        components(schemas(ErrorResponse, ValidationErrorResponse, PaginationMetadata))
    )]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    if let Some(components) = spec.components.as_mut() {
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }

    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        auth::ApiDoc::openapi(),
        users::ApiDoc::openapi(),
        tags::ApiDoc::openapi(),
        ingredients::ApiDoc::openapi(),
        recipes::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        spec.paths.paths.extend(module_spec.paths.paths);

        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}
