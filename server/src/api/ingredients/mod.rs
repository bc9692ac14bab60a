pub mod create;
pub mod delete;
pub mod list;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/ingredients endpoints (mounted at /api/ingredients)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_ingredients).post(create::create_ingredient))
        .route(
            "/{id}",
            get(list::get_ingredient).delete(delete::delete_ingredient),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_ingredients,
        list::get_ingredient,
        create::create_ingredient,
        delete::delete_ingredient,
    ),
    components(schemas(crate::models::Ingredient, create::CreateIngredientRequest))
)]
pub struct ApiDoc;
