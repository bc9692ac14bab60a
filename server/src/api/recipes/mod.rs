pub mod create;
pub mod delete;
pub mod download;
pub mod get;
pub mod list;
pub mod relations;
pub mod update;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_recipes).post(create::create_recipe))
        .route(
            "/download_shopping_cart",
            get(download::download_shopping_cart),
        )
        .route(
            "/{id}",
            get(get::get_recipe)
                .patch(update::update_recipe)
                .delete(delete::delete_recipe),
        )
        .route(
            "/{id}/favorite",
            get(relations::add_favorite)
                .post(relations::add_favorite)
                .delete(relations::remove_favorite),
        )
        .route(
            "/{id}/shopping_cart",
            get(relations::add_to_cart)
                .post(relations::add_to_cart)
                .delete(relations::remove_from_cart),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_recipes,
        get::get_recipe,
        create::create_recipe,
        update::update_recipe,
        delete::delete_recipe,
        relations::add_favorite,
        relations::remove_favorite,
        relations::add_to_cart,
        relations::remove_from_cart,
        download::download_shopping_cart,
    ),
    components(schemas(
        crate::models::RecipeSummary,
        create::CreateRecipeRequest,
        create::IngredientAmountRequest,
        get::RecipeResponse,
        get::RecipeIngredientResponse,
        list::ListRecipesResponse,
        update::UpdateRecipeRequest,
    ))
)]
pub struct ApiDoc;
