pub mod create;
pub mod get;
pub mod list;
pub mod set_password;
pub mod subscribe;
pub mod subscriptions;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/users endpoints (mounted at /api/users)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_users).post(create::create_user))
        .route("/me", get(get::me))
        .route("/set_password", post(set_password::set_password))
        .route("/subscriptions", get(subscriptions::list_subscriptions))
        .route("/{id}", get(get::get_user))
        .route(
            "/{id}/subscribe",
            post(subscribe::subscribe)
                .get(subscribe::subscribe)
                .delete(subscribe::unsubscribe),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_user,
        list::list_users,
        get::me,
        get::get_user,
        set_password::set_password,
        subscribe::subscribe,
        subscribe::unsubscribe,
        subscriptions::list_subscriptions,
    ),
    components(schemas(
        create::CreateUserRequest,
        create::CreateUserResponse,
        get::UserResponse,
        list::UsersListResponse,
        set_password::SetPasswordRequest,
        subscriptions::AuthorWithRecipes,
        subscriptions::SubscriptionsListResponse,
    ))
)]
pub struct ApiDoc;
