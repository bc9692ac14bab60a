use crate::api::ApiError;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::User;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header, request::Parts, HeaderMap};
use ladle_core::Actor;
use std::sync::Arc;

use super::db::find_user_by_token;

/// The authenticated caller. Rejects with 401 when no valid token is presented.
pub struct AuthUser(pub User);

/// The caller if a token was presented, anonymous otherwise.
///
/// A present but invalid token is still rejected with 401 rather than being
/// silently downgraded to anonymous.
pub struct MaybeAuthUser(pub Option<User>);

impl MaybeAuthUser {
    pub fn actor(&self) -> Actor {
        self.0.as_ref().map(User::actor).unwrap_or(Actor::Anonymous)
    }

    pub fn user_id(&self) -> Option<uuid::Uuid> {
        self.0.as_ref().map(|u| u.id)
    }
}

/// Extract the token from `Authorization: Bearer <token>` or `Token <token>`.
///
/// `Ok(None)` when the header is absent.
pub fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, ApiError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| ApiError::InvalidToken)?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("Token "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::InvalidToken)?;
    Ok(Some(token))
}

fn resolve_user(pool: &DbPool, token: &str) -> Result<User, ApiError> {
    let mut conn = get_conn!(pool);
    find_user_by_token(&mut conn, token)?.ok_or(ApiError::InvalidToken)
}

impl<S> FromRequestParts<S> for AuthUser
where
    Arc<DbPool>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?.ok_or(ApiError::Unauthenticated)?;
        let pool = Arc::<DbPool>::from_ref(state);
        let user = resolve_user(&pool, token)?;
        tracing::Span::current().record("user_id", tracing::field::display(user.id));
        Ok(AuthUser(user))
    }
}

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    Arc<DbPool>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers)? else {
            return Ok(MaybeAuthUser(None));
        };
        let pool = Arc::<DbPool>::from_ref(state);
        let user = resolve_user(&pool, token)?;
        tracing::Span::current().record("user_id", tracing::field::display(user.id));
        Ok(MaybeAuthUser(Some(user)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn missing_header_is_anonymous() {
        assert!(matches!(bearer_token(&HeaderMap::new()), Ok(None)));
    }

    #[test]
    fn bearer_and_token_prefixes_are_accepted() {
        assert!(matches!(bearer_token(&headers("Bearer abc123")), Ok(Some("abc123"))));
        assert!(matches!(bearer_token(&headers("Token abc123")), Ok(Some("abc123"))));
    }

    #[test]
    fn other_schemes_are_rejected() {
        assert!(matches!(
            bearer_token(&headers("Basic dXNlcjpwYXNz")),
            Err(ApiError::InvalidToken)
        ));
        assert!(matches!(
            bearer_token(&headers("Bearer ")),
            Err(ApiError::InvalidToken)
        ));
    }
}
