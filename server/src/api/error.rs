use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ladle_core::{Denied, ExportError, FieldErrors, QueryError, ToggleError};
use thiserror::Error;

use super::{ErrorResponse, ValidationErrorResponse};

/// Every failure a handler can return.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(FieldErrors),

    /// Relation already exists, is missing on remove, or targets oneself.
    #[error("{0}")]
    Conflict(String),

    #[error("Authentication credentials were not provided")]
    Unauthenticated,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("You do not have permission to perform this action")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated | ApiError::InvalidToken => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn field(field: &str, message: impl Into<String>) -> Self {
        ApiError::Validation(FieldErrors::single(field, message))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Validation(errors) => {
                (status, Json(ValidationErrorResponse { errors })).into_response()
            }
            other => (
                status,
                Json(ErrorResponse {
                    error: other.to_string(),
                }),
            )
                .into_response(),
        }
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors)
    }
}

/// Malformed or mistyped request bodies become a 400 with the field envelope.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::field("non_field_errors", rejection.body_text())
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        ApiError::field(&err.param, err.message)
    }
}

impl From<Denied> for ApiError {
    fn from(denied: Denied) -> Self {
        match denied {
            Denied::Unauthenticated => ApiError::Unauthenticated,
            Denied::Forbidden => ApiError::Forbidden,
        }
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(err: diesel::result::Error) -> Self {
        tracing::error!("Database error: {}", err);
        ApiError::Internal
    }
}

impl From<ToggleError<diesel::result::Error>> for ApiError {
    fn from(err: ToggleError<diesel::result::Error>) -> Self {
        match err {
            ToggleError::Store(e) => e.into(),
            other => ApiError::Conflict(other.to_string()),
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        tracing::error!("Failed to render shopping list: {}", err);
        ApiError::Internal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use ladle_core::Relation;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_errors_are_keyed_by_field() {
        let mut errors = FieldErrors::new();
        errors.add("name", "This field may not be blank");
        errors.add("tags", "Select at least one tag");
        let (status, body) = body_json(errors.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"]["name"][0], "This field may not be blank");
        assert_eq!(body["errors"]["tags"][0], "Select at least one tag");
    }

    #[tokio::test]
    async fn toggle_conflicts_are_bad_requests() {
        let err: ApiError =
            ToggleError::<diesel::result::Error>::AlreadyPresent(Relation::Favorite).into();
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Recipe is already in favorites");

        let err: ApiError = ToggleError::<diesel::result::Error>::SelfSubscription.into();
        let (_, body) = body_json(err).await;
        assert_eq!(body["error"], "Cannot subscribe to yourself");
    }

    #[tokio::test]
    async fn denials_map_to_401_and_403() {
        assert_eq!(
            ApiError::from(Denied::Unauthenticated).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(Denied::Forbidden).status(),
            StatusCode::FORBIDDEN
        );
    }

    #[tokio::test]
    async fn database_details_are_hidden() {
        let err: ApiError = diesel::result::Error::NotFound.into();
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }

    #[test]
    fn query_errors_become_field_errors() {
        let err: ApiError = QueryError::new("author", "Must be a valid user id").into();
        match err {
            ApiError::Validation(errors) => {
                assert_eq!(errors.get("author").unwrap()[0], "Must be a valid user id")
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
