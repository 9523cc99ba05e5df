//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use blindhub_domain::error::BlindHubError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`BlindHubError`] to an HTTP response with appropriate status code.
pub struct ApiError(BlindHubError);

impl From<BlindHubError> for ApiError {
    fn from(err: BlindHubError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            BlindHubError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            BlindHubError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            BlindHubError::SensorUnavailable(err) => {
                (StatusCode::SERVICE_UNAVAILABLE, err.to_string())
            }
            BlindHubError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blindhub_domain::error::{NotFoundError, ValidationError};

    #[test]
    fn should_map_validation_to_bad_request() {
        let response = ApiError::from(BlindHubError::from(ValidationError::InvalidMode(
            "sun".to_string(),
        )))
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn should_map_not_found_to_404() {
        let response = ApiError::from(BlindHubError::from(NotFoundError {
            entity: "Mode",
            id: "shade".to_string(),
        }))
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn should_hide_storage_details() {
        let response =
            ApiError::from(BlindHubError::Storage("disk on fire".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
