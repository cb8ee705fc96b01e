use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::city::CityError;
use tracing::error;

/// Token returned when a path identifier is not an integer.
pub const FIELD_MUST_BE_NUMBER: &str = "FieldMustBeNumber";

/// Token returned when a request body cannot be decoded.
pub const VALIDATION_FAILED: &str = "ValidationFailed";

/// JSON error body: `{"error": <reason phrase>, "message": <token>, "detail"?: ...}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub message: String,
    pub detail: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, detail: Option<String>) -> Self {
        Self { status, message: message.into(), detail }
    }

    pub fn invalid_id() -> Self {
        Self::new(StatusCode::BAD_REQUEST, FIELD_MUST_BE_NUMBER, None)
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.status.canonical_reason().unwrap_or("Error"),
            message: &self.message,
            detail: self.detail.as_deref(),
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<CityError> for JsonApiError {
    fn from(e: CityError) -> Self {
        let status = match &e {
            CityError::Validation(_)
            | CityError::Conflict
            | CityError::NotSaved
            | CityError::NotUpdated => StatusCode::BAD_REQUEST,
            CityError::NotFound | CityError::StateNotFound | CityError::NotDeleted => StatusCode::NOT_FOUND,
            CityError::Upstream(_) => StatusCode::BAD_GATEWAY,
            CityError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let detail = match &e {
            CityError::Validation(msg) | CityError::Upstream(msg) => Some(msg.clone()),
            CityError::Repository(msg) => {
                error!(code = e.code(), error = %msg, "repository failure");
                None
            }
            _ => None,
        };
        JsonApiError::new(status, e.token(), detail)
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(rejection: JsonRejection) -> Self {
        JsonApiError::new(StatusCode::BAD_REQUEST, VALIDATION_FAILED, Some(rejection.body_text()))
    }
}

impl From<QueryRejection> for JsonApiError {
    fn from(rejection: QueryRejection) -> Self {
        JsonApiError::new(StatusCode::BAD_REQUEST, VALIDATION_FAILED, Some(rejection.body_text()))
    }
}
