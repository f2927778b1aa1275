use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;

/// Errors an attendance view can surface to the client.
#[derive(Debug, Display)]
pub enum ApiError {
    /// The backend could not deliver the record set. No aggregation runs.
    #[display(fmt = "Failed to load attendance records")]
    Upstream(anyhow::Error),
    #[display(fmt = "{}", _0)]
    BadRequest(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string()
        }))
    }
}
