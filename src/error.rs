use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde_json::json;
use thiserror::Error;

/// Recoverable rejections surfaced to the caller. The core computation is
/// pure, so nothing here is worth retrying: the same input yields the same
/// rejection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("Group not found")]
    GroupNotFound,

    #[error("{0}")]
    Validation(String),
}

impl ServiceError {
    pub fn validation(message: &str) -> Self {
        ServiceError::Validation(message.to_string())
    }
}

impl actix_web::ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::GroupNotFound => StatusCode::NOT_FOUND,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}
