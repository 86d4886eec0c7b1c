use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Everything a users handler can fail with. The client only ever sees the
/// fixed messages below; causes go to the log.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("User not found")]
    NotFound,

    #[error("Not found")]
    RouteNotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Invalid request body")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal {
        context: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: &'static str,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Full `context: cause: ...` chain of an error, for log fields.
pub fn error_chain(e: &anyhow::Error) -> String {
    format!("{e:#}")
}

/// `map_err` adapter tagging a store error with what the handler was doing.
pub fn internal<E>(context: &'static str) -> impl FnOnce(E) -> ApiError
where
    E: Into<anyhow::Error>,
{
    move |e| ApiError::Internal {
        context,
        source: e.into(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Internal { context, source } => {
                error!(error = %error_chain(source), context, "request failed");
            }
            ApiError::BadRequest(detail) => {
                warn!(detail = %detail, "rejected request body");
            }
            ApiError::NotFound | ApiError::RouteNotFound | ApiError::MethodNotAllowed => {}
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
