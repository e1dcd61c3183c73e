//! Typed errors and HTTP mapping.

use axum::{
    http::{header::RETRY_AFTER, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Generic detail returned for every internal failure. The cause is logged, never sent.
pub const INTERNAL_DETAIL: &str = "an unexpected error occurred";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing reference: {kind} id '{id}'")]
    MissingReference { kind: &'static str, id: String },
    #[error("duplicate path segment: {0}")]
    DuplicatePathSegment(String),
    #[error("{0} environment variable is required")]
    MissingVar(&'static str),
    #[error("validation: {0}")]
    Validation(String),
}

/// A query or path parameter that failed validation. The message names the parameter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct FilterError(pub String);

impl FilterError {
    pub fn new(message: impl Into<String>) -> Self {
        FilterError(message.into())
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("{kind} with id '{id}' not found")]
    NotFound { kind: &'static str, id: String },
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// No route matches the path.
    #[error("route {0} not found")]
    RouteNotFound(String),
    #[error("rate limit exceeded, retry in {retry_after}s")]
    TooManyRequests { retry_after: u64 },
    #[error("request timed out")]
    Timeout,
    #[error("internal: {0}")]
    Internal(#[from] sqlx::Error),
}

impl From<FilterError> for AppError {
    fn from(e: FilterError) -> Self {
        AppError::BadRequest(e.0)
    }
}

/// Failures that abort the binary before it starts serving.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migrations: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("server: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub errors: Vec<ErrorDetail>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    pub code: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub detail: String,
}

impl ErrorBody {
    pub fn single(code: &str, title: &str, detail: impl Into<String>) -> Self {
        ErrorBody {
            errors: vec![ErrorDetail {
                code: code.to_string(),
                title: title.to_string(),
                detail: detail.into(),
            }],
        }
    }
}

impl AppError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        AppError::NotFound { kind, id: id.into() }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } | AppError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::NotFound { .. } | AppError::RouteNotFound(_) => "NOT_FOUND",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::TooManyRequests { .. } => "TOO_MANY_REQUESTS",
            AppError::Timeout => "TIMEOUT",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "Bad Request",
            AppError::NotFound { .. } | AppError::RouteNotFound(_) => "Not Found",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::TooManyRequests { .. } => "Too Many Requests",
            AppError::Timeout => "Gateway Timeout",
            AppError::Internal(_) => "Internal Server Error",
        }
    }

    /// Client-visible detail. Internal causes are replaced by [`INTERNAL_DETAIL`].
    pub fn detail(&self) -> String {
        match self {
            AppError::BadRequest(msg) | AppError::Unauthorized(msg) => msg.clone(),
            AppError::NotFound { .. }
            | AppError::RouteNotFound(_)
            | AppError::TooManyRequests { .. }
            | AppError::Timeout => self.to_string(),
            AppError::Internal(_) => INTERNAL_DETAIL.to_string(),
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody::single(self.code(), self.title(), self.detail())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Internal(e) => {
                tracing::error!(status = status.as_u16(), error = %e, "request error");
            }
            _ => {
                tracing::warn!(
                    status = status.as_u16(),
                    code = self.code(),
                    detail = %self.detail(),
                    "request error"
                );
            }
        }
        let mut response = (status, Json(self.body())).into_response();
        if let AppError::TooManyRequests { retry_after } = self {
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(retry_after));
        }
        response
    }
}

/// 500 envelope for a handler that panicked. The payload is logged, never sent.
pub fn panic_response(payload: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let message = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");
    tracing::error!(panic = %message, "handler panicked");
    internal_response()
}

/// Bare 500 envelope for failures that carry no `AppError`.
pub fn internal_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::single(
            "INTERNAL_ERROR",
            "Internal Server Error",
            INTERNAL_DETAIL,
        )),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_of(err: AppError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn not_found_names_kind_and_id() {
        let (status, body) = body_of(AppError::not_found("Classe", "mago")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.errors.len(), 1);
        assert_eq!(body.errors[0].code, "NOT_FOUND");
        assert_eq!(body.errors[0].title, "Not Found");
        assert_eq!(body.errors[0].detail, "Classe with id 'mago' not found");
    }

    #[tokio::test]
    async fn bad_request_keeps_message() {
        let (status, body) = body_of(FilterError::new("$limit must be a valid integer").into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.errors[0].code, "BAD_REQUEST");
        assert_eq!(body.errors[0].detail, "$limit must be a valid integer");
    }

    #[tokio::test]
    async fn internal_hides_cause() {
        let (status, body) = body_of(AppError::Internal(sqlx::Error::Protocol(
            "relation \"classi\" does not exist".into(),
        )))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.errors[0].code, "INTERNAL_ERROR");
        assert_eq!(body.errors[0].detail, INTERNAL_DETAIL);
    }

    #[tokio::test]
    async fn rate_limited_carries_retry_after() {
        let response = AppError::TooManyRequests { retry_after: 42 }.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[RETRY_AFTER], "42");
        let (_, body) = body_of(AppError::TooManyRequests { retry_after: 42 }).await;
        assert_eq!(body.errors[0].code, "TOO_MANY_REQUESTS");
        assert_eq!(body.errors[0].detail, "rate limit exceeded, retry in 42s");
    }

    #[tokio::test]
    async fn timeout_and_unknown_route_use_the_envelope() {
        let (status, body) = body_of(AppError::Timeout).await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body.errors[0].code, "TIMEOUT");

        let (status, body) = body_of(AppError::RouteNotFound("/v1/nulla".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.errors[0].detail, "route /v1/nulla not found");
    }

    #[tokio::test]
    async fn panic_payload_is_hidden() {
        let response = panic_response(Box::new("index out of bounds".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()["content-type"], "application/json");
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.errors[0].detail, INTERNAL_DETAIL);
    }

    #[test]
    fn empty_detail_is_omitted() {
        let json = serde_json::to_value(ErrorBody::single("UNAUTHORIZED", "Unauthorized", "")).unwrap();
        assert!(json["errors"][0].get("detail").is_none());
    }
}
