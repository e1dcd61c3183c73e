//! Shared-secret check on the `X-API-Key` header.

use crate::error::AppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Configured secret. Empty means the check is disabled.
#[derive(Clone, Debug)]
pub struct ApiKey(Arc<str>);

impl ApiKey {
    pub fn new(key: &str) -> Self {
        ApiKey(Arc::from(key))
    }

    pub fn is_disabled(&self) -> bool {
        self.0.is_empty()
    }

    pub fn verify(&self, presented: Option<&str>) -> Result<(), AppError> {
        if self.is_disabled() {
            return Ok(());
        }
        let presented = presented
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AppError::Unauthorized("missing API key".into()))?;
        if bool::from(presented.as_bytes().ct_eq(self.0.as_bytes())) {
            Ok(())
        } else {
            Err(AppError::Unauthorized("invalid API key".into()))
        }
    }
}

/// Use with `axum::middleware::from_fn_with_state`.
pub async fn require_api_key(
    State(key): State<ApiKey>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());
    key.verify(presented)?;
    Ok(next.run(request).await)
}
