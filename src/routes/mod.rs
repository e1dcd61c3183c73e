//! Router assembly: public health routes, `/v1` catalog behind the API key, tower-http layers.

mod catalog;
mod common;

pub use catalog::catalog_routes;
pub use common::common_routes;

use crate::config::{CorsSettings, HttpSettings};
use crate::error::{internal_response, panic_response, AppError};
use crate::middleware::{
    limit_by_ip, require_api_key, ApiKey, RateLimiter, API_KEY_HEADER, RATE_LIMIT_LIMIT_HEADER,
    RATE_LIMIT_REMAINING_HEADER,
};
use crate::state::AppState;
use axum::body::Body;
use axum::error_handling::HandleErrorLayer;
use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method, Request, Uri};
use axum::response::{IntoResponse, Response};
use axum::{middleware, BoxError, Router};
use std::sync::Arc;
use tower::timeout::{error::Elapsed, TimeoutLayer};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{Level, Span};

/// The API is read-only; requests carry no meaningful body.
const BODY_LIMIT: usize = 64 * 1024;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Full application router. Layers apply bottom-up: CORS first, panic recovery last.
/// Serve it with `into_make_service_with_connect_info::<SocketAddr>()` so the rate limiter
/// sees peer addresses.
pub fn build_router(state: AppState, http: &HttpSettings) -> Router {
    if http.api_key.is_empty() {
        tracing::warn!("API_KEY is empty: /v1 routes are not authenticated");
    }
    let api = catalog_routes(&state).layer(middleware::from_fn_with_state(
        ApiKey::new(&http.api_key),
        require_api_key,
    ));

    let router = Router::new()
        .merge(common_routes(state))
        .nest("/v1", api)
        .fallback(route_not_found)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout))
                .layer(TimeoutLayer::new(http.request_timeout)),
        )
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT));

    let router = if http.rate_limit.enabled {
        let limiter = Arc::new(RateLimiter::per_minute(http.rate_limit.requests_per_minute));
        router.layer(middleware::from_fn_with_state(limiter, limit_by_ip))
    } else {
        router
    };

    router
        .layer(CompressionLayer::new())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(request_span)
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors_layer(&http.cors))
}

async fn route_not_found(uri: Uri) -> AppError {
    AppError::RouteNotFound(uri.path().to_string())
}

/// Errors surfaced by the tower timeout. Routes are infallible, so anything else is a bug.
async fn handle_timeout(err: BoxError) -> Response {
    if err.is::<Elapsed>() {
        AppError::Timeout.into_response()
    } else {
        tracing::error!(error = %err, "unhandled middleware error");
        internal_response()
    }
}

/// Span per request, tagged with the id set by `SetRequestIdLayer`.
fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}

/// `*` allows any origin; invalid origins are skipped with a warning.
pub fn cors_layer(cors: &CorsSettings) -> CorsLayer {
    let origin = if cors.allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(cors.allowed_origins.iter().filter_map(|o| {
            match o.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                    None
                }
            }
        }))
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([
            ACCEPT,
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static(API_KEY_HEADER),
        ])
        .expose_headers([
            HeaderName::from_static(REQUEST_ID_HEADER),
            HeaderName::from_static(RATE_LIMIT_LIMIT_HEADER),
            HeaderName::from_static(RATE_LIMIT_REMAINING_HEADER),
        ])
        .max_age(cors.max_age)
}
