//! Per-client request cap over a fixed one-minute window.

use crate::error::AppError;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

pub const RATE_LIMIT_LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// Expired windows are swept once the table grows past this many clients.
const PRUNE_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

#[derive(Debug)]
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    clients: Mutex<HashMap<IpAddr, Window>>,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        RateLimiter {
            limit: limit.max(1),
            window,
            clients: Mutex::new(HashMap::new()),
        }
    }

    pub fn per_minute(limit: u32) -> Self {
        Self::new(limit, Duration::from_secs(60))
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Count one request from `client` at `now`. `Ok` carries the requests left in
    /// the window, `Err` the whole seconds until the window resets.
    pub async fn check(&self, client: IpAddr, now: Instant) -> Result<u32, u64> {
        let mut clients = self.clients.lock().await;
        if clients.len() > PRUNE_THRESHOLD {
            let window = self.window;
            clients.retain(|_, w| now.duration_since(w.started) < window);
        }
        let entry = clients.entry(client).or_insert(Window {
            started: now,
            count: 0,
        });
        let elapsed = now.duration_since(entry.started);
        if elapsed >= self.window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }
        if entry.count >= self.limit {
            let left = self.window.saturating_sub(now.duration_since(entry.started));
            return Err(left.as_secs().max(1));
        }
        entry.count += 1;
        Ok(self.limit - entry.count)
    }
}

/// Client address: `True-Client-IP`, `X-Real-IP`, then the first `X-Forwarded-For` hop,
/// then the socket peer. Requests with none of these share one bucket.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> IpAddr {
    let header_ip = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .and_then(|v| v.trim().parse::<IpAddr>().ok())
    };
    header_ip("true-client-ip")
        .or_else(|| header_ip("x-real-ip"))
        .or_else(|| header_ip("x-forwarded-for"))
        .or_else(|| peer.map(|p| p.ip()))
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

/// Use with `axum::middleware::from_fn_with_state`.
pub async fn limit_by_ip(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|c| c.0);
    let client = client_ip(request.headers(), peer);
    let remaining = limiter
        .check(client, Instant::now())
        .await
        .map_err(|retry_after| {
            tracing::debug!(client = %client, retry_after, "rate limited");
            AppError::TooManyRequests { retry_after }
        })?;

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        HeaderName::from_static(RATE_LIMIT_LIMIT_HEADER),
        HeaderValue::from(limiter.limit()),
    );
    headers.insert(
        HeaderName::from_static(RATE_LIMIT_REMAINING_HEADER),
        HeaderValue::from(remaining),
    );
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn window_caps_then_resets() {
        let limiter = RateLimiter::per_minute(2);
        let t0 = Instant::now();
        let client = ip("10.0.0.1");
        assert_eq!(limiter.check(client, t0).await, Ok(1));
        assert_eq!(limiter.check(client, t0).await, Ok(0));
        assert_eq!(limiter.check(client, t0 + Duration::from_secs(20)).await, Err(40));
        assert_eq!(limiter.check(client, t0 + Duration::from_secs(60)).await, Ok(1));
    }

    #[tokio::test]
    async fn clients_are_counted_apart() {
        let limiter = RateLimiter::per_minute(1);
        let t0 = Instant::now();
        assert_matches!(limiter.check(ip("10.0.0.1"), t0).await, Ok(0));
        assert_matches!(limiter.check(ip("10.0.0.1"), t0).await, Err(_));
        assert_matches!(limiter.check(ip("10.0.0.2"), t0).await, Ok(0));
    }

    #[tokio::test]
    async fn retry_after_is_at_least_one_second() {
        let limiter = RateLimiter::new(1, Duration::from_millis(500));
        let t0 = Instant::now();
        limiter.check(ip("::1"), t0).await.unwrap();
        assert_eq!(limiter.check(ip("::1"), t0).await, Err(1));
    }

    #[test]
    fn client_ip_prefers_proxy_headers() {
        let peer: SocketAddr = "192.0.2.9:4000".parse().unwrap();
        let mut headers = HeaderMap::new();
        assert_eq!(client_ip(&headers, Some(peer)), ip("192.0.2.9"));
        assert_eq!(client_ip(&headers, None), IpAddr::V4(Ipv4Addr::UNSPECIFIED));

        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.5, 10.0.0.1"));
        assert_eq!(client_ip(&headers, Some(peer)), ip("203.0.113.5"));

        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.7"));
        assert_eq!(client_ip(&headers, Some(peer)), ip("198.51.100.7"));

        headers.insert("x-real-ip", HeaderValue::from_static("not-an-ip"));
        assert_eq!(client_ip(&headers, Some(peer)), ip("203.0.113.5"));
    }
}
