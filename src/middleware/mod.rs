pub mod api_key;
pub mod rate_limit;

pub use api_key::{require_api_key, ApiKey, API_KEY_HEADER};
pub use rate_limit::{
    limit_by_ip, RateLimiter, RATE_LIMIT_LIMIT_HEADER, RATE_LIMIT_REMAINING_HEADER,
};
