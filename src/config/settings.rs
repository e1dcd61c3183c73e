//! Runtime settings read from environment variables (after `.env` is loaded by the binary).

use crate::error::ConfigError;
use crate::filter::validation::parse_bool;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Settings {
    /// `dev` disables the API-key requirement.
    pub version: String,
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub cors: CorsSettings,
    pub rate_limit: RateLimitSettings,
    /// Shared secret for the `X-API-Key` header. Empty disables the check.
    pub api_key: String,
}

#[derive(Clone, Debug)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,
    pub shutdown_timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime: Duration,
}

#[derive(Clone, Debug)]
pub struct CorsSettings {
    pub allowed_origins: Vec<String>,
    pub max_age: Duration,
}

/// Per-client-IP cap on requests per minute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimitSettings {
    pub enabled: bool,
    pub requests_per_minute: u32,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        RateLimitSettings {
            enabled: true,
            requests_per_minute: 60,
        }
    }
}

/// What the HTTP stack needs from [`Settings`].
#[derive(Clone, Debug)]
pub struct HttpSettings {
    pub api_key: String,
    pub request_timeout: Duration,
    pub cors: CorsSettings,
    pub rate_limit: RateLimitSettings,
}

impl Default for HttpSettings {
    fn default() -> Self {
        HttpSettings {
            api_key: String::new(),
            request_timeout: Duration::from_secs(30),
            cors: CorsSettings {
                allowed_origins: vec!["*".into()],
                max_age: Duration::from_secs(300),
            },
            rate_limit: RateLimitSettings::default(),
        }
    }
}

impl Settings {
    /// | Env var                     | Default   |
    /// |-----------------------------|-----------|
    /// | `APP_VERSION`               | `dev`     |
    /// | `API_HOST`                  | `0.0.0.0` |
    /// | `API_PORT`                  | `8080`    |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`      |
    /// | `SHUTDOWN_TIMEOUT_SECS`     | `15`      |
    /// | `DATABASE_URL`              | required  |
    /// | `DB_MAX_OPEN_CONNS`         | `25`      |
    /// | `DB_MAX_IDLE_CONNS`         | `5`       |
    /// | `DB_CONN_MAX_LIFETIME_SECS` | `300`     |
    /// | `CORS_ALLOWED_ORIGINS`      | `*`       |
    /// | `CORS_MAX_AGE`              | `300`     |
    /// | `API_KEY`                   | empty     |
    /// | `RATE_LIMIT_ENABLED`        | `true`    |
    /// | `RATE_LIMIT_RPM`            | `60`      |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Unparseable numbers fall back to the default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());
        let secs = |key: &str, default: u64| {
            Duration::from_secs(get(key).and_then(|v| v.parse().ok()).unwrap_or(default))
        };
        let num = |key: &str, default: u32| get(key).and_then(|v| v.parse().ok()).unwrap_or(default);

        let settings = Settings {
            version: get_or("APP_VERSION", "dev"),
            server: ServerSettings {
                host: get_or("API_HOST", "0.0.0.0"),
                port: get("API_PORT").and_then(|v| v.parse().ok()).unwrap_or(8080),
                request_timeout: secs("REQUEST_TIMEOUT_SECS", 30),
                shutdown_timeout: secs("SHUTDOWN_TIMEOUT_SECS", 15),
            },
            database: DatabaseSettings {
                url: get("DATABASE_URL").unwrap_or_default(),
                max_connections: num("DB_MAX_OPEN_CONNS", 25),
                min_connections: num("DB_MAX_IDLE_CONNS", 5),
                max_lifetime: secs("DB_CONN_MAX_LIFETIME_SECS", 300),
            },
            cors: CorsSettings {
                allowed_origins: get("CORS_ALLOWED_ORIGINS")
                    .map(|v| split_list(&v))
                    .filter(|v| !v.is_empty())
                    .unwrap_or_else(|| vec!["*".to_string()]),
                max_age: secs("CORS_MAX_AGE", 300),
            },
            rate_limit: RateLimitSettings {
                enabled: get("RATE_LIMIT_ENABLED")
                    .and_then(|v| parse_bool("RATE_LIMIT_ENABLED", &v).ok())
                    .unwrap_or(true),
                requests_per_minute: num("RATE_LIMIT_RPM", 60),
            },
            api_key: get("API_KEY").unwrap_or_default(),
        };
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.is_empty() {
            return Err(ConfigError::MissingVar("DATABASE_URL"));
        }
        if self.api_key.is_empty() && self.version != "dev" {
            return Err(ConfigError::Validation(format!(
                "API_KEY environment variable is required in non-dev environments (APP_VERSION={:?})",
                self.version
            )));
        }
        if self.rate_limit.enabled && self.rate_limit.requests_per_minute == 0 {
            return Err(ConfigError::Validation(
                "RATE_LIMIT_RPM must be at least 1 when rate limiting is enabled".into(),
            ));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::Validation(
                "DB_MAX_IDLE_CONNS cannot exceed DB_MAX_OPEN_CONNS".into(),
            ));
        }
        Ok(())
    }

    pub fn http(&self) -> HttpSettings {
        HttpSettings {
            api_key: self.api_key.clone(),
            request_timeout: self.server.request_timeout,
            cors: self.cors.clone(),
            rate_limit: self.rate_limit,
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
