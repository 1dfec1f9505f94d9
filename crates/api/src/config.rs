use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except `JWT_SECRET` have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory uploaded media lands in (stand-in for the external media host).
    pub media_dir: String,
    /// Public base URL prefixed onto upload and unsubscribe links.
    pub public_base_url: String,
    /// Shared secret for the email delivery webhook. The webhook route
    /// rejects everything when unset.
    pub webhook_secret: Option<String>,
    /// Unsubscribe token lifetime in days (default: `30`).
    pub unsubscribe_token_ttl_days: i64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                 |
    /// |------------------------------|-------------------------|
    /// | `HOST`                       | `0.0.0.0`               |
    /// | `PORT`                       | `3000`                  |
    /// | `CORS_ORIGINS`               | `http://localhost:3001` |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                    |
    /// | `MEDIA_DIR`                  | `./media`               |
    /// | `PUBLIC_BASE_URL`            | `http://localhost:3000` |
    /// | `WEBHOOK_SECRET`             | unset                   |
    /// | `UNSUBSCRIBE_TOKEN_TTL_DAYS` | `30`                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3001".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let media_dir = std::env::var("MEDIA_DIR").unwrap_or_else(|_| "./media".into());

        let public_base_url =
            std::env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".into());

        let webhook_secret = std::env::var("WEBHOOK_SECRET").ok().filter(|s| !s.is_empty());

        let unsubscribe_token_ttl_days: i64 = std::env::var("UNSUBSCRIBE_TOKEN_TTL_DAYS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("UNSUBSCRIBE_TOKEN_TTL_DAYS must be a valid i64");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            media_dir,
            public_base_url,
            webhook_secret,
            unsubscribe_token_ttl_days,
            jwt,
        }
    }
}

/// Whether the process runs with production error redaction
/// (`APP_ENV=production`). Read once; the split is an operational policy,
/// not per-request state.
pub fn is_production() -> bool {
    static PRODUCTION: once_cell::sync::Lazy<bool> = once_cell::sync::Lazy::new(|| {
        std::env::var("APP_ENV").map(|v| v == "production").unwrap_or(false)
    });
    *PRODUCTION
}
