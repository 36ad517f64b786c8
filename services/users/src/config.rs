use crate::domain::types::{DEFAULT_ADDRESS_LIMIT, DEFAULT_BROWSE_HISTORY_LIMIT};

/// Users service configuration loaded from environment variables.
#[derive(Debug)]
pub struct UsersConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Redis connection URL (browse history, SMS codes, carts).
    pub redis_url: String,
    /// HMAC secret for access tokens and email-verification links.
    pub jwt_secret: String,
    /// TCP port for the HTTP server (default 3113). Env var: `USERS_PORT`.
    pub users_port: u16,
    /// Maximum active addresses per user (default 20). Env var: `ADDRESS_LIMIT`.
    pub address_limit: u64,
    /// Recently viewed SKUs kept per user (default 5). Env var: `BROWSE_HISTORY_LIMIT`.
    pub browse_history_limit: usize,
    /// Page that receives `?token=` from the verification mail. Env var: `EMAIL_VERIFY_URL`.
    pub email_verify_url: String,
}

fn parsed_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl UsersConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            redis_url: std::env::var("REDIS_URL").expect("REDIS_URL"),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            users_port: parsed_or("USERS_PORT", 3113),
            address_limit: parsed_or("ADDRESS_LIMIT", DEFAULT_ADDRESS_LIMIT),
            browse_history_limit: parsed_or("BROWSE_HISTORY_LIMIT", DEFAULT_BROWSE_HISTORY_LIMIT),
            email_verify_url: std::env::var("EMAIL_VERIFY_URL").unwrap_or_else(|_| {
                "http://www.mall.site:8080/success_verify_email.html".to_owned()
            }),
        }
    }
}
