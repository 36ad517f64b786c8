use std::sync::Arc;

use sea_orm::Database;
use tracing::info;

use mall_auth_types::identity::JwtSecret;
use mall_core::tracing::init_tracing;
use mall_users::config::UsersConfig;
use mall_users::router::build_router;
use mall_users::state::{AppState, Settings};

#[tokio::main]
async fn main() {
    init_tracing("mall-users");

    let config = UsersConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let redis_cfg = deadpool_redis::Config::from_url(&config.redis_url);
    let redis = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .expect("failed to create Redis pool");

    let state = AppState {
        db,
        redis,
        jwt_secret: JwtSecret::new(config.jwt_secret),
        settings: Arc::new(Settings {
            address_limit: config.address_limit,
            browse_history_limit: config.browse_history_limit,
            email_verify_url: config.email_verify_url,
        }),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.users_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!(
        address_limit = config.address_limit,
        browse_history_limit = config.browse_history_limit,
        "users service listening on {addr}"
    );
    axum::serve(listener, router).await.expect("server error");
}
