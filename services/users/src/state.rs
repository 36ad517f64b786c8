use std::sync::Arc;

use axum::extract::FromRef;
use deadpool_redis::Pool as RedisPool;
use deadpool_redis::redis;
use sea_orm::DatabaseConnection;

use mall_auth_types::identity::JwtSecret;
use mall_core::health::ReadinessProbe;

use crate::infra::cache::{RedisBrowseHistoryStore, RedisCartStore, RedisSmsCodeStore};
use crate::infra::db::{DbAddressRepository, DbSkuRepository, DbUserRepository};

/// Tunables that use cases read on every request.
#[derive(Debug, Clone)]
pub struct Settings {
    pub address_limit: u64,
    pub browse_history_limit: usize,
    pub email_verify_url: String,
}

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub redis: RedisPool,
    pub jwt_secret: JwtSecret,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn address_repo(&self) -> DbAddressRepository {
        DbAddressRepository {
            db: self.db.clone(),
        }
    }

    pub fn sku_repo(&self) -> DbSkuRepository {
        DbSkuRepository {
            db: self.db.clone(),
        }
    }

    pub fn browse_history_store(&self) -> RedisBrowseHistoryStore {
        RedisBrowseHistoryStore {
            pool: self.redis.clone(),
        }
    }

    pub fn sms_code_store(&self) -> RedisSmsCodeStore {
        RedisSmsCodeStore {
            pool: self.redis.clone(),
        }
    }

    pub fn cart_store(&self) -> RedisCartStore {
        RedisCartStore {
            pool: self.redis.clone(),
        }
    }

    pub fn secret(&self) -> &str {
        &self.jwt_secret.0
    }
}

impl FromRef<AppState> for JwtSecret {
    fn from_ref(state: &AppState) -> Self {
        state.jwt_secret.clone()
    }
}

impl ReadinessProbe for AppState {
    async fn ready(&self) -> bool {
        if let Err(e) = self.db.ping().await {
            tracing::warn!(error = %e, "database not ready");
            return false;
        }
        let mut conn = match self.redis.get().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!(error = %e, "redis pool not ready");
                return false;
            }
        };
        let pong: Result<String, _> = redis::cmd("PING").query_async(&mut conn).await;
        if let Err(e) = pong {
            tracing::warn!(error = %e, "redis not ready");
            return false;
        }
        true
    }
}
