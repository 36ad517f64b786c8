use deadpool_redis::Pool;
use deadpool_redis::redis::{self, AsyncCommands};

use mall_auth_types::cookie::CartCookie;
use mall_domain::id::{SkuId, UserId};

use crate::domain::repository::{BrowseHistoryStore, CartStore, SmsCodeStore};
use crate::error::UsersServiceError;

fn history_key(user_id: UserId) -> String {
    format!("history_{}", user_id)
}

fn sms_key(mobile: &str) -> String {
    format!("sms_{}", mobile)
}

fn cart_key(user_id: UserId) -> String {
    format!("cart_{}", user_id)
}

fn cart_selected_key(user_id: UserId) -> String {
    format!("cart_selected_{}", user_id)
}

/// Redis `LRANGE`/`LTRIM` stop index for a list capped at `limit` entries.
/// `None` when nothing may be kept.
fn last_index(limit: usize) -> Option<isize> {
    (limit > 0).then(|| limit as isize - 1)
}

/// Dedupe, prepend and trim in one `MULTI`.
fn push_pipeline(key: &str, sku_id: SkuId, stop: isize) -> redis::Pipeline {
    let mut pipe = redis::pipe();
    pipe.atomic()
        .lrem(key, 0, sku_id.0)
        .ignore()
        .lpush(key, sku_id.0)
        .ignore()
        .ltrim(key, 0, stop)
        .ignore();
    pipe
}

// ── Browse history ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct RedisBrowseHistoryStore {
    pub pool: Pool,
}

impl BrowseHistoryStore for RedisBrowseHistoryStore {
    async fn push(
        &self,
        user_id: UserId,
        sku_id: SkuId,
        limit: usize,
    ) -> Result<(), UsersServiceError> {
        let Some(stop) = last_index(limit) else {
            return Ok(());
        };
        let mut conn = self.pool.get().await?;
        let (): () = push_pipeline(&history_key(user_id), sku_id, stop)
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    async fn recent(&self, user_id: UserId, limit: usize) -> Result<Vec<SkuId>, UsersServiceError> {
        let Some(stop) = last_index(limit) else {
            return Ok(vec![]);
        };
        let mut conn = self.pool.get().await?;
        let ids: Vec<i64> = conn.lrange(history_key(user_id), 0, stop).await?;
        Ok(ids.into_iter().map(SkuId).collect())
    }
}

// ── SMS codes ────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct RedisSmsCodeStore {
    pub pool: Pool,
}

impl SmsCodeStore for RedisSmsCodeStore {
    async fn get(&self, mobile: &str) -> Result<Option<String>, UsersServiceError> {
        let mut conn = self.pool.get().await?;
        let code: Option<String> = conn.get(sms_key(mobile)).await?;
        Ok(code)
    }

    async fn delete(&self, mobile: &str) -> Result<(), UsersServiceError> {
        let mut conn = self.pool.get().await?;
        let _: i64 = conn.del(sms_key(mobile)).await?;
        Ok(())
    }
}

// ── Cart ─────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct RedisCartStore {
    pub pool: Pool,
}

impl CartStore for RedisCartStore {
    async fn merge(&self, user_id: UserId, cart: &CartCookie) -> Result<(), UsersServiceError> {
        if cart.is_empty() {
            return Ok(());
        }
        let mut conn = self.pool.get().await?;
        let counts = cart_key(user_id);
        let selected = cart_selected_key(user_id);

        let mut pipe = redis::pipe();
        pipe.atomic();
        for (sku_id, item) in cart {
            pipe.hset(&counts, sku_id.0, item.count).ignore();
            if item.selected {
                pipe.sadd(&selected, sku_id.0).ignore();
            } else {
                pipe.srem(&selected, sku_id.0).ignore();
            }
        }
        let (): () = pipe.query_async(&mut conn).await?;
        Ok(())
    }
}
