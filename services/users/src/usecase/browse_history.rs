use std::collections::HashMap;

use mall_domain::id::{SkuId, UserId};

use crate::domain::repository::{BrowseHistoryStore, SkuRepository};
use crate::domain::types::Sku;
use crate::error::UsersServiceError;

// ── RecordBrowseHistory ──────────────────────────────────────────────────────

pub struct RecordBrowseHistoryUseCase<S: SkuRepository, H: BrowseHistoryStore> {
    pub skus: S,
    pub history: H,
}

impl<S: SkuRepository, H: BrowseHistoryStore> RecordBrowseHistoryUseCase<S, H> {
    /// Move `sku_id` to the front of the user's history.
    ///
    /// Only an unknown SKU is an error. A failing history store is logged and
    /// ignored so that product pages keep working while Redis is down.
    pub async fn execute(
        &self,
        user_id: UserId,
        sku_id: SkuId,
        limit: usize,
    ) -> Result<(), UsersServiceError> {
        if !self.skus.exists(sku_id).await? {
            return Err(UsersServiceError::InvalidSku);
        }
        if let Err(e) = self.history.push(user_id, sku_id, limit).await {
            tracing::warn!(error = %e, %user_id, %sku_id, "failed to record browse history");
        }
        Ok(())
    }
}

// ── ListBrowseHistory ────────────────────────────────────────────────────────

pub struct ListBrowseHistoryUseCase<S: SkuRepository, H: BrowseHistoryStore> {
    pub skus: S,
    pub history: H,
}

impl<S: SkuRepository, H: BrowseHistoryStore> ListBrowseHistoryUseCase<S, H> {
    /// Most recently viewed SKUs first, at most `limit`. SKUs that no longer
    /// exist are skipped.
    pub async fn execute(&self, user_id: UserId, limit: usize) -> Result<Vec<Sku>, UsersServiceError> {
        let mut ids = self.history.recent(user_id, limit).await?;
        ids.truncate(limit);

        let mut by_id: HashMap<SkuId, Sku> = self
            .skus
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|sku| (sku.id, sku))
            .collect();
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }
}
