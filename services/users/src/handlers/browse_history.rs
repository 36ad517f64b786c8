use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mall_auth_types::identity::AuthUser;
use mall_domain::id::SkuId;

use crate::domain::types::Sku;
use crate::error::UsersServiceError;
use crate::state::AppState;
use crate::usecase::browse_history::{ListBrowseHistoryUseCase, RecordBrowseHistoryUseCase};

use super::extract::ApiJson;

// ── POST /browse_histories/ ──────────────────────────────────────────────────

#[derive(Deserialize, Serialize)]
pub struct RecordBrowseHistoryRequest {
    pub sku_id: SkuId,
}

pub async fn record_browse_history(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RecordBrowseHistoryRequest>,
) -> Result<impl IntoResponse, UsersServiceError> {
    let usecase = RecordBrowseHistoryUseCase {
        skus: state.sku_repo(),
        history: state.browse_history_store(),
    };
    usecase
        .execute(auth.user_id, body.sku_id, state.settings.browse_history_limit)
        .await?;
    Ok((StatusCode::CREATED, Json(body)))
}

// ── GET /browse_histories/ ───────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SkuResponse {
    pub id: SkuId,
    pub name: String,
    pub price: Decimal,
    pub default_image_url: Option<String>,
    pub comments: i32,
}

impl From<Sku> for SkuResponse {
    fn from(sku: Sku) -> Self {
        Self {
            id: sku.id,
            name: sku.name,
            price: sku.price,
            default_image_url: sku.default_image_url,
            comments: sku.comments,
        }
    }
}

pub async fn list_browse_history(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<SkuResponse>>, UsersServiceError> {
    let usecase = ListBrowseHistoryUseCase {
        skus: state.sku_repo(),
        history: state.browse_history_store(),
    };
    let skus = usecase
        .execute(auth.user_id, state.settings.browse_history_limit)
        .await?;
    Ok(Json(skus.into_iter().map(SkuResponse::from).collect()))
}
