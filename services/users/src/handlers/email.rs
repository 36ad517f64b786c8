use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use mall_auth_types::identity::AuthUser;
use mall_domain::id::UserId;

use crate::error::UsersServiceError;
use crate::state::AppState;
use crate::usecase::email::{BindEmailUseCase, VerifyEmailUseCase};

use super::MessageResponse;
use super::extract::ApiJson;

// ── PUT /email/ ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct BindEmailRequest {
    pub email: String,
}

#[derive(Serialize)]
pub struct BindEmailResponse {
    pub id: UserId,
    pub email: String,
}

pub async fn bind_email(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<BindEmailRequest>,
) -> Result<Json<BindEmailResponse>, UsersServiceError> {
    let usecase = BindEmailUseCase {
        repo: state.user_repo(),
    };
    let email = usecase
        .execute(
            auth.user_id,
            &body.email,
            state.secret(),
            &state.settings.email_verify_url,
        )
        .await?;
    Ok(Json(BindEmailResponse {
        id: auth.user_id,
        email,
    }))
}

// ── GET /emails/verification/ ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyEmailQuery {
    pub token: Option<String>,
}

pub async fn verify_email(
    State(state): State<AppState>,
    Query(query): Query<VerifyEmailQuery>,
) -> Result<Json<MessageResponse>, UsersServiceError> {
    let usecase = VerifyEmailUseCase {
        repo: state.user_repo(),
    };
    usecase
        .execute(query.token.as_deref(), state.secret())
        .await?;
    Ok(Json(MessageResponse::ok()))
}
