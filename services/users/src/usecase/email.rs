use anyhow::Context as _;
use uuid::Uuid;

use mall_auth_types::token::{issue_email_verify_token, validate_email_verify_token};
use mall_domain::id::UserId;
use mall_domain::user::validate_email;

use crate::domain::repository::UserRepository;
use crate::domain::types::{EMAIL_VERIFICATION_REQUESTED, OutboxEvent};
use crate::error::UsersServiceError;

/// Build the link mailed to the user: `{base}?token={token}`.
pub fn verify_link(base: &str, token: &str) -> String {
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{base}{sep}token={token}")
}

// ── BindEmail ────────────────────────────────────────────────────────────────

pub struct BindEmailUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> BindEmailUseCase<R> {
    /// Store `email` as unverified and enqueue the verification mail.
    pub async fn execute(
        &self,
        user_id: UserId,
        email: &str,
        secret: &str,
        verify_url: &str,
    ) -> Result<String, UsersServiceError> {
        let email = email.trim();
        if !validate_email(email) {
            return Err(UsersServiceError::InvalidEmail);
        }

        let token =
            issue_email_verify_token(user_id, email, secret).context("issue email verify token")?;
        let id = Uuid::now_v7();
        let event = OutboxEvent {
            id,
            kind: EMAIL_VERIFICATION_REQUESTED.to_owned(),
            payload: serde_json::json!({
                "user_id": user_id,
                "email": email,
                "verify_url": verify_link(verify_url, &token),
            }),
            idempotency_key: format!("{EMAIL_VERIFICATION_REQUESTED}:{user_id}:{id}"),
        };

        if !self
            .repo
            .update_email_with_outbox(user_id, email, &event)
            .await?
        {
            return Err(UsersServiceError::UserNotFound);
        }
        tracing::info!(%user_id, event_id = %id, "email verification requested");
        Ok(email.to_owned())
    }
}

// ── VerifyEmail ──────────────────────────────────────────────────────────────

pub struct VerifyEmailUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> VerifyEmailUseCase<R> {
    pub async fn execute(
        &self,
        token: Option<&str>,
        secret: &str,
    ) -> Result<(), UsersServiceError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(UsersServiceError::MissingToken)?;
        let info = validate_email_verify_token(token, secret).map_err(|e| {
            tracing::debug!(error = %e, "rejected email verification token");
            UsersServiceError::InvalidEmailToken
        })?;
        // A token minted for an address the user has since replaced no longer matches.
        if !self.repo.activate_email(info.user_id, &info.email).await? {
            return Err(UsersServiceError::InvalidEmailToken);
        }
        tracing::info!(user_id = %info.user_id, "email verified");
        Ok(())
    }
}
