use anyhow::Context as _;

use mall_auth_types::cookie::CartCookie;
use mall_auth_types::token::issue_access_token;
use mall_domain::id::UserId;

use crate::domain::repository::{CartStore, UserRepository};
use crate::domain::types::User;
use crate::error::UsersServiceError;
use crate::usecase::user::verify_password;

/// Sign a fresh access token for `user`.
pub fn issue_token(user: &User, secret: &str) -> Result<String, UsersServiceError> {
    let (token, _exp) =
        issue_access_token(user.id, &user.username, secret).context("issue access token")?;
    Ok(token)
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoggedIn {
    pub user: User,
    pub token: String,
}

pub struct LoginUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> LoginUseCase<R> {
    /// `account` is either a username or a mobile number.
    pub async fn execute(
        &self,
        account: &str,
        password: &str,
        secret: &str,
    ) -> Result<LoggedIn, UsersServiceError> {
        let user = self
            .repo
            .find_by_account(account)
            .await?
            .ok_or(UsersServiceError::InvalidCredentials)?;
        if !verify_password(password, &user.password_hash) {
            return Err(UsersServiceError::InvalidCredentials);
        }
        let token = issue_token(&user, secret)?;
        Ok(LoggedIn { user, token })
    }
}

// ── MergeCart ────────────────────────────────────────────────────────────────

pub struct MergeCartUseCase<C: CartStore> {
    pub cart: C,
}

impl<C: CartStore> MergeCartUseCase<C> {
    /// Merge the anonymous cart into the user's cart. Failures are logged and
    /// swallowed so that login never fails because of the cart.
    pub async fn execute(&self, user_id: UserId, cookie: Option<CartCookie>) {
        let Some(cookie) = cookie else {
            return;
        };
        match self.cart.merge(user_id, &cookie).await {
            Ok(()) => tracing::debug!(%user_id, lines = cookie.len(), "merged cart cookie"),
            Err(e) => tracing::warn!(error = %e, %user_id, "failed to merge cart cookie"),
        }
    }
}
