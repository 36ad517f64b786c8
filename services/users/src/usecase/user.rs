use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use mall_domain::id::UserId;
use mall_domain::user::{validate_mobile, validate_password, validate_username};

use crate::domain::repository::{SmsCodeStore, UserRepository};
use crate::domain::types::{NewUser, User};
use crate::error::UsersServiceError;
use crate::usecase::authorization::issue_token;

/// Hash a password using Argon2id.
pub fn hash_password(password: &str) -> Result<String, UsersServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow::anyhow!("hash password: {e}").into())
}

/// Verify a password against a stored PHC string. Malformed hashes never match.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub username: String,
    pub password: String,
    pub password2: String,
    pub mobile: String,
    pub sms_code: String,
    pub allow: bool,
}

pub struct Registered {
    pub user: User,
    pub token: String,
}

pub struct RegisterUseCase<R: UserRepository, S: SmsCodeStore> {
    pub repo: R,
    pub sms: S,
}

impl<R: UserRepository, S: SmsCodeStore> RegisterUseCase<R, S> {
    pub async fn execute(
        &self,
        input: RegisterInput,
        secret: &str,
    ) -> Result<Registered, UsersServiceError> {
        if !validate_username(&input.username) {
            return Err(UsersServiceError::InvalidUsername);
        }
        if !validate_mobile(&input.mobile) {
            return Err(UsersServiceError::InvalidMobile);
        }
        if !validate_password(&input.password) {
            return Err(UsersServiceError::InvalidPassword);
        }
        if input.password != input.password2 {
            return Err(UsersServiceError::PasswordMismatch);
        }
        if !input.allow {
            return Err(UsersServiceError::AgreementRequired);
        }

        match self.sms.get(&input.mobile).await? {
            Some(code) if code == input.sms_code => {}
            _ => return Err(UsersServiceError::InvalidSmsCode),
        }

        if self.repo.count_by_username(&input.username).await? > 0 {
            return Err(UsersServiceError::UsernameTaken);
        }
        if self.repo.count_by_mobile(&input.mobile).await? > 0 {
            return Err(UsersServiceError::MobileTaken);
        }

        let user = self
            .repo
            .create(&NewUser {
                username: input.username,
                mobile: input.mobile,
                password_hash: hash_password(&input.password)?,
            })
            .await?;

        // The code is single-use; it also expires on its own if this fails.
        if let Err(e) = self.sms.delete(&user.mobile).await {
            tracing::warn!(error = %e, user_id = %user.id, "failed to delete used sms code");
        }

        let token = issue_token(&user, secret)?;
        tracing::info!(user_id = %user.id, "user registered");
        Ok(Registered { user, token })
    }
}

// ── CountUsername ────────────────────────────────────────────────────────────

pub struct CountUsernameUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> CountUsernameUseCase<R> {
    pub async fn execute(&self, username: &str) -> Result<u64, UsersServiceError> {
        if !validate_username(username) {
            return Err(UsersServiceError::InvalidUsername);
        }
        self.repo.count_by_username(username).await
    }
}

// ── CountMobile ──────────────────────────────────────────────────────────────

pub struct CountMobileUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> CountMobileUseCase<R> {
    pub async fn execute(&self, mobile: &str) -> Result<u64, UsersServiceError> {
        if !validate_mobile(mobile) {
            return Err(UsersServiceError::InvalidMobile);
        }
        self.repo.count_by_mobile(mobile).await
    }
}

// ── GetProfile ───────────────────────────────────────────────────────────────

pub struct GetProfileUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetProfileUseCase<R> {
    pub async fn execute(&self, user_id: UserId) -> Result<User, UsersServiceError> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(UsersServiceError::UserNotFound)
    }
}
