//! JWT issue and validation for access tokens and email-verification links.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use mall_domain::id::UserId;

/// Access-token JWT lifetime in seconds (1 day).
pub const ACCESS_TOKEN_EXP: u64 = 86400;

/// Email-verification token lifetime in seconds (1 day).
pub const EMAIL_VERIFY_TOKEN_EXP: u64 = 86400;

const EMAIL_VERIFY_PURPOSE: &str = "verify_email";

/// User identity extracted from a validated access token.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub user_id: UserId,
    pub username: String,
    pub access_token_exp: u64,
}

/// Identity extracted from a validated email-verification token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailVerifyInfo {
    pub user_id: UserId,
    pub email: String,
}

/// Errors returned by the token functions in this module.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// JWT claims payload of an access token.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | user ID as a decimal string |
/// | `username` | custom | username at issue time |
/// | `exp` | `exp` | expiration, seconds since epoch |
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub username: String,
    pub exp: u64,
}

/// JWT claims payload of an email-verification link token.
///
/// `purpose` keeps an access token from being replayed as a verification
/// token and vice versa (each lacks the other's required custom claim).
#[derive(Debug, Serialize, Deserialize)]
pub struct EmailVerifyClaims {
    pub sub: String,
    pub email: String,
    pub purpose: String,
    pub exp: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

fn sign<T: Serialize>(claims: &T, secret: &str) -> Result<String, AuthError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(AuthError::Signing)
}

// ── Core decode (private) ────────────────────────────────────────────────

/// Decode and validate a JWT.
///
/// Validation: HS256, exp checked, required claims: `exp` + `sub`.
/// Default leeway = 60s.
fn decode_jwt<T: for<'de> Deserialize<'de>>(token: &str, secret: &str) -> Result<T, AuthError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<T>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature
        | jsonwebtoken::errors::ErrorKind::InvalidEcdsaKey
        | jsonwebtoken::errors::ErrorKind::InvalidRsaKey(_) => AuthError::InvalidSignature,
        _ => AuthError::Malformed,
    })?;

    Ok(data.claims)
}

// ── Access tokens ────────────────────────────────────────────────────────

/// Issue an access token. Returns the token and its expiry timestamp.
pub fn issue_access_token(
    user_id: UserId,
    username: &str,
    secret: &str,
) -> Result<(String, u64), AuthError> {
    let exp = now_secs() + ACCESS_TOKEN_EXP;
    let claims = JwtClaims {
        sub: user_id.to_string(),
        username: username.to_owned(),
        exp,
    };
    Ok((sign(&claims, secret)?, exp))
}

/// Validate an access token, returning parsed identity.
pub fn validate_access_token(token: &str, secret: &str) -> Result<TokenInfo, AuthError> {
    let claims: JwtClaims = decode_jwt(token, secret)?;
    let user_id = claims
        .sub
        .parse::<UserId>()
        .map_err(|_| AuthError::Malformed)?;
    Ok(TokenInfo {
        user_id,
        username: claims.username,
        access_token_exp: claims.exp,
    })
}

// ── Email verification tokens ────────────────────────────────────────────

/// Issue the token embedded in an email-verification link.
pub fn issue_email_verify_token(
    user_id: UserId,
    email: &str,
    secret: &str,
) -> Result<String, AuthError> {
    let claims = EmailVerifyClaims {
        sub: user_id.to_string(),
        email: email.to_owned(),
        purpose: EMAIL_VERIFY_PURPOSE.to_owned(),
        exp: now_secs() + EMAIL_VERIFY_TOKEN_EXP,
    };
    sign(&claims, secret)
}

/// Validate an email-verification token.
pub fn validate_email_verify_token(
    token: &str,
    secret: &str,
) -> Result<EmailVerifyInfo, AuthError> {
    let claims: EmailVerifyClaims = decode_jwt(token, secret)?;
    if claims.purpose != EMAIL_VERIFY_PURPOSE {
        return Err(AuthError::Malformed);
    }
    let user_id = claims
        .sub
        .parse::<UserId>()
        .map_err(|_| AuthError::Malformed)?;
    Ok(EmailVerifyInfo {
        user_id,
        email: claims.email,
    })
}
