//! `Authorization` header extractor.

use std::sync::Arc;

use axum::Json;
use axum::extract::{FromRef, FromRequestParts};
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use http::header::AUTHORIZATION;
use http::request::Parts;

use mall_domain::id::UserId;

use crate::token::validate_access_token;

/// HMAC secret used to validate access tokens. Exposed to the extractor via `FromRef`.
#[derive(Clone)]
pub struct JwtSecret(pub Arc<str>);

impl JwtSecret {
    pub fn new(secret: impl Into<Arc<str>>) -> Self {
        Self(secret.into())
    }
}

/// Authenticated caller, taken from `Authorization: JWT <token>`.
///
/// `Bearer` is accepted as an alias for the `JWT` scheme.
/// Returns 401 when the header is absent, uses another scheme, or carries a token
/// that fails validation.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: UserId,
    pub username: String,
}

/// Rejection produced by [`AuthUser`].
#[derive(Debug, thiserror::Error)]
pub enum AuthRejection {
    #[error("authentication credentials were not provided")]
    MissingToken,
    #[error("invalid token")]
    InvalidToken,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "kind": "UNAUTHORIZED",
            "message": self.to_string(),
        });
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

/// Split an `Authorization` header value into its token, if the scheme is supported.
pub fn parse_authorization(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    let supported = scheme.eq_ignore_ascii_case("jwt") || scheme.eq_ignore_ascii_case("bearer");
    (supported && !token.is_empty()).then_some(token)
}

impl<S> FromRequestParts<S> for AuthUser
where
    JwtSecret: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    // axum-core 0.5 declares this as `fn -> impl Future + Send`; pull everything
    // out of `parts` synchronously and return a 'static future.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let secret = JwtSecret::from_ref(state);
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_authorization)
            .map(str::to_owned);

        async move {
            let token = token.ok_or(AuthRejection::MissingToken)?;
            let info = validate_access_token(&token, &secret.0).map_err(|e| {
                tracing::debug!(error = %e, "rejected access token");
                AuthRejection::InvalidToken
            })?;
            Ok(Self {
                user_id: info.user_id,
                username: info.username,
            })
        }
    }
}
