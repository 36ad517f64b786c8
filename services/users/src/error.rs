use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Users service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum UsersServiceError {
    #[error("user not found")]
    UserNotFound,
    #[error("address not found")]
    AddressNotFound,
    #[error("username already exists")]
    UsernameTaken,
    #[error("mobile already exists")]
    MobileTaken,
    #[error("invalid username")]
    InvalidUsername,
    #[error("invalid mobile")]
    InvalidMobile,
    #[error("invalid password")]
    InvalidPassword,
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("user agreement must be accepted")]
    AgreementRequired,
    #[error("invalid sms code")]
    InvalidSmsCode,
    #[error("invalid email")]
    InvalidEmail,
    #[error("invalid address field: {0}")]
    InvalidAddress(&'static str),
    #[error("invalid title")]
    InvalidTitle,
    #[error("invalid sku_id")]
    InvalidSku,
    #[error("unable to log in with provided credentials")]
    InvalidCredentials,
    #[error("missing token")]
    MissingToken,
    #[error("invalid verification link")]
    InvalidEmailToken,
    #[error("address limit exceeded")]
    AddressLimitExceeded,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("forbidden")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl UsersServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::AddressNotFound => "ADDRESS_NOT_FOUND",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::MobileTaken => "MOBILE_TAKEN",
            Self::InvalidUsername => "INVALID_USERNAME",
            Self::InvalidMobile => "INVALID_MOBILE",
            Self::InvalidPassword => "INVALID_PASSWORD",
            Self::PasswordMismatch => "PASSWORD_MISMATCH",
            Self::AgreementRequired => "AGREEMENT_REQUIRED",
            Self::InvalidSmsCode => "INVALID_SMS_CODE",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidAddress(_) => "INVALID_ADDRESS",
            Self::InvalidTitle => "INVALID_TITLE",
            Self::InvalidSku => "INVALID_SKU",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::MissingToken => "MISSING_TOKEN",
            Self::InvalidEmailToken => "INVALID_EMAIL_TOKEN",
            Self::AddressLimitExceeded => "ADDRESS_LIMIT_EXCEEDED",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::UserNotFound | Self::AddressNotFound => StatusCode::NOT_FOUND,
            Self::UsernameTaken | Self::MobileTaken => StatusCode::CONFLICT,
            Self::InvalidUsername
            | Self::InvalidMobile
            | Self::InvalidPassword
            | Self::PasswordMismatch
            | Self::AgreementRequired
            | Self::InvalidSmsCode
            | Self::InvalidEmail
            | Self::InvalidAddress(_)
            | Self::InvalidTitle
            | Self::InvalidSku
            | Self::InvalidCredentials
            | Self::MissingToken
            | Self::InvalidEmailToken
            | Self::AddressLimitExceeded
            | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for UsersServiceError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for UsersServiceError {
    fn from(rejection: PathRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl From<deadpool_redis::PoolError> for UsersServiceError {
    fn from(e: deadpool_redis::PoolError) -> Self {
        Self::Internal(e.into())
    }
}

impl From<deadpool_redis::redis::RedisError> for UsersServiceError {
    fn from(e: deadpool_redis::redis::RedisError) -> Self {
        Self::Internal(e.into())
    }
}

impl IntoResponse for UsersServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        // 4xx are already visible in the TraceLayer span; only 500s carry a cause worth logging.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
