use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Deserializer, Serialize};

use mall_auth_types::identity::AuthUser;
use mall_domain::id::UserId;

use crate::error::UsersServiceError;
use crate::state::AppState;
use crate::usecase::user::{
    CountMobileUseCase, CountUsernameUseCase, GetProfileUseCase, RegisterInput, RegisterUseCase,
};

use super::extract::{ApiJson, ApiPath};

/// Accepts `true` or `"true"`; anything else means the agreement was not accepted.
fn deserialize_allow<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }
    Ok(match Flag::deserialize(d)? {
        Flag::Bool(b) => b,
        Flag::Text(s) => s == "true",
    })
}

// ── POST /users/ ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub password2: String,
    pub mobile: String,
    pub sms_code: String,
    #[serde(default, deserialize_with = "deserialize_allow")]
    pub allow: bool,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub id: UserId,
    pub username: String,
    pub mobile: String,
    pub token: String,
}

pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse, UsersServiceError> {
    let usecase = RegisterUseCase {
        repo: state.user_repo(),
        sms: state.sms_code_store(),
    };
    let out = usecase
        .execute(
            RegisterInput {
                username: body.username,
                password: body.password,
                password2: body.password2,
                mobile: body.mobile,
                sms_code: body.sms_code,
                allow: body.allow,
            },
            state.secret(),
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: out.user.id,
            username: out.user.username,
            mobile: out.user.mobile,
            token: out.token,
        }),
    ))
}

// ── GET /usernames/{username}/count/ ─────────────────────────────────────────

#[derive(Serialize)]
pub struct UsernameCountResponse {
    pub username: String,
    pub count: u64,
}

pub async fn username_count(
    State(state): State<AppState>,
    ApiPath(username): ApiPath<String>,
) -> Result<Json<UsernameCountResponse>, UsersServiceError> {
    let usecase = CountUsernameUseCase {
        repo: state.user_repo(),
    };
    let count = usecase.execute(&username).await?;
    Ok(Json(UsernameCountResponse { username, count }))
}

// ── GET /mobiles/{mobile}/count/ ─────────────────────────────────────────────

#[derive(Serialize)]
pub struct MobileCountResponse {
    pub mobile: String,
    pub count: u64,
}

pub async fn mobile_count(
    State(state): State<AppState>,
    ApiPath(mobile): ApiPath<String>,
) -> Result<Json<MobileCountResponse>, UsersServiceError> {
    let usecase = CountMobileUseCase {
        repo: state.user_repo(),
    };
    let count = usecase.execute(&mobile).await?;
    Ok(Json(MobileCountResponse { mobile, count }))
}

// ── GET /user/ ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ProfileResponse {
    pub id: UserId,
    pub username: String,
    pub mobile: String,
    pub email: Option<String>,
    pub email_active: bool,
}

pub async fn get_profile(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, UsersServiceError> {
    let usecase = GetProfileUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(auth.user_id).await?;
    Ok(Json(ProfileResponse {
        id: user.id,
        username: user.username,
        mobile: user.mobile,
        email: user.email,
        email_active: user.email_active,
    }))
}
