use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use mall_auth_types::cookie::{CART_COOKIE, clear_cart_cookie, read_cart_cookie};
use mall_domain::id::UserId;

use crate::error::UsersServiceError;
use crate::state::AppState;
use crate::usecase::authorization::{LoginUseCase, MergeCartUseCase};

use super::extract::ApiJson;

// ── POST /authorizations/ ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    /// Username or mobile number.
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: UserId,
    pub username: String,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, UsersServiceError> {
    let usecase = LoginUseCase {
        repo: state.user_repo(),
    };
    let out = usecase
        .execute(&body.username, &body.password, state.secret())
        .await?;

    let merge = MergeCartUseCase {
        cart: state.cart_store(),
    };
    let had_cart = jar.get(CART_COOKIE).is_some();
    merge.execute(out.user.id, read_cart_cookie(&jar)).await;
    let jar = if had_cart { clear_cart_cookie(jar) } else { jar };

    tracing::info!(user_id = %out.user.id, "user logged in");
    Ok((
        jar,
        Json(LoginResponse {
            token: out.token,
            user_id: out.user.id,
            username: out.user.username,
        }),
    ))
}
