//! Mock auth helpers for integration tests.
//!
//! Protected endpoints expect `Authorization: JWT <token>`. `MockAuth` signs a
//! real access token with a test secret so requests pass the `AuthUser` extractor
//! without going through login.

use axum::http::{HeaderMap, HeaderValue, header};
use axum_extra::extract::cookie::CookieJar;

use mall_auth_types::cookie::{CART_COOKIE, CartCookie, set_cart_cookie};
use mall_auth_types::identity::JwtSecret;
use mall_auth_types::token::issue_access_token;
use mall_domain::id::UserId;

/// Secret shared by test routers and `MockAuth`.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-unit-tests-only";

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: UserId,
    pub username: String,
}

impl MockAuth {
    pub fn new(user_id: i64, username: &str) -> Self {
        Self {
            user_id: UserId(user_id),
            username: username.to_owned(),
        }
    }

    /// `JwtSecret` matching the tokens this helper signs.
    pub fn secret() -> JwtSecret {
        JwtSecret::new(TEST_JWT_SECRET)
    }

    /// A signed access token for this identity.
    pub fn token(&self) -> String {
        issue_access_token(self.user_id, &self.username, TEST_JWT_SECRET)
            .expect("sign test token")
            .0
    }

    /// Headers as a logged-in browser would send them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("JWT {}", self.token())).expect("header value"),
        );
        map
    }
}

/// `Cookie` header value carrying an anonymous cart.
pub fn cart_cookie_header(cart: &CartCookie) -> HeaderValue {
    let jar = set_cart_cookie(CookieJar::new(), cart);
    let value = jar
        .get(CART_COOKIE)
        .map(|c| format!("{}={}", CART_COOKIE, c.value()))
        .unwrap_or_default();
    HeaderValue::from_str(&value).expect("cookie header value")
}
