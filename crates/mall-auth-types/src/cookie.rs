//! Anonymous shopping-cart cookie.
//!
//! Before login the cart lives in a `cart` cookie holding base64(JSON) of
//! `{"<sku_id>": {"count": n, "selected": bool}}`. Login merges it into the
//! user's server-side cart and clears the cookie.

use std::collections::BTreeMap;

use axum_extra::extract::cookie::{Cookie, CookieJar};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use time::Duration;

use mall_domain::id::SkuId;

/// Cookie name for the anonymous cart.
pub const CART_COOKIE: &str = "cart";

/// Cart cookie Max-Age in seconds (1 day).
pub const CART_COOKIE_EXP: i64 = 86400;

/// One cart line as stored in the cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartCookieItem {
    pub count: u32,
    pub selected: bool,
}

/// Decoded cart cookie, keyed by SKU.
pub type CartCookie = BTreeMap<SkuId, CartCookieItem>;

/// Encode cart lines into a cookie value.
///
/// ```
/// use mall_auth_types::cookie::{CartCookie, CartCookieItem, decode_cart_cookie, encode_cart_cookie};
/// use mall_domain::id::SkuId;
///
/// let mut cart = CartCookie::new();
/// cart.insert(SkuId(1), CartCookieItem { count: 2, selected: true });
/// let value = encode_cart_cookie(&cart);
/// assert_eq!(decode_cart_cookie(&value), Some(cart));
/// ```
pub fn encode_cart_cookie(cart: &CartCookie) -> String {
    // A map with integer keys and plain structs always serializes.
    let json = serde_json::to_vec(cart).unwrap_or_default();
    STANDARD.encode(json)
}

/// Decode a cookie value. Returns `None` for anything that is not valid base64 JSON.
pub fn decode_cart_cookie(value: &str) -> Option<CartCookie> {
    let bytes = STANDARD.decode(value.trim()).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Read and decode the cart cookie from the jar, if present and well formed.
pub fn read_cart_cookie(jar: &CookieJar) -> Option<CartCookie> {
    let cookie = jar.get(CART_COOKIE)?;
    let cart = decode_cart_cookie(cookie.value());
    if cart.is_none() {
        tracing::debug!("ignoring undecodable cart cookie");
    }
    cart
}

/// Set the cart cookie on the jar.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use mall_auth_types::cookie::{set_cart_cookie, CartCookie, CART_COOKIE};
///
/// let jar = set_cart_cookie(CookieJar::new(), &CartCookie::new());
/// let cookie = jar.get(CART_COOKIE).unwrap();
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(86400)));
/// ```
pub fn set_cart_cookie(jar: CookieJar, cart: &CartCookie) -> CookieJar {
    let cookie = Cookie::build((CART_COOKIE, encode_cart_cookie(cart)))
        .path("/")
        .max_age(Duration::seconds(CART_COOKIE_EXP))
        .http_only(true)
        .build();
    jar.add(cookie)
}

/// Clear the cart cookie by setting Max-Age to 0.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use mall_auth_types::cookie::{clear_cart_cookie, set_cart_cookie, CartCookie, CART_COOKIE};
///
/// let jar = set_cart_cookie(CookieJar::new(), &CartCookie::new());
/// let jar = clear_cart_cookie(jar);
/// let cookie = jar.get(CART_COOKIE).unwrap();
/// assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
/// assert_eq!(cookie.value(), "");
/// ```
pub fn clear_cart_cookie(jar: CookieJar) -> CookieJar {
    let cookie = Cookie::build((CART_COOKIE, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .http_only(true)
        .build();
    jar.add(cookie)
}
