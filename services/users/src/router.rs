use axum::{
    Router,
    routing::{get, post, put},
};

use mall_core::health::{healthz, readyz};
use mall_core::middleware::with_observability;

use crate::handlers::{
    address::{
        create_address, delete_address, list_addresses, rename_address, set_default_address,
        update_address,
    },
    authorization::login,
    browse_history::{list_browse_history, record_browse_history},
    email::{bind_email, verify_email},
    user::{get_profile, mobile_count, register, username_count},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz::<AppState>))
        // Accounts
        .route("/users/", post(register))
        .route("/usernames/{username}/count/", get(username_count))
        .route("/mobiles/{mobile}/count/", get(mobile_count))
        .route("/authorizations/", post(login))
        .route("/user/", get(get_profile))
        // Email
        .route("/email/", put(bind_email))
        .route("/emails/verification/", get(verify_email))
        // Address book
        .route("/addresses/", get(list_addresses).post(create_address))
        .route("/addresses/{id}/", put(update_address).delete(delete_address))
        .route("/addresses/{id}/status/", put(set_default_address))
        .route("/addresses/{id}/title/", put(rename_address))
        // Browse history
        .route(
            "/browse_histories/",
            get(list_browse_history).post(record_browse_history),
        )
        .with_state(state);
    with_observability(router)
}
