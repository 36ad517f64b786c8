use serde::Serialize;

pub mod address;
pub mod authorization;
pub mod browse_history;
pub mod email;
pub mod extract;
pub mod user;

/// `{"message": "OK"}` acknowledgement body.
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn ok() -> Self {
        Self { message: "OK" }
    }
}
