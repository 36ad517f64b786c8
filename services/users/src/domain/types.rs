use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mall_domain::id::{AddressId, SkuId, UserId};
use mall_domain::user::{validate_email, validate_mobile};

/// Maximum number of active addresses per user.
pub const DEFAULT_ADDRESS_LIMIT: u64 = 20;

/// Number of recently viewed SKUs kept per user.
pub const DEFAULT_BROWSE_HISTORY_LIMIT: usize = 5;

/// Registered account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub mobile: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    pub email: Option<String>,
    pub email_active: bool,
    pub default_address_id: Option<AddressId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Account data for a user that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub mobile: String,
    pub password_hash: String,
}

/// Lifecycle of an address. Deleted addresses stay in storage but disappear
/// from the address book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressStatus {
    Active = 0,
    Deleted = 1,
}

impl AddressStatus {
    /// Convert from the stored `smallint`. Returns `None` for unknown values.
    pub fn from_i16(v: i16) -> Option<Self> {
        match v {
            0 => Some(Self::Active),
            1 => Some(Self::Deleted),
            _ => None,
        }
    }

    pub fn as_i16(self) -> i16 {
        self as i16
    }
}

/// Editable part of an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressFields {
    pub title: String,
    pub receiver: String,
    pub province_id: i32,
    pub city_id: i32,
    pub district_id: i32,
    pub place: String,
    pub mobile: String,
    pub tel: Option<String>,
    pub email: Option<String>,
}

/// Shipping address in a user's address book.
#[derive(Debug, Clone)]
pub struct Address {
    pub id: AddressId,
    pub user_id: UserId,
    pub fields: AddressFields,
    pub status: AddressStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Address {
    pub fn is_active(&self) -> bool {
        self.status == AddressStatus::Active
    }
}

/// Active addresses of a user together with the default marker and the limit.
#[derive(Debug, Clone)]
pub struct AddressBook {
    pub user_id: UserId,
    pub default_address_id: Option<AddressId>,
    pub limit: u64,
    pub addresses: Vec<Address>,
}

/// Catalogue entry shown in the browsing history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sku {
    pub id: SkuId,
    pub name: String,
    pub price: Decimal,
    pub default_image_url: Option<String>,
    pub comments: i32,
}

/// Outbox event for async delivery (e.g. verification email).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEvent {
    pub id: Uuid,
    pub kind: String,
    pub payload: serde_json::Value,
    pub idempotency_key: String,
}

/// Outbox kind consumed by the mail worker.
pub const EMAIL_VERIFICATION_REQUESTED: &str = "email_verification_requested";

fn len_between(s: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&s.chars().count())
}

/// Validate an address title: 1-20 characters after trimming.
pub fn validate_title(title: &str) -> bool {
    len_between(title.trim(), 1, 20)
}

/// Validate address fields, returning the name of the first offending field.
pub fn validate_address(fields: &AddressFields) -> Result<(), &'static str> {
    if !validate_title(&fields.title) {
        return Err("title");
    }
    if !len_between(fields.receiver.trim(), 1, 20) {
        return Err("receiver");
    }
    if fields.province_id <= 0 || fields.city_id <= 0 || fields.district_id <= 0 {
        return Err("area");
    }
    if !len_between(fields.place.trim(), 1, 50) {
        return Err("place");
    }
    if !validate_mobile(&fields.mobile) {
        return Err("mobile");
    }
    if let Some(tel) = fields.tel.as_deref() {
        if tel.chars().count() > 20 {
            return Err("tel");
        }
    }
    if let Some(email) = fields.email.as_deref() {
        if !validate_email(email) {
            return Err("email");
        }
    }
    Ok(())
}
