#![allow(async_fn_in_trait)]

use mall_auth_types::cookie::CartCookie;
use mall_domain::id::{AddressId, SkuId, UserId};

use crate::domain::types::{Address, AddressFields, NewUser, OutboxEvent, Sku, User};
use crate::error::UsersServiceError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn count_by_username(&self, username: &str) -> Result<u64, UsersServiceError>;

    async fn count_by_mobile(&self, mobile: &str) -> Result<u64, UsersServiceError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UsersServiceError>;

    /// Find a user whose username or mobile equals `account`.
    async fn find_by_account(&self, account: &str) -> Result<Option<User>, UsersServiceError>;

    /// Insert a user. Unique violations surface as `UsernameTaken` / `MobileTaken`.
    async fn create(&self, user: &NewUser) -> Result<User, UsersServiceError>;

    /// Set the email, reset `email_active`, and insert the outbox event atomically.
    /// Returns `false` if the user does not exist.
    async fn update_email_with_outbox(
        &self,
        id: UserId,
        email: &str,
        event: &OutboxEvent,
    ) -> Result<bool, UsersServiceError>;

    /// Mark the email verified if the user still has exactly this email.
    /// Returns `false` when no such user exists.
    async fn activate_email(&self, id: UserId, email: &str) -> Result<bool, UsersServiceError>;
}

/// Repository for the address book.
pub trait AddressRepository: Send + Sync {
    /// Active addresses of a user, most recently updated first.
    async fn list_active(&self, user_id: UserId) -> Result<Vec<Address>, UsersServiceError>;

    /// Look up an address regardless of status or owner.
    async fn find_by_id(&self, id: AddressId) -> Result<Option<Address>, UsersServiceError>;

    /// Insert an address unless the user already has `limit` active ones.
    ///
    /// Count and insert happen atomically per user. Returns `None` when the limit
    /// was reached and nothing was written.
    async fn create_within_limit(
        &self,
        user_id: UserId,
        fields: &AddressFields,
        limit: u64,
    ) -> Result<Option<Address>, UsersServiceError>;

    /// Overwrite the fields of an active address. `None` if it is missing or deleted.
    async fn update(
        &self,
        id: AddressId,
        fields: &AddressFields,
    ) -> Result<Option<Address>, UsersServiceError>;

    /// Returns `false` if the address is missing or deleted.
    async fn update_title(&self, id: AddressId, title: &str) -> Result<bool, UsersServiceError>;

    /// Mark an address deleted and clear it as the owner's default if it was.
    async fn soft_delete(&self, id: AddressId, user_id: UserId) -> Result<(), UsersServiceError>;

    /// Point the user's default at `id`. Returns `false` if the address is no longer
    /// an active address of that user.
    async fn set_default(&self, user_id: UserId, id: AddressId)
    -> Result<bool, UsersServiceError>;
}

/// Read access to the SKU catalogue.
pub trait SkuRepository: Send + Sync {
    async fn exists(&self, id: SkuId) -> Result<bool, UsersServiceError>;

    /// Fetch the given SKUs. Order is unspecified; missing ids are absent.
    async fn find_by_ids(&self, ids: &[SkuId]) -> Result<Vec<Sku>, UsersServiceError>;
}

/// Per-user capped list of recently viewed SKUs (Redis list).
pub trait BrowseHistoryStore: Send + Sync {
    /// Move `sku_id` to the front of the list and trim it to `limit` entries.
    async fn push(
        &self,
        user_id: UserId,
        sku_id: SkuId,
        limit: usize,
    ) -> Result<(), UsersServiceError>;

    /// Up to `limit` SKU ids, most recent first.
    async fn recent(&self, user_id: UserId, limit: usize) -> Result<Vec<SkuId>, UsersServiceError>;
}

/// SMS verification codes written by the SMS sender (Redis strings).
pub trait SmsCodeStore: Send + Sync {
    async fn get(&self, mobile: &str) -> Result<Option<String>, UsersServiceError>;

    async fn delete(&self, mobile: &str) -> Result<(), UsersServiceError>;
}

/// Server-side shopping cart (Redis hash + set).
pub trait CartStore: Send + Sync {
    /// Merge anonymous cart lines into the user's cart. Cookie counts win.
    async fn merge(&self, user_id: UserId, cart: &CartCookie) -> Result<(), UsersServiceError>;
}
