use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use rust_decimal::Decimal;

use mall_auth_types::cookie::CartCookie;
use mall_domain::id::{AddressId, SkuId, UserId};
use mall_users::domain::repository::{
    AddressRepository, BrowseHistoryStore, CartStore, SkuRepository, SmsCodeStore, UserRepository,
};
use mall_users::domain::types::{
    Address, AddressFields, AddressStatus, NewUser, OutboxEvent, Sku, User,
};
use mall_users::error::UsersServiceError;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

// ── Shared database ──────────────────────────────────────────────────────────

/// Rows that the user and address repositories share, like two tables in one
/// database.
#[derive(Default)]
pub struct Tables {
    pub users: Vec<User>,
    pub addresses: Vec<Address>,
    pub outbox: Vec<OutboxEvent>,
}

#[derive(Clone, Default)]
pub struct TestDb {
    pub tables: Arc<Mutex<Tables>>,
}

impl TestDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_repo(&self) -> MockUserRepo {
        MockUserRepo { db: self.clone() }
    }

    pub fn address_repo(&self) -> MockAddressRepo {
        MockAddressRepo { db: self.clone() }
    }

    /// Insert a user directly, bypassing registration.
    pub fn seed_user(&self, id: i64, username: &str) -> UserId {
        let now = Utc::now();
        self.tables.lock().unwrap().users.push(User {
            id: UserId(id),
            username: username.to_owned(),
            mobile: format!("138{id:08}"),
            password_hash: String::new(),
            email: None,
            email_active: false,
            default_address_id: None,
            created_at: now,
            updated_at: now,
        });
        UserId(id)
    }

    pub fn user(&self, id: UserId) -> User {
        let tables = self.tables.lock().unwrap();
        tables.users.iter().find(|u| u.id == id).cloned().unwrap()
    }

    pub fn active_count(&self, user_id: UserId) -> usize {
        let tables = self.tables.lock().unwrap();
        tables
            .addresses
            .iter()
            .filter(|a| a.user_id == user_id && a.is_active())
            .count()
    }
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

pub struct MockUserRepo {
    pub db: TestDb,
}

impl UserRepository for MockUserRepo {
    async fn count_by_username(&self, username: &str) -> Result<u64, UsersServiceError> {
        let tables = self.db.tables.lock().unwrap();
        Ok(tables.users.iter().filter(|u| u.username == username).count() as u64)
    }

    async fn count_by_mobile(&self, mobile: &str) -> Result<u64, UsersServiceError> {
        let tables = self.db.tables.lock().unwrap();
        Ok(tables.users.iter().filter(|u| u.mobile == mobile).count() as u64)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UsersServiceError> {
        let tables = self.db.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_account(&self, account: &str) -> Result<Option<User>, UsersServiceError> {
        let tables = self.db.tables.lock().unwrap();
        Ok(tables
            .users
            .iter()
            .find(|u| u.username == account || u.mobile == account)
            .cloned())
    }

    async fn create(&self, user: &NewUser) -> Result<User, UsersServiceError> {
        let mut tables = self.db.tables.lock().unwrap();
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(UsersServiceError::UsernameTaken);
        }
        if tables.users.iter().any(|u| u.mobile == user.mobile) {
            return Err(UsersServiceError::MobileTaken);
        }
        let now = Utc::now();
        let created = User {
            id: UserId(tables.users.len() as i64 + 1),
            username: user.username.clone(),
            mobile: user.mobile.clone(),
            password_hash: user.password_hash.clone(),
            email: None,
            email_active: false,
            default_address_id: None,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn update_email_with_outbox(
        &self,
        id: UserId,
        email: &str,
        event: &OutboxEvent,
    ) -> Result<bool, UsersServiceError> {
        let mut tables = self.db.tables.lock().unwrap();
        let Some(user) = tables.users.iter_mut().find(|u| u.id == id) else {
            return Ok(false);
        };
        user.email = Some(email.to_owned());
        user.email_active = false;
        tables.outbox.push(event.clone());
        Ok(true)
    }

    async fn activate_email(&self, id: UserId, email: &str) -> Result<bool, UsersServiceError> {
        let mut tables = self.db.tables.lock().unwrap();
        let Some(user) = tables
            .users
            .iter_mut()
            .find(|u| u.id == id && u.email.as_deref() == Some(email))
        else {
            return Ok(false);
        };
        user.email_active = true;
        Ok(true)
    }
}

// ── MockAddressRepo ──────────────────────────────────────────────────────────

pub struct MockAddressRepo {
    pub db: TestDb,
}

impl AddressRepository for MockAddressRepo {
    async fn list_active(&self, user_id: UserId) -> Result<Vec<Address>, UsersServiceError> {
        let tables = self.db.tables.lock().unwrap();
        let mut list: Vec<Address> = tables
            .addresses
            .iter()
            .filter(|a| a.user_id == user_id && a.is_active())
            .cloned()
            .collect();
        list.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(list)
    }

    async fn find_by_id(&self, id: AddressId) -> Result<Option<Address>, UsersServiceError> {
        let tables = self.db.tables.lock().unwrap();
        Ok(tables.addresses.iter().find(|a| a.id == id).cloned())
    }

    async fn create_within_limit(
        &self,
        user_id: UserId,
        fields: &AddressFields,
        limit: u64,
    ) -> Result<Option<Address>, UsersServiceError> {
        // Holding the lock for count + insert mirrors the row lock in Postgres.
        let mut tables = self.db.tables.lock().unwrap();
        let active = tables
            .addresses
            .iter()
            .filter(|a| a.user_id == user_id && a.is_active())
            .count() as u64;
        if active >= limit {
            return Ok(None);
        }
        let now = Utc::now();
        let address = Address {
            id: AddressId(tables.addresses.len() as i64 + 1),
            user_id,
            fields: fields.clone(),
            status: AddressStatus::Active,
            created_at: now,
            updated_at: now,
        };
        tables.addresses.push(address.clone());
        Ok(Some(address))
    }

    async fn update(
        &self,
        id: AddressId,
        fields: &AddressFields,
    ) -> Result<Option<Address>, UsersServiceError> {
        let mut tables = self.db.tables.lock().unwrap();
        let Some(address) = tables
            .addresses
            .iter_mut()
            .find(|a| a.id == id && a.is_active())
        else {
            return Ok(None);
        };
        address.fields = fields.clone();
        address.updated_at = Utc::now();
        Ok(Some(address.clone()))
    }

    async fn update_title(&self, id: AddressId, title: &str) -> Result<bool, UsersServiceError> {
        let mut tables = self.db.tables.lock().unwrap();
        let Some(address) = tables
            .addresses
            .iter_mut()
            .find(|a| a.id == id && a.is_active())
        else {
            return Ok(false);
        };
        address.fields.title = title.to_owned();
        address.updated_at = Utc::now();
        Ok(true)
    }

    async fn soft_delete(&self, id: AddressId, user_id: UserId) -> Result<(), UsersServiceError> {
        let mut tables = self.db.tables.lock().unwrap();
        if let Some(address) = tables.addresses.iter_mut().find(|a| a.id == id) {
            address.status = AddressStatus::Deleted;
            address.updated_at = Utc::now();
        }
        if let Some(user) = tables
            .users
            .iter_mut()
            .find(|u| u.id == user_id && u.default_address_id == Some(id))
        {
            user.default_address_id = None;
        }
        Ok(())
    }

    async fn set_default(
        &self,
        user_id: UserId,
        id: AddressId,
    ) -> Result<bool, UsersServiceError> {
        let mut tables = self.db.tables.lock().unwrap();
        let owned = tables
            .addresses
            .iter()
            .any(|a| a.id == id && a.user_id == user_id && a.is_active());
        if !owned {
            return Ok(false);
        }
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == user_id) {
            user.default_address_id = Some(id);
        }
        Ok(true)
    }
}

pub fn address_fields(title: &str) -> AddressFields {
    AddressFields {
        title: title.to_owned(),
        receiver: "Alice".into(),
        province_id: 110000,
        city_id: 110100,
        district_id: 110101,
        place: "1 Chang'an Avenue".into(),
        mobile: "13800138000".into(),
        tel: None,
        email: None,
    }
}

// ── MockSkuRepo ──────────────────────────────────────────────────────────────

pub struct MockSkuRepo {
    pub skus: Vec<Sku>,
}

impl MockSkuRepo {
    /// Catalogue with SKUs `1..=n`.
    pub fn with_range(n: i64) -> Self {
        Self {
            skus: (1..=n).map(test_sku).collect(),
        }
    }
}

impl SkuRepository for MockSkuRepo {
    async fn exists(&self, id: SkuId) -> Result<bool, UsersServiceError> {
        Ok(self.skus.iter().any(|s| s.id == id))
    }

    async fn find_by_ids(&self, ids: &[SkuId]) -> Result<Vec<Sku>, UsersServiceError> {
        // Database order, not request order.
        Ok(self
            .skus
            .iter()
            .filter(|s| ids.contains(&s.id))
            .cloned()
            .collect())
    }
}

pub fn test_sku(id: i64) -> Sku {
    Sku {
        id: SkuId(id),
        name: format!("SKU {id}"),
        price: Decimal::new(id * 100 + 99, 2),
        default_image_url: Some(format!("http://img.mall.site/{id}.jpg")),
        comments: 0,
    }
}

// ── MockHistory ──────────────────────────────────────────────────────────────

/// Redis list semantics: LREM + LPUSH + LTRIM on push, LRANGE on read.
#[derive(Clone, Default)]
pub struct MockHistory {
    pub lists: Arc<Mutex<HashMap<UserId, Vec<SkuId>>>>,
}

impl BrowseHistoryStore for MockHistory {
    async fn push(
        &self,
        user_id: UserId,
        sku_id: SkuId,
        limit: usize,
    ) -> Result<(), UsersServiceError> {
        let mut lists = self.lists.lock().unwrap();
        let list = lists.entry(user_id).or_default();
        list.retain(|id| *id != sku_id);
        list.insert(0, sku_id);
        list.truncate(limit.max(1));
        Ok(())
    }

    async fn recent(&self, user_id: UserId, limit: usize) -> Result<Vec<SkuId>, UsersServiceError> {
        let lists = self.lists.lock().unwrap();
        Ok(lists
            .get(&user_id)
            .map(|l| l.iter().take(limit.max(1)).copied().collect())
            .unwrap_or_default())
    }
}

// ── MockSmsStore ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockSmsStore {
    pub codes: Arc<Mutex<HashMap<String, String>>>,
}

impl MockSmsStore {
    pub fn with_code(mobile: &str, code: &str) -> Self {
        let store = Self::default();
        store
            .codes
            .lock()
            .unwrap()
            .insert(mobile.to_owned(), code.to_owned());
        store
    }
}

impl SmsCodeStore for MockSmsStore {
    async fn get(&self, mobile: &str) -> Result<Option<String>, UsersServiceError> {
        Ok(self.codes.lock().unwrap().get(mobile).cloned())
    }

    async fn delete(&self, mobile: &str) -> Result<(), UsersServiceError> {
        self.codes.lock().unwrap().remove(mobile);
        Ok(())
    }
}

// ── MockCartStore ────────────────────────────────────────────────────────────

/// Redis hash of counts plus a set of selected SKUs, per user.
#[derive(Clone, Default)]
pub struct MockCartStore {
    pub counts: Arc<Mutex<HashMap<UserId, BTreeMap<SkuId, u32>>>>,
    pub selected: Arc<Mutex<HashMap<UserId, BTreeSet<SkuId>>>>,
}

impl CartStore for MockCartStore {
    async fn merge(&self, user_id: UserId, cart: &CartCookie) -> Result<(), UsersServiceError> {
        let mut counts = self.counts.lock().unwrap();
        let mut selected = self.selected.lock().unwrap();
        let counts = counts.entry(user_id).or_default();
        let selected = selected.entry(user_id).or_default();
        for (sku_id, item) in cart {
            counts.insert(*sku_id, item.count);
            if item.selected {
                selected.insert(*sku_id);
            } else {
                selected.remove(sku_id);
            }
        }
        Ok(())
    }
}
