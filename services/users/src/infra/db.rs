use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, Condition,
    DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, SqlErr, TransactionTrait, sea_query::Expr,
};

use mall_domain::id::{AddressId, SkuId, UserId};
use mall_users_schema::{addresses, outbox_events, skus, users};

use crate::domain::repository::{AddressRepository, SkuRepository, UserRepository};
use crate::domain::types::{
    Address, AddressFields, AddressStatus, NewUser, OutboxEvent, Sku, User,
};
use crate::error::UsersServiceError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn count_by_username(&self, username: &str) -> Result<u64, UsersServiceError> {
        let count = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .count(&self.db)
            .await
            .context("count users by username")?;
        Ok(count)
    }

    async fn count_by_mobile(&self, mobile: &str) -> Result<u64, UsersServiceError> {
        let count = users::Entity::find()
            .filter(users::Column::Mobile.eq(mobile))
            .count(&self.db)
            .await
            .context("count users by mobile")?;
        Ok(count)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UsersServiceError> {
        let model = users::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_account(&self, account: &str) -> Result<Option<User>, UsersServiceError> {
        let model = users::Entity::find()
            .filter(
                Condition::any()
                    .add(users::Column::Username.eq(account))
                    .add(users::Column::Mobile.eq(account)),
            )
            .one(&self.db)
            .await
            .context("find user by account")?;
        Ok(model.map(user_from_model))
    }

    async fn create(&self, user: &NewUser) -> Result<User, UsersServiceError> {
        let now = Utc::now();
        let result = users::ActiveModel {
            id: NotSet,
            username: Set(user.username.clone()),
            mobile: Set(user.mobile.clone()),
            password_hash: Set(user.password_hash.clone()),
            email: Set(None),
            email_active: Set(false),
            default_address_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await;

        match result {
            Ok(model) => Ok(user_from_model(model)),
            Err(e) => match e.sql_err() {
                // The registration pre-check lost a race with a concurrent signup.
                Some(SqlErr::UniqueConstraintViolation(detail)) if detail.contains("mobile") => {
                    Err(UsersServiceError::MobileTaken)
                }
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(UsersServiceError::UsernameTaken),
                _ => Err(anyhow::Error::new(e).context("create user").into()),
            },
        }
    }

    async fn update_email_with_outbox(
        &self,
        id: UserId,
        email: &str,
        event: &OutboxEvent,
    ) -> Result<bool, UsersServiceError> {
        let email = email.to_owned();
        let event = event.clone();
        let updated = self
            .db
            .transaction::<_, bool, DbErr>(|txn| {
                Box::pin(async move {
                    let result = users::Entity::update_many()
                        .col_expr(users::Column::Email, Expr::value(Some(email)))
                        .col_expr(users::Column::EmailActive, Expr::value(false))
                        .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
                        .filter(users::Column::Id.eq(id.0))
                        .exec(txn)
                        .await?;
                    if result.rows_affected == 0 {
                        return Ok(false);
                    }
                    insert_outbox_event(txn, &event).await?;
                    Ok(true)
                })
            })
            .await
            .context("update email with outbox")?;
        Ok(updated)
    }

    async fn activate_email(&self, id: UserId, email: &str) -> Result<bool, UsersServiceError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::EmailActive, Expr::value(true))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id.0))
            .filter(users::Column::Email.eq(email))
            .exec(&self.db)
            .await
            .context("activate email")?;
        Ok(result.rows_affected > 0)
    }
}

async fn insert_outbox_event(
    txn: &DatabaseTransaction,
    event: &OutboxEvent,
) -> Result<(), DbErr> {
    let now = Utc::now();
    outbox_events::ActiveModel {
        id: Set(event.id),
        kind: Set(event.kind.clone()),
        payload: Set(event.payload.clone()),
        idempotency_key: Set(event.idempotency_key.clone()),
        attempts: Set(0),
        last_error: Set(None),
        created_at: Set(now),
        next_attempt_at: Set(now),
        processed_at: Set(None),
        failed_at: Set(None),
    }
    .insert(txn)
    .await?;
    Ok(())
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: UserId(model.id),
        username: model.username,
        mobile: model.mobile,
        password_hash: model.password_hash,
        email: model.email,
        email_active: model.email_active,
        default_address_id: model.default_address_id.map(AddressId),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Address repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAddressRepository {
    pub db: DatabaseConnection,
}

impl AddressRepository for DbAddressRepository {
    async fn list_active(&self, user_id: UserId) -> Result<Vec<Address>, UsersServiceError> {
        let models = addresses::Entity::find()
            .filter(addresses::Column::UserId.eq(user_id.0))
            .filter(addresses::Column::Status.eq(AddressStatus::Active.as_i16()))
            .order_by_desc(addresses::Column::UpdatedAt)
            .all(&self.db)
            .await
            .context("list active addresses")?;
        Ok(models.into_iter().map(address_from_model).collect())
    }

    async fn find_by_id(&self, id: AddressId) -> Result<Option<Address>, UsersServiceError> {
        let model = addresses::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find address by id")?;
        Ok(model.map(address_from_model))
    }

    async fn create_within_limit(
        &self,
        user_id: UserId,
        fields: &AddressFields,
        limit: u64,
    ) -> Result<Option<Address>, UsersServiceError> {
        let fields = fields.clone();
        let created = self
            .db
            .transaction::<_, Option<addresses::Model>, DbErr>(|txn| {
                Box::pin(async move {
                    // Row lock on the owner serialises concurrent creates for one user,
                    // so the count below cannot go stale before the insert.
                    users::Entity::find_by_id(user_id.0)
                        .lock_exclusive()
                        .one(txn)
                        .await?
                        .ok_or_else(|| DbErr::RecordNotFound(format!("user {user_id}")))?;

                    let active = addresses::Entity::find()
                        .filter(addresses::Column::UserId.eq(user_id.0))
                        .filter(addresses::Column::Status.eq(AddressStatus::Active.as_i16()))
                        .count(txn)
                        .await?;
                    if active >= limit {
                        return Ok(None);
                    }

                    let now = Utc::now();
                    let mut am = address_active_model(&fields);
                    am.user_id = Set(user_id.0);
                    am.status = Set(AddressStatus::Active.as_i16());
                    am.created_at = Set(now);
                    am.updated_at = Set(now);
                    Ok(Some(am.insert(txn).await?))
                })
            })
            .await
            .context("create address within limit")?;
        Ok(created.map(address_from_model))
    }

    async fn update(
        &self,
        id: AddressId,
        fields: &AddressFields,
    ) -> Result<Option<Address>, UsersServiceError> {
        let mut am = address_active_model(fields);
        am.updated_at = Set(Utc::now());
        // The status filter keeps a concurrent soft delete from being overwritten.
        let updated = addresses::Entity::update_many()
            .set(am)
            .filter(addresses::Column::Id.eq(id.0))
            .filter(addresses::Column::Status.eq(AddressStatus::Active.as_i16()))
            .exec_with_returning(&self.db)
            .await
            .context("update address")?;
        Ok(updated.into_iter().next().map(address_from_model))
    }

    async fn update_title(&self, id: AddressId, title: &str) -> Result<bool, UsersServiceError> {
        let result = addresses::Entity::update_many()
            .col_expr(addresses::Column::Title, Expr::value(title.to_owned()))
            .col_expr(addresses::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(addresses::Column::Id.eq(id.0))
            .filter(addresses::Column::Status.eq(AddressStatus::Active.as_i16()))
            .exec(&self.db)
            .await
            .context("update address title")?;
        Ok(result.rows_affected > 0)
    }

    async fn soft_delete(&self, id: AddressId, user_id: UserId) -> Result<(), UsersServiceError> {
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    addresses::Entity::update_many()
                        .col_expr(
                            addresses::Column::Status,
                            Expr::value(AddressStatus::Deleted.as_i16()),
                        )
                        .col_expr(addresses::Column::UpdatedAt, Expr::value(Utc::now()))
                        .filter(addresses::Column::Id.eq(id.0))
                        .exec(txn)
                        .await?;
                    users::Entity::update_many()
                        .col_expr(
                            users::Column::DefaultAddressId,
                            Expr::value(Option::<i64>::None),
                        )
                        .filter(users::Column::Id.eq(user_id.0))
                        .filter(users::Column::DefaultAddressId.eq(id.0))
                        .exec(txn)
                        .await?;
                    Ok(())
                })
            })
            .await
            .context("soft delete address")?;
        Ok(())
    }

    async fn set_default(
        &self,
        user_id: UserId,
        id: AddressId,
    ) -> Result<bool, UsersServiceError> {
        let updated = self
            .db
            .transaction::<_, bool, DbErr>(|txn| {
                Box::pin(async move {
                    // Lock the address so a concurrent soft delete cannot slip in between
                    // the check and the update.
                    let address = addresses::Entity::find_by_id(id.0)
                        .filter(addresses::Column::UserId.eq(user_id.0))
                        .filter(addresses::Column::Status.eq(AddressStatus::Active.as_i16()))
                        .lock_exclusive()
                        .one(txn)
                        .await?;
                    if address.is_none() {
                        return Ok(false);
                    }
                    users::Entity::update_many()
                        .col_expr(users::Column::DefaultAddressId, Expr::value(Some(id.0)))
                        .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
                        .filter(users::Column::Id.eq(user_id.0))
                        .exec(txn)
                        .await?;
                    Ok(true)
                })
            })
            .await
            .context("set default address")?;
        Ok(updated)
    }
}

fn address_active_model(fields: &AddressFields) -> addresses::ActiveModel {
    addresses::ActiveModel {
        title: Set(fields.title.trim().to_owned()),
        receiver: Set(fields.receiver.trim().to_owned()),
        province_id: Set(fields.province_id),
        city_id: Set(fields.city_id),
        district_id: Set(fields.district_id),
        place: Set(fields.place.trim().to_owned()),
        mobile: Set(fields.mobile.clone()),
        tel: Set(fields.tel.clone()),
        email: Set(fields.email.clone()),
        ..Default::default()
    }
}

fn address_from_model(model: addresses::Model) -> Address {
    Address {
        id: AddressId(model.id),
        user_id: UserId(model.user_id),
        fields: AddressFields {
            title: model.title,
            receiver: model.receiver,
            province_id: model.province_id,
            city_id: model.city_id,
            district_id: model.district_id,
            place: model.place,
            mobile: model.mobile,
            tel: model.tel,
            email: model.email,
        },
        // Unknown status values are treated as hidden.
        status: AddressStatus::from_i16(model.status).unwrap_or(AddressStatus::Deleted),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── SKU repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSkuRepository {
    pub db: DatabaseConnection,
}

impl SkuRepository for DbSkuRepository {
    async fn exists(&self, id: SkuId) -> Result<bool, UsersServiceError> {
        let count = skus::Entity::find()
            .filter(skus::Column::Id.eq(id.0))
            .count(&self.db)
            .await
            .context("check sku exists")?;
        Ok(count > 0)
    }

    async fn find_by_ids(&self, ids: &[SkuId]) -> Result<Vec<Sku>, UsersServiceError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let models = skus::Entity::find()
            .filter(skus::Column::Id.is_in(ids.iter().map(|id| id.0)))
            .all(&self.db)
            .await
            .context("find skus by ids")?;
        Ok(models.into_iter().map(sku_from_model).collect())
    }
}

fn sku_from_model(model: skus::Model) -> Sku {
    Sku {
        id: SkuId(model.id),
        name: model.name,
        price: model.price,
        default_image_url: model.default_image_url,
        comments: model.comments,
    }
}
