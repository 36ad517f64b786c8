use sea_orm::entity::prelude::*;

/// Registered account. `default_address_id` points at one of the user's active addresses.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub mobile: String,
    pub password_hash: String,
    pub email: Option<String>,
    pub email_active: bool,
    pub default_address_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::addresses::Entity")]
    Addresses,
    #[sea_orm(
        belongs_to = "super::addresses::Entity",
        from = "Column::DefaultAddressId",
        to = "super::addresses::Column::Id",
        on_delete = "SetNull"
    )]
    DefaultAddress,
}

impl Related<super::addresses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Addresses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
