use sea_orm_migration::prelude::*;

const FK_NAME: &str = "fk_users_default_address_id";

/// `users.default_address_id` can only reference `addresses` once that table exists.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_NAME)
                    .from(Users::Table, Users::DefaultAddressId)
                    .to(Addresses::Table, Addresses::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_NAME)
                    .table(Users::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum Users {
    Table,
    DefaultAddressId,
}

#[derive(Iden)]
enum Addresses {
    Table,
    Id,
}
