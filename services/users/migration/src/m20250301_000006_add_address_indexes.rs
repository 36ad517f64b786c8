use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Address book listing and the per-user active-count check both filter on
        // (user_id, status).
        manager
            .create_index(
                Index::create()
                    .table(Addresses::Table)
                    .col(Addresses::UserId)
                    .col(Addresses::Status)
                    .name("idx_addresses_user_id_status")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_addresses_user_id_status").to_owned())
            .await
    }
}

#[derive(Iden)]
enum Addresses {
    Table,
    UserId,
    Status,
}
