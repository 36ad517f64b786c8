use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Skus::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Skus::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Skus::Name).string_len(50).not_null())
                    .col(ColumnDef::new(Skus::Price).decimal_len(10, 2).not_null())
                    .col(ColumnDef::new(Skus::DefaultImageUrl).string_len(200))
                    .col(
                        ColumnDef::new(Skus::Comments)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Skus::IsLaunched)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Skus::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Skus::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Skus::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Skus {
    Table,
    Id,
    Name,
    Price,
    DefaultImageUrl,
    Comments,
    IsLaunched,
    CreatedAt,
    UpdatedAt,
}
