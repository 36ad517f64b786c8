use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Addresses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Addresses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Addresses::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Addresses::Title).string_len(20).not_null())
                    .col(ColumnDef::new(Addresses::Receiver).string_len(20).not_null())
                    .col(ColumnDef::new(Addresses::ProvinceId).integer().not_null())
                    .col(ColumnDef::new(Addresses::CityId).integer().not_null())
                    .col(ColumnDef::new(Addresses::DistrictId).integer().not_null())
                    .col(ColumnDef::new(Addresses::Place).string_len(50).not_null())
                    .col(ColumnDef::new(Addresses::Mobile).string_len(11).not_null())
                    .col(ColumnDef::new(Addresses::Tel).string_len(20))
                    .col(ColumnDef::new(Addresses::Email).string_len(254))
                    .col(
                        ColumnDef::new(Addresses::Status)
                            .small_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Addresses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Addresses::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Addresses::Table, Addresses::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Addresses::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Addresses {
    Table,
    Id,
    UserId,
    Title,
    Receiver,
    ProvinceId,
    CityId,
    DistrictId,
    Place,
    Mobile,
    Tel,
    Email,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
