use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users;
mod m20250301_000002_create_addresses;
mod m20250301_000003_add_user_default_address;
mod m20250301_000004_create_skus;
mod m20250301_000005_create_outbox_events;
mod m20250301_000006_add_address_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users::Migration),
            Box::new(m20250301_000002_create_addresses::Migration),
            Box::new(m20250301_000003_add_user_default_address::Migration),
            Box::new(m20250301_000004_create_skus::Migration),
            Box::new(m20250301_000005_create_outbox_events::Migration),
            Box::new(m20250301_000006_add_address_indexes::Migration),
        ]
    }
}
