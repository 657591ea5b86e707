pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20260601_000001_click_events;
mod m20260601_000002_users;
mod m20260601_000003_subscriptions;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260601_000001_click_events::Migration),
            Box::new(m20260601_000002_users::Migration),
            Box::new(m20260601_000003_subscriptions::Migration),
        ]
    }
}
