//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20220101_000001_create_state;
mod m20220101_000002_create_city;
mod m20220101_000003_seed_states;
mod m20220101_000004_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20220101_000001_create_state::Migration),
            Box::new(m20220101_000002_create_city::Migration),
            Box::new(m20220101_000003_seed_states::Migration),
            // Indexes should always be applied last
            Box::new(m20220101_000004_add_indexes::Migration),
        ]
    }
}
