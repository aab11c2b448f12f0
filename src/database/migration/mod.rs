use async_trait::async_trait;
use sea_orm_migration::{MigrationTrait, MigratorTrait};

mod m20250601_001_init_registry;

pub struct Migrator;

#[async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250601_001_init_registry::Migration)]
    }
}
