pub use sea_orm_migration::prelude::*;

mod m20251016_000001_create_catalog_tables;
mod m20251016_000002_create_enrollment_tables;
mod m20251016_000003_add_indexes;
mod m20251016_000004_create_course_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251016_000001_create_catalog_tables::Migration),
            Box::new(m20251016_000002_create_enrollment_tables::Migration),
            Box::new(m20251016_000003_add_indexes::Migration),
            Box::new(m20251016_000004_create_course_tables::Migration),
        ]
    }
}
