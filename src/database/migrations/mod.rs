use sea_orm_migration::prelude::*;

mod m001_create_creator_tables;
mod m002_create_submission_tables;
mod m003_create_catalog_tables;
mod m004_create_notifications;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m001_create_creator_tables::Migration),
            Box::new(m002_create_submission_tables::Migration),
            Box::new(m003_create_catalog_tables::Migration),
            Box::new(m004_create_notifications::Migration),
        ]
    }
}
