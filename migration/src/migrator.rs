use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202607290001_create_users::Migration),
            Box::new(migrations::m202607290002_create_sessions::Migration),
            Box::new(migrations::m202607290003_create_activity_logs::Migration),
        ]
    }
}
