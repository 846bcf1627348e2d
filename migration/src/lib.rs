pub use sea_orm_migration::prelude::*;

mod m20250104_000001_create_models_table;
mod m20250110_000002_add_title_column;
mod m20250110_000003_add_updated_at_column;
mod m20250215_000004_add_usdz_path_column;
mod m20250302_000005_add_thumbnail_path_column;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250104_000001_create_models_table::Migration),
            Box::new(m20250110_000002_add_title_column::Migration),
            Box::new(m20250110_000003_add_updated_at_column::Migration),
            Box::new(m20250215_000004_add_usdz_path_column::Migration),
            Box::new(m20250302_000005_add_thumbnail_path_column::Migration),
        ]
    }
}
