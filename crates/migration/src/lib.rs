pub use sea_orm_migration::prelude::*;

mod m20250110_000001_crm_core;
mod m20250110_000002_proposal_pipeline;
mod m20250110_000003_operational_status;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250110_000001_crm_core::Migration),
            Box::new(m20250110_000002_proposal_pipeline::Migration),
            Box::new(m20250110_000003_operational_status::Migration),
        ]
    }
}
