use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Proposals {
    Table,
    OperationalStatus,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Proposals::Table)
                    .add_column_if_not_exists(
                        ColumnDef::new(Proposals::OperationalStatus).string_len(16),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_proposals_operational_status")
                    .table(Proposals::Table)
                    .col(Proposals::OperationalStatus)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_proposals_operational_status")
                    .table(Proposals::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .alter_table(
                Table::alter()
                    .table(Proposals::Table)
                    .drop_column(Proposals::OperationalStatus)
                    .to_owned(),
            )
            .await
    }
}
