use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Proposals {
    Table,
    Id,
    CompanyId,
    PlanId,
    SellerId,
    LineQuantity,
    PricePerLineCents,
    TotalMonthlyCents,
    Status,
    Notes,
    Product,
    RequestType,
    DonorCarrier,
    SalesStatus,
    ProcessingStatus,
    SentToProcessingAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ProposalStatusHistory {
    Table,
    Id,
    ProposalId,
    OldStatus,
    NewStatus,
    ChangedBy,
    ChangedAt,
}

#[derive(DeriveIden)]
enum Contracts {
    Table,
    Id,
    ProposalId,
    StartDate,
    EndDate,
    Notes,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Companies {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Plans {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Profiles {
    Table,
    Id,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Proposals::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Proposals::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Proposals::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(Proposals::PlanId).uuid())
                    .col(ColumnDef::new(Proposals::SellerId).uuid())
                    .col(ColumnDef::new(Proposals::LineQuantity).integer().not_null())
                    .col(
                        ColumnDef::new(Proposals::PricePerLineCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Proposals::TotalMonthlyCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Proposals::Status)
                            .string_len(16)
                            .not_null()
                            .default("qualified"),
                    )
                    .col(ColumnDef::new(Proposals::Notes).text())
                    .col(ColumnDef::new(Proposals::Product).string_len(128))
                    .col(ColumnDef::new(Proposals::RequestType).string_len(16))
                    .col(ColumnDef::new(Proposals::DonorCarrier).string_len(64))
                    .col(ColumnDef::new(Proposals::SalesStatus).string_len(32))
                    .col(ColumnDef::new(Proposals::ProcessingStatus).string_len(32))
                    .col(ColumnDef::new(Proposals::SentToProcessingAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Proposals::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Proposals::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_proposals_company")
                            .from(Proposals::Table, Proposals::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_proposals_plan")
                            .from(Proposals::Table, Proposals::PlanId)
                            .to(Plans::Table, Plans::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_proposals_seller")
                            .from(Proposals::Table, Proposals::SellerId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_proposals_company", Proposals::CompanyId),
            ("idx_proposals_seller", Proposals::SellerId),
            ("idx_proposals_sales_status", Proposals::SalesStatus),
            ("idx_proposals_processing_status", Proposals::ProcessingStatus),
        ] {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(Proposals::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_table(
                Table::create()
                    .table(ProposalStatusHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProposalStatusHistory::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProposalStatusHistory::ProposalId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProposalStatusHistory::OldStatus).string_len(16))
                    .col(
                        ColumnDef::new(ProposalStatusHistory::NewStatus)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProposalStatusHistory::ChangedBy).uuid())
                    .col(
                        ColumnDef::new(ProposalStatusHistory::ChangedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_status_history_proposal")
                            .from(
                                ProposalStatusHistory::Table,
                                ProposalStatusHistory::ProposalId,
                            )
                            .to(Proposals::Table, Proposals::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_status_history_proposal")
                    .table(ProposalStatusHistory::Table)
                    .col(ProposalStatusHistory::ProposalId)
                    .col(ProposalStatusHistory::ChangedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Contracts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Contracts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Contracts::ProposalId).uuid().not_null())
                    .col(ColumnDef::new(Contracts::StartDate).date().not_null())
                    .col(ColumnDef::new(Contracts::EndDate).date())
                    .col(ColumnDef::new(Contracts::Notes).text())
                    .col(
                        ColumnDef::new(Contracts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contracts_proposal")
                            .from(Contracts::Table, Contracts::ProposalId)
                            .to(Proposals::Table, Proposals::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_contracts_proposal")
                    .table(Contracts::Table)
                    .col(Contracts::ProposalId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Contracts::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(ProposalStatusHistory::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Proposals::Table).if_exists().to_owned())
            .await
    }
}
