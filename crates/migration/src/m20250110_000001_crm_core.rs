use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Profiles {
    Table,
    Id,
    Email,
    FullName,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
enum UserRoles {
    Table,
    Id,
    UserId,
    Role,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Companies {
    Table,
    Id,
    LegalName,
    Cnpj,
    Segment,
    EstimatedLines,
    Status,
    OwnerId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Plans {
    Table,
    Id,
    Name,
    Carrier,
    BasePriceCents,
    Notes,
    Active,
    RequestType,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Profiles::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Profiles::Email).string_len(320).not_null())
                    .col(ColumnDef::new(Profiles::FullName).string_len(256))
                    .col(
                        ColumnDef::new(Profiles::Role)
                            .string_len(16)
                            .not_null()
                            .default("seller"),
                    )
                    .col(
                        ColumnDef::new(Profiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("ux_profiles_email")
                    .table(Profiles::Table)
                    .col(Profiles::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserRoles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserRoles::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(UserRoles::UserId).uuid().not_null())
                    .col(ColumnDef::new(UserRoles::Role).string_len(16).not_null())
                    .col(ColumnDef::new(UserRoles::CreatedBy).uuid())
                    .col(
                        ColumnDef::new(UserRoles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_roles_profile")
                            .from(UserRoles::Table, UserRoles::UserId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("ux_user_roles_user_role")
                    .table(UserRoles::Table)
                    .col(UserRoles::UserId)
                    .col(UserRoles::Role)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Companies::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Companies::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Companies::LegalName).string_len(256).not_null())
                    .col(ColumnDef::new(Companies::Cnpj).string_len(32).not_null())
                    .col(ColumnDef::new(Companies::Segment).string_len(128))
                    .col(ColumnDef::new(Companies::EstimatedLines).integer())
                    .col(
                        ColumnDef::new(Companies::Status)
                            .string_len(16)
                            .not_null()
                            .default("lead"),
                    )
                    .col(ColumnDef::new(Companies::OwnerId).uuid())
                    .col(
                        ColumnDef::new(Companies::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Companies::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_companies_owner")
                            .from(Companies::Table, Companies::OwnerId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("ux_companies_cnpj")
                    .table(Companies::Table)
                    .col(Companies::Cnpj)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_companies_legal_name")
                    .table(Companies::Table)
                    .col(Companies::LegalName)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Plans::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Plans::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Plans::Name).string_len(128).not_null())
                    .col(ColumnDef::new(Plans::Carrier).string_len(64))
                    .col(ColumnDef::new(Plans::BasePriceCents).big_integer().not_null())
                    .col(ColumnDef::new(Plans::Notes).text())
                    .col(
                        ColumnDef::new(Plans::Active)
                            .boolean()
                            .not_null()
                            .default(Expr::value(true)),
                    )
                    .col(ColumnDef::new(Plans::RequestType).string_len(16))
                    .col(
                        ColumnDef::new(Plans::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Plans::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Companies::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserRoles::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Profiles::Table).if_exists().to_owned())
            .await
    }
}
