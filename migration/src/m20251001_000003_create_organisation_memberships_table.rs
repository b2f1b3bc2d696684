use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OrganisationMemberships::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrganisationMemberships::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(OrganisationMemberships::UserId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrganisationMemberships::OrganisationId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrganisationMemberships::Permissions)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrganisationMemberships::JoinedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_organisation_memberships_organisation_id")
                            .from(
                                OrganisationMemberships::Table,
                                OrganisationMemberships::OrganisationId,
                            )
                            .to(Organisations::Table, Organisations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_organisation_memberships_user_id")
                    .table(OrganisationMemberships::Table)
                    .col(OrganisationMemberships::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_organisation_memberships_unique")
                    .table(OrganisationMemberships::Table)
                    .col(OrganisationMemberships::UserId)
                    .col(OrganisationMemberships::OrganisationId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(OrganisationMemberships::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum OrganisationMemberships {
    Table,
    Id,
    UserId,
    OrganisationId,
    Permissions,
    JoinedAt,
}

#[derive(DeriveIden)]
enum Organisations {
    Table,
    Id,
}
