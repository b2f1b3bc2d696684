use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 有向辺として保存し、A→B と B→A を常にペアで書き込む
        manager
            .create_table(
                Table::create()
                    .table(OrganisationLinks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrganisationLinks::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(OrganisationLinks::FromOrganisationId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrganisationLinks::ToOrganisationId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrganisationLinks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_organisation_links_from")
                            .from(
                                OrganisationLinks::Table,
                                OrganisationLinks::FromOrganisationId,
                            )
                            .to(Organisations::Table, Organisations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_organisation_links_to")
                            .from(
                                OrganisationLinks::Table,
                                OrganisationLinks::ToOrganisationId,
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
                    .name("idx_organisation_links_pair_unique")
                    .table(OrganisationLinks::Table)
                    .col(OrganisationLinks::FromOrganisationId)
                    .col(OrganisationLinks::ToOrganisationId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_organisation_links_to")
                    .table(OrganisationLinks::Table)
                    .col(OrganisationLinks::ToOrganisationId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrganisationLinks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum OrganisationLinks {
    Table,
    Id,
    FromOrganisationId,
    ToOrganisationId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Organisations {
    Table,
    Id,
}
