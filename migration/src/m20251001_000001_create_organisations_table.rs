use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Organisations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Organisations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Organisations::Name).string().not_null())
                    .col(ColumnDef::new(Organisations::Description).text())
                    .col(
                        ColumnDef::new(Organisations::Properties)
                            .json_binary()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Organisations::CreatedBy).string().not_null())
                    .col(
                        ColumnDef::new(Organisations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Organisations::UpdatedBy).string())
                    .col(ColumnDef::new(Organisations::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // 組織名は一意（名前でも参照されるため）
        manager
            .create_index(
                Index::create()
                    .name("idx_organisations_name_unique")
                    .table(Organisations::Table)
                    .col(Organisations::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Organisations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Organisations {
    Table,
    Id,
    Name,
    Description,
    Properties,
    CreatedBy,
    CreatedAt,
    UpdatedBy,
    UpdatedAt,
}
