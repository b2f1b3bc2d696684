// migration/src/lib.rs
pub use sea_orm_migration::prelude::*;

// 組織グラフ関連マイグレーション
mod m20251001_000001_create_organisations_table;
mod m20251001_000002_create_organisation_links_table;
mod m20251001_000003_create_organisation_memberships_table;

// 監査ログ
mod m20251001_000004_create_audit_logs_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            // 1. 組織（グラフの頂点）
            Box::new(m20251001_000001_create_organisations_table::Migration),
            // 2. 組織リンク（グラフの辺、常に双方向ペアで保持）
            Box::new(m20251001_000002_create_organisation_links_table::Migration),
            // 3. ユーザーの組織所属と権限
            Box::new(m20251001_000003_create_organisation_memberships_table::Migration),
            // 4. 監査ログ
            Box::new(m20251001_000004_create_audit_logs_table::Migration),
        ]
    }
}
