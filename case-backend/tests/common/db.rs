//! In-memory SQLite TestDatabase helper for SeaORM.

use case_backend::domain::organisation_model::Model as OrganisationModel;
use case_backend::service::bootstrap_service::bootstrap;
use migration::Migrator;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;

pub struct TestDatabase {
    pub connection: DatabaseConnection,
    /// 起動処理で作成された管理組織
    pub administration: OrganisationModel,
}

impl TestDatabase {
    pub async fn new() -> Self {
        // インメモリDBは接続ごとに別物になるため、接続は1本に固定する
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false); // テスト時のログ出力を減らす

        let connection = Database::connect(opt).await.unwrap();

        // マイグレーションと管理組織の用意
        Migrator::up(&connection, None).await.unwrap();
        let administration = bootstrap(&connection, None).await.unwrap();

        Self {
            connection,
            administration,
        }
    }
}
