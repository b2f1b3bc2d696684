// src/main.rs
use case_backend::api::{build_router, AppState};
use case_backend::config::Config;
use case_backend::db::create_db_pool;
use case_backend::service::bootstrap_service::bootstrap;
use case_backend::utils::jwt::JwtManager;
use migration::{Migrator, MigratorTrait};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // トレーシングの設定
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "case_backend=info,tower_http=info".into()),
        )
        .with(fmt::layer())
        .init();

    tracing::info!("Starting Case Backend server...");

    // 設定を読み込む
    let app_config = Config::from_env()?;
    tracing::info!(
        environment = %app_config.environment,
        addr = %app_config.server_addr(),
        "Configuration loaded"
    );

    // データベース接続を作成
    let db_pool = create_db_pool(&app_config).await?;
    tracing::info!("Database pool created successfully.");

    // 未適用のマイグレーションを実行
    Migrator::up(&db_pool, None).await?;

    // 管理組織の用意
    let administration = bootstrap(&db_pool, app_config.initial_admin_user_id).await?;
    tracing::info!(organisation_id = %administration.id, "Administration organisation ready");

    let jwt_manager = Arc::new(JwtManager::new(app_config.jwt.clone())?);
    let app_state = AppState::new(db_pool, jwt_manager, &app_config);

    // ルーターの設定
    let app_router = build_router(app_state);

    // サーバーの起動
    let listener = TcpListener::bind(app_config.server_addr()).await?;
    tracing::info!("Router configured. Server listening on {}", app_config.server_addr());
    axum::serve(listener, app_router.into_make_service()).await?;

    Ok(())
}
