// tests/common/app_helper.rs

use axum::Router;
use case_backend::api::{build_router, AppState};
use case_backend::config::AppConfig;
use case_backend::domain::organisation_model::Model as OrganisationModel;
use case_backend::domain::permission::Permission;
use case_backend::repository::organisation_repository::OrganisationRepository;
use case_backend::utils::jwt::JwtManager;
use serde_json::Map;
use std::sync::Arc;

use crate::common;
use crate::common::auth_helper::{create_test_user, grant_membership, TestUser};

pub struct TestApp {
    pub router: Router,
    pub db: common::db::TestDatabase,
    pub jwt_manager: Arc<JwtManager>,
}

impl TestApp {
    /// 管理組織で manageOrganisation を持つユーザー
    pub async fn admin_user(&self, login: &str) -> TestUser {
        let user = create_test_user(&self.jwt_manager, login);
        grant_membership(
            &self.db.connection,
            &user,
            self.db.administration.id,
            &[Permission::ManageOrganisation],
        )
        .await;
        user
    }

    /// 指定組織にだけ所属するユーザー
    pub async fn member_of(
        &self,
        login: &str,
        organisation: &OrganisationModel,
        permissions: &[Permission],
    ) -> TestUser {
        let user = create_test_user(&self.jwt_manager, login);
        grant_membership(&self.db.connection, &user, organisation.id, permissions).await;
        user
    }

    /// 所属なしのユーザー
    pub fn outsider(&self, login: &str) -> TestUser {
        create_test_user(&self.jwt_manager, login)
    }

    /// APIを経由せずに組織を作成（前提データ用）
    pub async fn seed_organisation(&self, name: &str) -> OrganisationModel {
        OrganisationRepository::new(&self.db.connection)
            .create(name.to_string(), None, Map::new(), "seed".to_string())
            .await
            .unwrap()
    }

    /// APIを経由せずに2組織をリンク（前提データ用）
    pub async fn seed_link(&self, a: &OrganisationModel, b: &OrganisationModel) {
        OrganisationRepository::new(&self.db.connection)
            .double_link(a.id, b.id)
            .await
            .unwrap();
    }
}

/// 組織APIのセットアップ
pub async fn setup_app() -> TestApp {
    common::init_test_env();

    let db = common::db::TestDatabase::new().await;

    // 統合設定を作成
    let app_config = AppConfig::for_testing();
    let jwt_manager = Arc::new(JwtManager::new(app_config.jwt.clone()).unwrap());

    let app_state = AppState::new(db.connection.clone(), jwt_manager.clone(), &app_config);
    let router = build_router(app_state);

    TestApp {
        router,
        db,
        jwt_manager,
    }
}
