// tests/common/auth_helper.rs

use case_backend::domain::permission::Permission;
use case_backend::domain::user_claims::UserClaims;
use case_backend::repository::organisation_membership_repository::OrganisationMembershipRepository;
use case_backend::utils::jwt::JwtManager;
use sea_orm::DatabaseConnection;
use std::collections::HashSet;
use uuid::Uuid;

/// テスト用のユーザー情報
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub login: String,
    pub access_token: String,
}

/// アクセストークンを発行してテストユーザーを作成（所属なし）
pub fn create_test_user(jwt_manager: &JwtManager, login: &str) -> TestUser {
    let id = Uuid::new_v4();
    let access_token = jwt_manager
        .generate_access_token(UserClaims {
            user_id: id,
            login: login.to_string(),
        })
        .unwrap();

    TestUser {
        id,
        login: login.to_string(),
        access_token,
    }
}

/// ユーザーを組織に所属させる
pub async fn grant_membership(
    db: &DatabaseConnection,
    user: &TestUser,
    organisation_id: Uuid,
    permissions: &[Permission],
) {
    let permissions: HashSet<Permission> = permissions.iter().copied().collect();
    OrganisationMembershipRepository::new(db)
        .upsert(user.id, organisation_id, &permissions)
        .await
        .unwrap();
}
