// src/middleware/auth.rs

use crate::db::DbPool;
use crate::domain::organisation_model::ADMINISTRATION_ORGANISATION_NAME;
use crate::domain::permission::Permission;
use crate::domain::user_claims::UserClaims;
use crate::error::AppError;
use crate::logging::RequestContext;
use crate::repository::organisation_membership_repository::OrganisationMembershipRepository;
use crate::utils::jwt::JwtManager;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// JWT認証ミドルウェアの設定
#[derive(Clone)]
pub struct AuthMiddlewareConfig {
    pub jwt_manager: Arc<JwtManager>,
    pub db: DbPool,
}

/// 認証済みユーザーの所属組織と権限
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipContext {
    pub organisation_id: Uuid,
    pub organisation_name: String,
    pub permissions: HashSet<Permission>,
}

/// 認証済みユーザー情報を格納するエクステンション
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub claims: UserClaims,
    pub memberships: Vec<MembershipContext>,
}

impl AuthenticatedUser {
    pub fn new(claims: UserClaims, memberships: Vec<MembershipContext>) -> Self {
        Self {
            claims,
            memberships,
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.claims.user_id
    }

    pub fn login(&self) -> &str {
        &self.claims.login
    }

    pub fn membership_in(&self, organisation_id: Uuid) -> Option<&MembershipContext> {
        self.memberships
            .iter()
            .find(|m| m.organisation_id == organisation_id)
    }

    pub fn is_member_of(&self, organisation_id: Uuid) -> bool {
        self.membership_in(organisation_id).is_some()
    }

    /// 管理組織での所属
    pub fn administration_membership(&self) -> Option<&MembershipContext> {
        self.memberships
            .iter()
            .find(|m| m.organisation_name == ADMINISTRATION_ORGANISATION_NAME)
    }

    pub fn is_administration_member(&self) -> bool {
        self.administration_membership().is_some()
    }
}

/// JWT認証ミドルウェア
///
/// トークン検証後、所属組織と権限をDBから読み込み `AuthenticatedUser` として追加する
pub async fn jwt_auth_middleware(
    State(config): State<AuthMiddlewareConfig>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    // トークンを抽出
    let token = extract_token(&headers).ok_or_else(|| {
        warn!(path = %path, "Missing authentication token");
        AppError::Unauthorized("Authentication required".to_string())
    })?;

    // JWTを検証
    let access_claims = config
        .jwt_manager
        .verify_access_token(&token)
        .map_err(|e| {
            warn!(path = %path, error = %e, "Invalid access token");
            AppError::Unauthorized("Invalid or expired token".to_string())
        })?;

    let user_claims = access_claims.user;

    // 所属組織を読み込む
    let rows = OrganisationMembershipRepository::new(&config.db)
        .find_by_user(user_claims.user_id)
        .await
        .map_err(|e| {
            warn!(error = %e, user_id = %user_claims.user_id, "Failed to load memberships");
            AppError::InternalServerError("Failed to load user memberships".to_string())
        })?;

    let mut memberships = Vec::with_capacity(rows.len());
    for (membership, organisation) in rows {
        let permissions = membership.permission_set().map_err(|e| {
            warn!(
                error = %e,
                membership_id = %membership.id,
                "Stored membership permissions are invalid"
            );
            AppError::InternalServerError("Failed to load user memberships".to_string())
        })?;
        memberships.push(MembershipContext {
            organisation_id: organisation.id,
            organisation_name: organisation.name,
            permissions,
        });
    }

    let request_id = request
        .extensions()
        .get::<RequestContext>()
        .map(|context| context.request_id.clone());

    info!(
        request_id = ?request_id,
        user_id = %user_claims.user_id,
        login = %user_claims.login,
        memberships = memberships.len(),
        path = %path,
        "Authenticated request"
    );

    request
        .extensions_mut()
        .insert(AuthenticatedUser::new(user_claims, memberships));

    Ok(next.run(request).await)
}

// --- ヘルパー関数 ---

/// Authorization ヘッダーから Bearer トークンを抽出
fn extract_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|auth_str| auth_str.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

// --- Axum Extractors ---

impl<S> axum::extract::FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}
