// src/service/authorization_service.rs

use crate::domain::organisation_model::RichOrganisation;
use crate::domain::permission::Permission;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use tracing::warn;
use uuid::Uuid;

/// 組織に対する認可判定
///
/// 判定は同期的に行い、変更を伴う操作の前に必ず呼び出す。
pub trait Authorizer: Send + Sync {
    /// 指定組織内で権限を持っているか
    fn has_permission(
        &self,
        user: &AuthenticatedUser,
        organisation_id: Uuid,
        permission: Permission,
    ) -> bool;

    /// 管理組織内で権限を持っているか
    fn has_administration_permission(
        &self,
        user: &AuthenticatedUser,
        permission: Permission,
    ) -> bool;

    /// 組織が閲覧可能か
    fn is_visible(&self, user: &AuthenticatedUser, organisation: &RichOrganisation) -> bool;

    /// 組織のリンク一覧を参照できるか
    fn can_list_links(&self, user: &AuthenticatedUser, organisation_id: Uuid) -> bool;
}

/// 所属組織と権限セットに基づく認可
#[derive(Debug, Clone, Copy, Default)]
pub struct MembershipAuthorizer;

impl Authorizer for MembershipAuthorizer {
    fn has_permission(
        &self,
        user: &AuthenticatedUser,
        organisation_id: Uuid,
        permission: Permission,
    ) -> bool {
        user.membership_in(organisation_id)
            .is_some_and(|m| m.permissions.contains(&permission))
    }

    fn has_administration_permission(
        &self,
        user: &AuthenticatedUser,
        permission: Permission,
    ) -> bool {
        user.administration_membership()
            .is_some_and(|m| m.permissions.contains(&permission))
    }

    fn is_visible(&self, user: &AuthenticatedUser, organisation: &RichOrganisation) -> bool {
        user.is_administration_member()
            || user.is_member_of(organisation.organisation.id)
            || organisation
                .links
                .iter()
                .any(|linked| user.is_member_of(linked.id))
    }

    fn can_list_links(&self, user: &AuthenticatedUser, organisation_id: Uuid) -> bool {
        user.is_administration_member() || user.is_member_of(organisation_id)
    }
}

/// 管理組織での権限を要求する
pub fn require_administration_permission(
    authorizer: &dyn Authorizer,
    user: &AuthenticatedUser,
    permission: Permission,
    action: &str,
) -> AppResult<()> {
    if authorizer.has_administration_permission(user, permission) {
        return Ok(());
    }

    warn!(
        user_id = %user.user_id(),
        permission = %permission,
        action = %action,
        "Permission denied"
    );
    Err(AppError::Forbidden(format!(
        "Permission {} in the administration organisation is required to {}",
        permission, action
    )))
}
