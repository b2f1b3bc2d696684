// src/domain/audit_log_model.rs
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub action: String,
    pub resource_type: String,
    pub resource_id: Uuid,
    pub details: Option<Json>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// 監査アクションの定義
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuditAction {
    OrganisationCreated,
    OrganisationUpdated,
    OrganisationLinked,
    OrganisationUnlinked,
    OrganisationLinksReplaced,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::OrganisationCreated => "organisation_created",
            AuditAction::OrganisationUpdated => "organisation_updated",
            AuditAction::OrganisationLinked => "organisation_linked",
            AuditAction::OrganisationUnlinked => "organisation_unlinked",
            AuditAction::OrganisationLinksReplaced => "organisation_links_replaced",
        }
    }
}

pub const RESOURCE_TYPE_ORGANISATION: &str = "organisation";

// 監査ログエントリービルダー
pub struct AuditLogBuilder {
    user_id: Uuid,
    action: AuditAction,
    resource_type: String,
    resource_id: Uuid,
    details: Option<serde_json::Value>,
}

impl AuditLogBuilder {
    pub fn new(
        user_id: Uuid,
        action: AuditAction,
        resource_type: impl Into<String>,
        resource_id: Uuid,
    ) -> Self {
        Self {
            user_id,
            action,
            resource_type: resource_type.into(),
            resource_id,
            details: None,
        }
    }

    /// 組織に対する操作のエントリー
    pub fn organisation(user_id: Uuid, action: AuditAction, organisation_id: Uuid) -> Self {
        Self::new(user_id, action, RESOURCE_TYPE_ORGANISATION, organisation_id)
    }

    pub fn details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn build(self) -> ActiveModel {
        ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(self.user_id),
            action: Set(self.action.as_str().to_string()),
            resource_type: Set(self.resource_type),
            resource_id: Set(self.resource_id),
            details: Set(self.details),
            created_at: Set(Utc::now()),
        }
    }
}
