// src/repository/audit_log_repository.rs
use crate::domain::audit_log_model::{
    self, ActiveModel as AuditLogActiveModel, Entity as AuditLogEntity, Model as AuditLogModel,
};
use sea_orm::{entity::*, query::*, ConnectionTrait, DbErr};
use uuid::Uuid;

pub struct AuditLogRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> AuditLogRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    // 監査ログの作成
    pub async fn create(&self, audit_log: AuditLogActiveModel) -> Result<AuditLogModel, DbErr> {
        audit_log.insert(self.conn).await
    }

    // リソースの監査ログを取得（古い順）
    pub async fn find_by_resource(
        &self,
        resource_type: &str,
        resource_id: Uuid,
    ) -> Result<Vec<AuditLogModel>, DbErr> {
        AuditLogEntity::find()
            .filter(audit_log_model::Column::ResourceType.eq(resource_type))
            .filter(audit_log_model::Column::ResourceId.eq(resource_id))
            .order_by_asc(audit_log_model::Column::CreatedAt)
            .all(self.conn)
            .await
    }

    // ユーザーの監査ログを取得
    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<AuditLogModel>, DbErr> {
        AuditLogEntity::find()
            .filter(audit_log_model::Column::UserId.eq(user_id))
            .order_by_desc(audit_log_model::Column::CreatedAt)
            .all(self.conn)
            .await
    }
}
