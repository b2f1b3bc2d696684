// src/service/audit_log_service.rs
use crate::domain::audit_log_model::AuditLogBuilder;
use crate::error::{AppError, AppResult};
use crate::log_with_context;
use crate::repository::audit_log_repository::AuditLogRepository;
use sea_orm::ConnectionTrait;

/// 監査ログを記録する
///
/// 呼び出し元のトランザクション上で書き込むため、操作がロールバックされれば記録も残らない。
pub async fn record_audit<C: ConnectionTrait>(conn: &C, entry: AuditLogBuilder) -> AppResult<()> {
    let audit_log = entry.build();

    let created = AuditLogRepository::new(conn)
        .create(audit_log)
        .await
        .map_err(|e| {
            log_with_context!(
                tracing::Level::ERROR,
                "Failed to create audit log",
                "error" => &e.to_string()
            );
            AppError::DbErr(e)
        })?;

    log_with_context!(
        tracing::Level::DEBUG,
        "Audit log recorded",
        "user_id" => created.user_id,
        "action" => &created.action,
        "resource_id" => created.resource_id
    );

    Ok(())
}
