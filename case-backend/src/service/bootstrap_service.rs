// src/service/bootstrap_service.rs

use crate::db::DbPool;
use crate::domain::organisation_model::{Model as OrganisationModel, ADMINISTRATION_ORGANISATION_NAME};
use crate::domain::permission::Permission;
use crate::error::AppResult;
use crate::repository::organisation_membership_repository::OrganisationMembershipRepository;
use crate::repository::organisation_repository::OrganisationRepository;
use crate::with_transaction;
use sea_orm::DatabaseTransaction;
use serde_json::Map;
use std::collections::HashSet;
use tracing::info;
use uuid::Uuid;

pub const SYSTEM_USER: &str = "system";

/// 管理組織を用意し、指定があれば初期管理者を全権限で所属させる（冪等）
pub async fn bootstrap(
    db: &DbPool,
    initial_admin_user_id: Option<Uuid>,
) -> AppResult<OrganisationModel> {
    with_transaction!(db, |txn| bootstrap_in(txn, initial_admin_user_id))
}

async fn bootstrap_in(
    txn: &DatabaseTransaction,
    initial_admin_user_id: Option<Uuid>,
) -> AppResult<OrganisationModel> {
    let repo = OrganisationRepository::new(txn);

    let administration = match repo.find_by_name(ADMINISTRATION_ORGANISATION_NAME).await? {
        Some(existing) => existing,
        None => {
            let created = repo
                .create(
                    ADMINISTRATION_ORGANISATION_NAME.to_string(),
                    Some("Administration organisation".to_string()),
                    Map::new(),
                    SYSTEM_USER.to_string(),
                )
                .await?;
            info!(organisation_id = %created.id, "Administration organisation created");
            created
        }
    };

    if let Some(user_id) = initial_admin_user_id {
        let permissions: HashSet<Permission> = Permission::ALL.into_iter().collect();
        OrganisationMembershipRepository::new(txn)
            .upsert(user_id, administration.id, &permissions)
            .await?;
        info!(user_id = %user_id, "Initial administrator granted all permissions");
    }

    Ok(administration)
}
