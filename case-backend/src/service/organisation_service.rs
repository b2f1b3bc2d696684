// src/service/organisation_service.rs

use crate::api::dto::organisation_dto::CreateOrganisationRequest;
use crate::db::DbPool;
use crate::domain::audit_log_model::{AuditAction, AuditLogBuilder};
use crate::domain::id_or_name::IdOrName;
use crate::domain::organisation_model::{Model as OrganisationModel, RichOrganisation};
use crate::domain::permission::Permission;
use crate::domain::property_update::{apply_updaters, PropertyUpdater};
use crate::error::{map_unique_violation, AppError, AppResult};
use crate::log_with_context;
use crate::middleware::auth::AuthenticatedUser;
use crate::repository::organisation_repository::OrganisationRepository;
use crate::service::audit_log_service::record_audit;
use crate::service::authorization_service::{require_administration_permission, Authorizer};
use crate::with_transaction;
use sea_orm::DatabaseTransaction;
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;
use uuid::Uuid;

/// 操作の呼び出し元（トランザクション内へ持ち込む所有データ）
#[derive(Clone)]
struct Caller {
    user: AuthenticatedUser,
    authorizer: Arc<dyn Authorizer>,
}

impl Caller {
    fn require_administration(&self, action: &str) -> AppResult<()> {
        require_administration_permission(
            self.authorizer.as_ref(),
            &self.user,
            Permission::ManageOrganisation,
            action,
        )
    }
}

pub struct OrganisationService {
    db: DbPool,
    authorizer: Arc<dyn Authorizer>,
}

impl OrganisationService {
    pub fn new(db: DbPool, authorizer: Arc<dyn Authorizer>) -> Self {
        Self { db, authorizer }
    }

    fn caller(&self, user: &AuthenticatedUser) -> Caller {
        Caller {
            user: user.clone(),
            authorizer: self.authorizer.clone(),
        }
    }

    /// 組織作成
    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateOrganisationRequest,
    ) -> AppResult<OrganisationModel> {
        let caller = self.caller(user);
        with_transaction!(self.db, |txn| create_in(txn, caller, request))
    }

    /// 組織取得（閲覧できない組織は存在しないものとして扱う）
    pub async fn get(&self, user: &AuthenticatedUser, key: IdOrName) -> AppResult<RichOrganisation> {
        let caller = self.caller(user);
        with_transaction!(self.db, |txn| get_in(txn, caller, key))
    }

    /// 閲覧可能な組織の一覧
    pub async fn list(&self, user: &AuthenticatedUser) -> AppResult<Vec<RichOrganisation>> {
        let caller = self.caller(user);
        with_transaction!(self.db, |txn| list_in(txn, caller))
    }

    /// 組織更新
    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        key: IdOrName,
        updaters: Vec<PropertyUpdater>,
    ) -> AppResult<()> {
        let caller = self.caller(user);
        with_transaction!(self.db, |txn| update_in(txn, caller, key, updaters))
    }

    /// 2つの組織をリンク
    pub async fn link(&self, user: &AuthenticatedUser, from: IdOrName, to: IdOrName) -> AppResult<()> {
        let caller = self.caller(user);
        with_transaction!(self.db, |txn| link_in(txn, caller, from, to))
    }

    /// リンク集合の置き換え
    pub async fn bulk_link(
        &self,
        user: &AuthenticatedUser,
        from: IdOrName,
        targets: Vec<IdOrName>,
    ) -> AppResult<()> {
        let caller = self.caller(user);
        with_transaction!(self.db, |txn| bulk_link_in(txn, caller, from, targets))
    }

    /// リンク解除
    pub async fn unlink(
        &self,
        user: &AuthenticatedUser,
        from: IdOrName,
        to: IdOrName,
    ) -> AppResult<()> {
        let caller = self.caller(user);
        with_transaction!(self.db, |txn| unlink_in(txn, caller, from, to))
    }

    /// リンク先一覧（参照権限がなければ空）
    pub async fn list_links(
        &self,
        user: &AuthenticatedUser,
        key: IdOrName,
    ) -> AppResult<Vec<OrganisationModel>> {
        let caller = self.caller(user);
        with_transaction!(self.db, |txn| list_links_in(txn, caller, key))
    }
}

// --- トランザクション内の処理 ---

async fn resolve(
    repo: &OrganisationRepository<'_, DatabaseTransaction>,
    key: &IdOrName,
) -> AppResult<OrganisationModel> {
    repo.find_by_id_or_name(key)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Organisation {} not found", key)))
}

fn ensure_linkable(organisation: &OrganisationModel) -> AppResult<()> {
    if organisation.is_administration() {
        return Err(AppError::BadRequest(
            "The administration organisation cannot be linked".to_string(),
        ));
    }
    Ok(())
}

async fn create_in(
    txn: &DatabaseTransaction,
    caller: Caller,
    request: CreateOrganisationRequest,
) -> AppResult<OrganisationModel> {
    caller.require_administration("create organisations")?;

    let repo = OrganisationRepository::new(txn);
    let conflict = format!("Organisation {} already exists", request.name);

    // 組織名の重複チェック
    if repo.find_by_name(&request.name).await?.is_some() {
        log_with_context!(
            tracing::Level::WARN,
            "Organisation name already taken",
            "user_id" => caller.user.user_id(),
            "organisation" => &request.name
        );
        return Err(AppError::Conflict(conflict));
    }

    let organisation = repo
        .create(
            request.name,
            request.description,
            request.properties,
            caller.user.login().to_string(),
        )
        .await
        .map_err(|e| map_unique_violation(e, conflict))?;

    record_audit(
        txn,
        AuditLogBuilder::organisation(
            caller.user.user_id(),
            AuditAction::OrganisationCreated,
            organisation.id,
        )
        .details(json!({ "name": organisation.name })),
    )
    .await?;

    log_with_context!(
        tracing::Level::INFO,
        "Organisation created",
        "user_id" => caller.user.user_id(),
        "organisation" => &organisation.name,
        "organisation_id" => organisation.id
    );

    Ok(organisation)
}

async fn get_in(
    txn: &DatabaseTransaction,
    caller: Caller,
    key: IdOrName,
) -> AppResult<RichOrganisation> {
    let repo = OrganisationRepository::new(txn);

    match repo.find_rich(&key).await? {
        Some(rich) if caller.authorizer.is_visible(&caller.user, &rich) => Ok(rich),
        _ => Err(AppError::NotFound(format!("Organisation {} not found", key))),
    }
}

async fn list_in(txn: &DatabaseTransaction, caller: Caller) -> AppResult<Vec<RichOrganisation>> {
    let organisations = OrganisationRepository::new(txn).find_all_rich().await?;

    Ok(organisations
        .into_iter()
        .filter(|rich| caller.authorizer.is_visible(&caller.user, rich))
        .collect())
}

async fn update_in(
    txn: &DatabaseTransaction,
    caller: Caller,
    key: IdOrName,
    updaters: Vec<PropertyUpdater>,
) -> AppResult<()> {
    let repo = OrganisationRepository::new(txn);
    let target = repo.find_by_id_or_name(&key).await?;

    let permitted = caller
        .authorizer
        .has_administration_permission(&caller.user, Permission::ManageOrganisation)
        || target.as_ref().is_some_and(|organisation| {
            caller.authorizer.has_permission(
                &caller.user,
                organisation.id,
                Permission::ManageOrganisation,
            )
        });
    if !permitted {
        log_with_context!(
            tracing::Level::WARN,
            "Organisation update denied",
            "user_id" => caller.user.user_id(),
            "organisation" => key.to_string()
        );
        return Err(AppError::Forbidden(format!(
            "Permission {} is required to update organisation {}",
            Permission::ManageOrganisation,
            key
        )));
    }

    let organisation =
        target.ok_or_else(|| AppError::NotFound(format!("Organisation {} not found", key)))?;

    if organisation.is_administration() {
        return Err(AppError::BadRequest(
            "The administration organisation cannot be modified".to_string(),
        ));
    }

    if updaters.is_empty() {
        return Ok(());
    }

    let applied = apply_updaters(&organisation, &updaters)?;
    let conflict = format!("Organisation {} already exists", applied.name);

    if applied.renamed && repo.find_by_name(&applied.name).await?.is_some() {
        return Err(AppError::Conflict(conflict));
    }

    let organisation_id = organisation.id;
    let updated = repo
        .update(organisation, applied, caller.user.login().to_string())
        .await
        .map_err(|e| map_unique_violation(e, conflict))?;

    let fields: Vec<String> = updaters.iter().map(PropertyUpdater::field).collect();
    record_audit(
        txn,
        AuditLogBuilder::organisation(
            caller.user.user_id(),
            AuditAction::OrganisationUpdated,
            organisation_id,
        )
        .details(json!({ "fields": fields })),
    )
    .await?;

    log_with_context!(
        tracing::Level::INFO,
        "Organisation updated",
        "user_id" => caller.user.user_id(),
        "organisation" => &updated.name,
        "fields" => &fields
    );

    Ok(())
}

async fn link_in(
    txn: &DatabaseTransaction,
    caller: Caller,
    from: IdOrName,
    to: IdOrName,
) -> AppResult<()> {
    caller.require_administration("link organisations")?;

    let repo = OrganisationRepository::new(txn);
    let from_organisation = resolve(&repo, &from).await?;
    let to_organisation = resolve(&repo, &to).await?;

    ensure_linkable(&from_organisation)?;
    ensure_linkable(&to_organisation)?;
    if from_organisation.id == to_organisation.id {
        return Err(AppError::BadRequest(
            "An organisation cannot be linked to itself".to_string(),
        ));
    }

    let created = repo
        .double_link(from_organisation.id, to_organisation.id)
        .await?;

    if created {
        record_audit(
            txn,
            AuditLogBuilder::organisation(
                caller.user.user_id(),
                AuditAction::OrganisationLinked,
                from_organisation.id,
            )
            .details(json!({ "to": to_organisation.name, "to_id": to_organisation.id })),
        )
        .await?;
    }

    log_with_context!(
        tracing::Level::INFO,
        "Organisations linked",
        "user_id" => caller.user.user_id(),
        "from" => &from_organisation.name,
        "to" => &to_organisation.name,
        "created" => created
    );

    Ok(())
}

async fn bulk_link_in(
    txn: &DatabaseTransaction,
    caller: Caller,
    from: IdOrName,
    targets: Vec<IdOrName>,
) -> AppResult<()> {
    caller.require_administration("link organisations")?;

    let repo = OrganisationRepository::new(txn);
    let from_organisation = resolve(&repo, &from).await?;
    ensure_linkable(&from_organisation)?;

    let target_organisations = match repo.resolve_all(&targets).await? {
        Ok(organisations) => organisations,
        Err(missing) => {
            return Err(AppError::NotFound(format!(
                "Organisation {} not found",
                missing
            )))
        }
    };

    let mut target_ids = BTreeSet::new();
    for target in &target_organisations {
        ensure_linkable(target)?;
        if target.id == from_organisation.id {
            return Err(AppError::BadRequest(
                "An organisation cannot be linked to itself".to_string(),
            ));
        }
        target_ids.insert(target.id);
    }

    let target_ids: Vec<Uuid> = target_ids.into_iter().collect();
    let changes = repo.update_links(from_organisation.id, &target_ids).await?;

    record_audit(
        txn,
        AuditLogBuilder::organisation(
            caller.user.user_id(),
            AuditAction::OrganisationLinksReplaced,
            from_organisation.id,
        )
        .details(json!({ "added": changes.added, "removed": changes.removed })),
    )
    .await?;

    log_with_context!(
        tracing::Level::INFO,
        "Organisation links replaced",
        "user_id" => caller.user.user_id(),
        "organisation" => &from_organisation.name,
        "added" => changes.added.len(),
        "removed" => changes.removed.len()
    );

    Ok(())
}

async fn unlink_in(
    txn: &DatabaseTransaction,
    caller: Caller,
    from: IdOrName,
    to: IdOrName,
) -> AppResult<()> {
    caller.require_administration("unlink organisations")?;

    let repo = OrganisationRepository::new(txn);
    let from_organisation = resolve(&repo, &from).await?;
    let to_organisation = resolve(&repo, &to).await?;

    let removed = repo
        .double_unlink(from_organisation.id, to_organisation.id)
        .await?;
    if removed == 0 {
        return Err(AppError::NotFound(format!(
            "Organisation {} is not linked to {}",
            from_organisation.name, to_organisation.name
        )));
    }

    record_audit(
        txn,
        AuditLogBuilder::organisation(
            caller.user.user_id(),
            AuditAction::OrganisationUnlinked,
            from_organisation.id,
        )
        .details(json!({ "to": to_organisation.name, "to_id": to_organisation.id })),
    )
    .await?;

    log_with_context!(
        tracing::Level::INFO,
        "Organisations unlinked",
        "user_id" => caller.user.user_id(),
        "from" => &from_organisation.name,
        "to" => &to_organisation.name
    );

    Ok(())
}

async fn list_links_in(
    txn: &DatabaseTransaction,
    caller: Caller,
    key: IdOrName,
) -> AppResult<Vec<OrganisationModel>> {
    let repo = OrganisationRepository::new(txn);

    let Some(organisation) = repo.find_by_id_or_name(&key).await? else {
        return Ok(Vec::new());
    };

    if !caller
        .authorizer
        .can_list_links(&caller.user, organisation.id)
    {
        log_with_context!(
            tracing::Level::DEBUG,
            "Links of foreign organisation requested",
            "user_id" => caller.user.user_id(),
            "organisation" => &organisation.name
        );
        return Ok(Vec::new());
    }

    Ok(repo.neighbours(organisation.id).await?)
}
