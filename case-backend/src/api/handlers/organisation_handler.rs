// src/api/handlers/organisation_handler.rs

use crate::api::dto::organisation_dto::*;
use crate::api::AppState;
use crate::error::AppResult;
use crate::extractors::{LinkPath, OrganisationPath, ValidatedJson};
use crate::middleware::auth::AuthenticatedUser;
use axum::{extract::State, http::StatusCode, Json};

/// 組織作成
pub async fn create_organisation_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(payload): ValidatedJson<CreateOrganisationRequest>,
) -> AppResult<(StatusCode, Json<OrganisationResponse>)> {
    let organisation = app_state
        .organisation_service
        .create(&user, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(organisation.into())))
}

/// 組織取得
pub async fn get_organisation_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    OrganisationPath(key): OrganisationPath,
) -> AppResult<Json<OrganisationResponse>> {
    let organisation = app_state.organisation_service.get(&user, key).await?;

    Ok(Json(organisation.into()))
}

/// 組織一覧
pub async fn list_organisations_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<Vec<OrganisationResponse>>> {
    let organisations = app_state.organisation_service.list(&user).await?;

    Ok(Json(
        organisations
            .into_iter()
            .map(OrganisationResponse::from)
            .collect(),
    ))
}

/// 組織更新
pub async fn update_organisation_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    OrganisationPath(key): OrganisationPath,
    ValidatedJson(payload): ValidatedJson<UpdateOrganisationRequest>,
) -> AppResult<StatusCode> {
    app_state
        .organisation_service
        .update(&user, key, payload.into_updaters())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// 組織リンク
pub async fn link_organisations_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    LinkPath { from, to }: LinkPath,
) -> AppResult<StatusCode> {
    app_state.organisation_service.link(&user, from, to).await?;

    Ok(StatusCode::CREATED)
}

/// リンク集合の置き換え
pub async fn bulk_link_organisations_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    OrganisationPath(from): OrganisationPath,
    ValidatedJson(payload): ValidatedJson<BulkLinkRequest>,
) -> AppResult<StatusCode> {
    app_state
        .organisation_service
        .bulk_link(&user, from, payload.targets())
        .await?;

    Ok(StatusCode::CREATED)
}

/// リンク解除
pub async fn unlink_organisations_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    LinkPath { from, to }: LinkPath,
) -> AppResult<StatusCode> {
    app_state.organisation_service.unlink(&user, from, to).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// リンク先一覧
pub async fn list_links_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    OrganisationPath(key): OrganisationPath,
) -> AppResult<Json<Vec<OrganisationResponse>>> {
    let links = app_state.organisation_service.list_links(&user, key).await?;

    Ok(Json(links.into_iter().map(OrganisationResponse::from).collect()))
}

/// 組織ルーター
pub fn organisation_router_with_state(app_state: AppState) -> axum::Router {
    use axum::{
        routing::{get, post},
        Router,
    };

    Router::new()
        .route(
            "/organisation",
            post(create_organisation_handler).get(list_organisations_handler),
        )
        .route(
            "/organisation/{id}",
            get(get_organisation_handler).patch(update_organisation_handler),
        )
        .route(
            "/organisation/{id}/links",
            get(list_links_handler).post(bulk_link_organisations_handler),
        )
        .route(
            "/organisation/{id}/links/{to}",
            post(link_organisations_handler).delete(unlink_organisations_handler),
        )
        .with_state(app_state)
}
