// src/api/mod.rs
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::logging::{inject_request_context, logging_middleware};
use crate::middleware::auth::{jwt_auth_middleware, AuthMiddlewareConfig};
use crate::middleware::cors::cors_layer;
use crate::service::authorization_service::{Authorizer, MembershipAuthorizer};
use crate::service::organisation_service::OrganisationService;
use crate::utils::jwt::JwtManager;
use axum::{middleware as axum_middleware, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod handlers;

/// 統一されたアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub organisation_service: Arc<OrganisationService>,
    pub jwt_manager: Arc<JwtManager>,
    pub db: DbPool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db: DbPool, jwt_manager: Arc<JwtManager>, app_config: &AppConfig) -> Self {
        Self::with_authorizer(db, jwt_manager, app_config, Arc::new(MembershipAuthorizer))
    }

    pub fn with_authorizer(
        db: DbPool,
        jwt_manager: Arc<JwtManager>,
        app_config: &AppConfig,
        authorizer: Arc<dyn Authorizer>,
    ) -> Self {
        Self {
            organisation_service: Arc::new(OrganisationService::new(db.clone(), authorizer)),
            jwt_manager,
            db,
            config: Arc::new(app_config.clone()),
        }
    }

    pub fn auth_middleware_config(&self) -> AuthMiddlewareConfig {
        AuthMiddlewareConfig {
            jwt_manager: self.jwt_manager.clone(),
            db: self.db.clone(),
        }
    }
}

/// 全てのルーターを統合
///
/// `/health` 以外は JWT 認証が必要
pub fn build_router(app_state: AppState) -> Router {
    let auth_config = app_state.auth_middleware_config();
    let cors = cors_layer(&app_state.config.cors_allowed_origins);

    let protected = handlers::organisation_handler::organisation_router_with_state(app_state)
        .route_layer(axum_middleware::from_fn_with_state(
            auth_config,
            jwt_auth_middleware,
        ));

    Router::new()
        .merge(handlers::system_handler::system_router())
        .merge(protected)
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(axum_middleware::from_fn(inject_request_context))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
