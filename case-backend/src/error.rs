// src/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DbErr(#[from] DbErr),

    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Validation failed")]
    ValidationFailure(#[from] ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl AppError {
    /// クライアントに返すエラー種別
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::DbErr(DbErr::RecordNotFound(_)) => "not_found",
            AppError::DbErr(_) => "database_error",
            AppError::NotFound(_) => "not_found",
            AppError::ValidationFailure(_) => "validation_errors",
            AppError::BadRequest(_) => "bad_request",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::Forbidden(_) => "forbidden",
            AppError::Conflict(_) => "conflict",
            AppError::InternalServerError(_) => "internal_server_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::DbErr(DbErr::RecordNotFound(_)) => StatusCode::NOT_FOUND,
            AppError::DbErr(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationFailure(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// 一意制約違反を Conflict に変換し、それ以外はそのまま DbErr として扱う
pub fn map_unique_violation(err: DbErr, message: impl Into<String>) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(message.into()),
        _ => AppError::DbErr(err),
    }
}

// axum でエラーをHTTPレスポンスに変換するための実装
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_type = self.error_type().to_string();

        let error_response = match self {
            AppError::DbErr(db_err) => {
                // サーバーログには詳細を出す
                tracing::error!(error = ?db_err, "Database error");

                let (message, details) = match &db_err {
                    DbErr::RecordNotFound(entity) => (
                        "The requested resource was not found".to_string(),
                        Some(json!({ "entity": entity })),
                    ),
                    _ => ("A database error occurred".to_string(), None),
                };

                ErrorResponse::new(message, error_type).with_details(details)
            }
            AppError::ValidationFailure(errors) => {
                let field_errors: HashMap<String, Vec<String>> = errors
                    .field_errors()
                    .into_iter()
                    .map(|(field, errors)| {
                        let messages = errors
                            .iter()
                            .map(|e| {
                                e.message
                                    .as_ref()
                                    .map_or_else(|| "Invalid value".to_string(), |m| m.to_string())
                            })
                            .collect();
                        (field.to_string(), messages)
                    })
                    .collect();
                let errors_array: Vec<serde_json::Value> = field_errors
                    .iter()
                    .flat_map(|(field, messages)| {
                        messages
                            .iter()
                            .map(move |msg| json!({"message": format!("{}: {}", field, msg)}))
                    })
                    .collect();

                ErrorResponse {
                    validation_errors: Some(field_errors),
                    errors: Some(errors_array),
                    ..ErrorResponse::new("Validation failed".to_string(), error_type)
                }
            }
            AppError::InternalServerError(message) => {
                tracing::error!(%message, "Internal server error");
                ErrorResponse::new("An internal server error occurred".to_string(), error_type)
            }
            AppError::NotFound(message)
            | AppError::BadRequest(message)
            | AppError::Unauthorized(message)
            | AppError::Forbidden(message)
            | AppError::Conflict(message) => ErrorResponse::new(message, error_type),
        };

        (status, Json(error_response)).into_response()
    }
}

// Result 型のエイリアス
pub type AppResult<T> = Result<T, AppError>;

/// 統一的なエラーレスポンス構造
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<HashMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<serde_json::Value>>,
    pub error_type: String,
}

impl ErrorResponse {
    fn new(message: String, error_type: String) -> Self {
        Self {
            success: false,
            error: message.clone(),
            message,
            details: None,
            validation_errors: None,
            errors: None,
            error_type,
        }
    }

    fn with_details(mut self, details: Option<serde_json::Value>) -> Self {
        self.details = details;
        self
    }
}
