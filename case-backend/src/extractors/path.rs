// src/extractors/path.rs

use crate::domain::id_or_name::IdOrName;
use crate::error::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

/// `/organisation/{id}` の組織参照（UUID もしくは名前）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganisationPath(pub IdOrName);

impl<S> FromRequestParts<S> for OrganisationPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid path parameter: {}", e)))?;

        Ok(OrganisationPath(parse_reference(&value)?))
    }
}

/// `/organisation/{id}/links/{to}` の組織ペア（前者がリンク元）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPath {
    pub from: IdOrName,
    pub to: IdOrName,
}

impl<S> FromRequestParts<S> for LinkPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((from, to)) = Path::<(String, String)>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid path parameters: {}", e)))?;

        Ok(LinkPath {
            from: parse_reference(&from)?,
            to: parse_reference(&to)?,
        })
    }
}

fn parse_reference(value: &str) -> Result<IdOrName, AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Organisation reference must not be empty".to_string(),
        ));
    }
    Ok(IdOrName::parse(value))
}
