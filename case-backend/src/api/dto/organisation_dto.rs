// src/api/dto/organisation_dto.rs

use crate::domain::id_or_name::IdOrName;
use crate::domain::organisation_model::{Model as OrganisationModel, RichOrganisation};
use crate::domain::property_update::PropertyUpdater;
use crate::utils::validation::validate_organisation_name;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;
use validator::Validate;

// --- リクエストDTO ---

/// 組織作成リクエスト
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateOrganisationRequest {
    #[validate(custom(function = validate_organisation_name))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description must be 1000 characters or less"))]
    pub description: Option<String>,

    #[serde(default)]
    pub properties: Map<String, Value>,
}

/// 組織更新リクエスト
///
/// `description: null` は説明を消去し、`properties` 内の `null` はキーを削除する。
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateOrganisationRequest {
    #[validate(custom(function = validate_organisation_name))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[validate(length(max = 1000, message = "Description must be 1000 characters or less"))]
    pub description: Option<Option<String>>,

    pub properties: Option<Map<String, Value>>,
}

impl UpdateOrganisationRequest {
    pub fn into_updaters(self) -> Vec<PropertyUpdater> {
        let mut updaters = Vec::new();
        if let Some(name) = self.name {
            updaters.push(PropertyUpdater::SetName(name));
        }
        if let Some(description) = self.description {
            updaters.push(PropertyUpdater::SetDescription(description));
        }
        if let Some(properties) = self.properties {
            updaters.extend(PropertyUpdater::from_properties(properties));
        }
        updaters
    }
}

/// 一括リンクリクエスト（リンク集合を置き換える）
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct BulkLinkRequest {
    pub organisations: Vec<String>,
}

impl BulkLinkRequest {
    pub fn targets(self) -> Vec<IdOrName> {
        self.organisations.into_iter().map(IdOrName::from).collect()
    }
}

/// 値が null の場合も「指定あり」として扱う
fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// --- レスポンスDTO ---

/// 組織レスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganisationResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub properties: Value,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
    /// リンク先の組織名（get / list のみ）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<String>>,
}

impl From<OrganisationModel> for OrganisationResponse {
    fn from(organisation: OrganisationModel) -> Self {
        Self {
            id: organisation.id,
            name: organisation.name,
            description: organisation.description,
            properties: organisation.properties,
            created_at: organisation.created_at,
            created_by: organisation.created_by,
            updated_at: organisation.updated_at,
            updated_by: organisation.updated_by,
            links: None,
        }
    }
}

impl From<RichOrganisation> for OrganisationResponse {
    fn from(rich: RichOrganisation) -> Self {
        let links = rich.links.into_iter().map(|link| link.name).collect();
        Self {
            links: Some(links),
            ..OrganisationResponse::from(rich.organisation)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_validation() {
        let valid: CreateOrganisationRequest =
            serde_json::from_value(json!({ "name": "CERT-EU", "description": "Response team" }))
                .unwrap();
        assert!(valid.validate().is_ok());
        assert!(valid.properties.is_empty());

        let invalid: CreateOrganisationRequest =
            serde_json::from_value(json!({ "name": "-bad" })).unwrap();
        assert!(invalid.validate().is_err());

        let uuid_name: CreateOrganisationRequest =
            serde_json::from_value(json!({ "name": Uuid::new_v4().to_string() })).unwrap();
        assert!(uuid_name.validate().is_err());
    }

    #[test]
    fn test_description_length_limit() {
        let at_limit: CreateOrganisationRequest =
            serde_json::from_value(json!({ "name": "soc", "description": "a".repeat(1000) }))
                .unwrap();
        assert!(at_limit.validate().is_ok());

        let too_long: UpdateOrganisationRequest =
            serde_json::from_value(json!({ "description": "a".repeat(1001) })).unwrap();
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_create_request_rejects_unknown_fields() {
        let result = serde_json::from_value::<CreateOrganisationRequest>(
            json!({ "name": "soc", "owner": "eve" }),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_update_request_distinguishes_null_and_absent() {
        let absent: UpdateOrganisationRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(absent.description, None);
        assert!(absent.into_updaters().is_empty());

        let cleared: UpdateOrganisationRequest =
            serde_json::from_value(json!({ "description": null })).unwrap();
        assert_eq!(cleared.description, Some(None));
        assert_eq!(
            cleared.into_updaters(),
            vec![PropertyUpdater::SetDescription(None)]
        );
    }

    #[test]
    fn test_update_request_into_updaters() {
        let request: UpdateOrganisationRequest = serde_json::from_value(json!({
            "name": "soc-eu",
            "properties": { "tier": 2, "legacy": null }
        }))
        .unwrap();
        assert!(request.validate().is_ok());

        let updaters = request.into_updaters();
        assert_eq!(updaters[0], PropertyUpdater::SetName("soc-eu".to_string()));
        assert!(updaters.contains(&PropertyUpdater::SetProperty("tier".to_string(), json!(2))));
        assert!(updaters.contains(&PropertyUpdater::RemoveProperty("legacy".to_string())));
    }

    #[test]
    fn test_response_from_rich_organisation() {
        let base = OrganisationModel {
            id: Uuid::new_v4(),
            name: "soc".to_string(),
            description: None,
            properties: json!({ "country": "FR" }),
            created_by: "alice".to_string(),
            created_at: Utc::now(),
            updated_by: None,
            updated_at: None,
        };
        let partner = OrganisationModel {
            id: Uuid::new_v4(),
            name: "partner".to_string(),
            ..base.clone()
        };

        let plain = serde_json::to_value(OrganisationResponse::from(base.clone())).unwrap();
        assert!(plain.get("links").is_none());
        assert_eq!(plain["properties"]["country"], "FR");

        let rich = serde_json::to_value(OrganisationResponse::from(RichOrganisation {
            organisation: base,
            links: vec![partner],
        }))
        .unwrap();
        assert_eq!(rich["links"], json!(["partner"]));
        assert_eq!(rich["created_by"], "alice");
    }
}
