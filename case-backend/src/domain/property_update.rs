// src/domain/property_update.rs

use crate::domain::organisation_model;
use crate::error::{AppError, AppResult};
use serde_json::{Map, Value};

/// 組織に対する個々の変更操作
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyUpdater {
    SetName(String),
    /// `None` で説明を消去
    SetDescription(Option<String>),
    SetProperty(String, Value),
    RemoveProperty(String),
}

impl PropertyUpdater {
    /// 追加プロパティの変更指定（値が null のキーは削除）を変換
    pub fn from_properties(properties: Map<String, Value>) -> Vec<PropertyUpdater> {
        properties
            .into_iter()
            .map(|(key, value)| match value {
                Value::Null => PropertyUpdater::RemoveProperty(key),
                value => PropertyUpdater::SetProperty(key, value),
            })
            .collect()
    }

    pub fn field(&self) -> String {
        match self {
            PropertyUpdater::SetName(_) => "name".to_string(),
            PropertyUpdater::SetDescription(_) => "description".to_string(),
            PropertyUpdater::SetProperty(key, _) | PropertyUpdater::RemoveProperty(key) => {
                format!("properties.{}", key)
            }
        }
    }
}

/// 変更を適用した結果
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedUpdate {
    pub name: String,
    pub description: Option<String>,
    pub properties: Map<String, Value>,
    pub renamed: bool,
}

/// 変更リストを現在の組織に適用する（DBには書き込まない）
///
/// 保存済みのプロパティがオブジェクトでない場合は上書きせずにエラーとする。
pub fn apply_updaters(
    organisation: &organisation_model::Model,
    updaters: &[PropertyUpdater],
) -> AppResult<AppliedUpdate> {
    let Value::Object(properties) = &organisation.properties else {
        tracing::error!(
            organisation_id = %organisation.id,
            "Stored organisation properties are not a JSON object"
        );
        return Err(AppError::InternalServerError(format!(
            "Organisation {} has malformed properties",
            organisation.name
        )));
    };

    let mut applied = AppliedUpdate {
        name: organisation.name.clone(),
        description: organisation.description.clone(),
        properties: properties.clone(),
        renamed: false,
    };

    for updater in updaters {
        match updater {
            PropertyUpdater::SetName(name) => {
                applied.renamed = *name != organisation.name;
                applied.name = name.clone();
            }
            PropertyUpdater::SetDescription(description) => {
                applied.description = description.clone();
            }
            PropertyUpdater::SetProperty(key, value) => {
                applied.properties.insert(key.clone(), value.clone());
            }
            PropertyUpdater::RemoveProperty(key) => {
                applied.properties.remove(key);
            }
        }
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    fn organisation() -> organisation_model::Model {
        organisation_model::Model {
            id: Uuid::new_v4(),
            name: "soc".to_string(),
            description: Some("Security operations".to_string()),
            properties: json!({ "country": "FR", "tier": 1 }),
            created_by: "alice".to_string(),
            created_at: Utc::now(),
            updated_by: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_from_properties_null_removes() {
        let properties = json!({ "tier": 2, "country": null });
        let updaters = match properties {
            Value::Object(map) => PropertyUpdater::from_properties(map),
            _ => unreachable!(),
        };

        assert!(updaters.contains(&PropertyUpdater::SetProperty("tier".to_string(), json!(2))));
        assert!(updaters.contains(&PropertyUpdater::RemoveProperty("country".to_string())));
    }

    #[test]
    fn test_apply_updaters() {
        let org = organisation();
        let applied = apply_updaters(
            &org,
            &[
                PropertyUpdater::SetName("soc-eu".to_string()),
                PropertyUpdater::SetDescription(None),
                PropertyUpdater::SetProperty("tier".to_string(), json!(3)),
                PropertyUpdater::RemoveProperty("country".to_string()),
            ],
        )
        .unwrap();

        assert_eq!(applied.name, "soc-eu");
        assert!(applied.renamed);
        assert_eq!(applied.description, None);
        assert_eq!(applied.properties.get("tier"), Some(&json!(3)));
        assert!(!applied.properties.contains_key("country"));
    }

    #[test]
    fn test_same_name_is_not_a_rename() {
        let org = organisation();
        let applied =
            apply_updaters(&org, &[PropertyUpdater::SetName("soc".to_string())]).unwrap();
        assert!(!applied.renamed);
        assert_eq!(applied.description.as_deref(), Some("Security operations"));
        assert_eq!(applied.properties.get("country"), Some(&json!("FR")));
    }

    #[test]
    fn test_non_object_properties_are_not_overwritten() {
        let mut org = organisation();
        org.properties = json!(["country", "FR"]);

        let result = apply_updaters(
            &org,
            &[PropertyUpdater::SetProperty("tier".to_string(), json!(1))],
        );
        assert!(matches!(result, Err(AppError::InternalServerError(_))));
    }

    #[test]
    fn test_field_names() {
        assert_eq!(PropertyUpdater::SetName("x".to_string()).field(), "name");
        assert_eq!(
            PropertyUpdater::RemoveProperty("tier".to_string()).field(),
            "properties.tier"
        );
    }
}
