// src/domain/organisation_membership_model.rs

use crate::domain::permission::Permission;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// ユーザーの組織所属（組織ごとの権限セット付き）
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "organisation_memberships")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub organisation_id: Uuid,
    /// 権限名の配列（例: `["manageOrganisation"]`）
    pub permissions: Json,
    pub joined_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organisation_model::Entity",
        from = "Column::OrganisationId",
        to = "super::organisation_model::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Organisation,
}

impl Related<super::organisation_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organisation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn permission_set(&self) -> Result<HashSet<Permission>, serde_json::Error> {
        serde_json::from_value(self.permissions.clone())
    }
}

/// 権限セットを保存用の値に変換（順序を安定させる）
pub fn permissions_value(permissions: &HashSet<Permission>) -> Json {
    Json::Array(
        permissions
            .iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(|permission| Json::String(permission.to_string()))
            .collect(),
    )
}
