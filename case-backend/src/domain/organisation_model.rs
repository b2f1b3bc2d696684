// src/domain/organisation_model.rs

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 管理組織の名前。この組織への所属がプラットフォーム全体の管理権限となる
pub const ADMINISTRATION_ORGANISATION_NAME: &str = "admin";

/// 組織エンティティ（グラフの頂点）
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "organisations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// 任意の追加プロパティ（JSONオブジェクト）
    pub properties: Json,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    #[sea_orm(nullable)]
    pub updated_by: Option<String>,
    #[sea_orm(nullable)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::organisation_membership_model::Entity")]
    Memberships,
}

impl Related<super::organisation_membership_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Memberships.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_administration(&self) -> bool {
        self.name == ADMINISTRATION_ORGANISATION_NAME
    }
}

/// リンク先を含む組織（get / list の応答に使用）
#[derive(Clone, Debug, PartialEq)]
pub struct RichOrganisation {
    pub organisation: Model,
    pub links: Vec<Model>,
}
