// src/repository/organisation_membership_repository.rs

use crate::domain::organisation_membership_model::{
    self, permissions_value, ActiveModel as MembershipActiveModel, Entity as MembershipEntity,
    Model as MembershipModel,
};
use crate::domain::organisation_model::{self, Model as OrganisationModel};
use crate::domain::permission::Permission;
use chrono::Utc;
use sea_orm::{entity::*, query::*, ConnectionTrait, DbErr};
use std::collections::HashSet;
use uuid::Uuid;

pub struct OrganisationMembershipRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> OrganisationMembershipRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// ユーザーの所属を組織付きで取得
    pub async fn find_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<(MembershipModel, OrganisationModel)>, DbErr> {
        let rows = MembershipEntity::find()
            .filter(organisation_membership_model::Column::UserId.eq(user_id))
            .find_also_related(organisation_model::Entity)
            .order_by_asc(organisation_model::Column::Name)
            .all(self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(membership, organisation)| organisation.map(|o| (membership, o)))
            .collect())
    }

    pub async fn find(
        &self,
        user_id: Uuid,
        organisation_id: Uuid,
    ) -> Result<Option<MembershipModel>, DbErr> {
        MembershipEntity::find()
            .filter(organisation_membership_model::Column::UserId.eq(user_id))
            .filter(organisation_membership_model::Column::OrganisationId.eq(organisation_id))
            .one(self.conn)
            .await
    }

    /// 所属を作成、既にあれば権限を置き換える
    pub async fn upsert(
        &self,
        user_id: Uuid,
        organisation_id: Uuid,
        permissions: &HashSet<Permission>,
    ) -> Result<MembershipModel, DbErr> {
        let permissions = permissions_value(permissions);

        match self.find(user_id, organisation_id).await? {
            Some(existing) => {
                let mut active: MembershipActiveModel = existing.into();
                active.permissions = Set(permissions);
                active.update(self.conn).await
            }
            None => {
                let membership = MembershipActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(user_id),
                    organisation_id: Set(organisation_id),
                    permissions: Set(permissions),
                    joined_at: Set(Utc::now()),
                };
                membership.insert(self.conn).await
            }
        }
    }
}
