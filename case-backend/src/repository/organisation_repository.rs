// src/repository/organisation_repository.rs

use crate::domain::id_or_name::IdOrName;
use crate::domain::organisation_link_model::{
    self, ActiveModel as LinkActiveModel, Entity as LinkEntity,
};
use crate::domain::organisation_model::{
    self, ActiveModel as OrganisationActiveModel, Entity as OrganisationEntity,
    Model as OrganisationModel, RichOrganisation,
};
use crate::domain::property_update::AppliedUpdate;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{entity::*, query::*, ConnectionTrait, DbErr};
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};
use uuid::Uuid;

/// `update_links` で実際に追加・削除されたリンク先
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkChanges {
    pub added: Vec<Uuid>,
    pub removed: Vec<Uuid>,
}

/// 組織とリンクのストア
///
/// 接続でもトランザクションでも動作する。リンク行を書き換えるのは
/// `double_link` / `double_unlink` / `update_links` だけで、常に両方向をまとめて扱う。
pub struct OrganisationRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> OrganisationRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<OrganisationModel>, DbErr> {
        OrganisationEntity::find_by_id(id).one(self.conn).await
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<OrganisationModel>, DbErr> {
        OrganisationEntity::find()
            .filter(organisation_model::Column::Name.eq(name))
            .one(self.conn)
            .await
    }

    pub async fn find_by_id_or_name(
        &self,
        key: &IdOrName,
    ) -> Result<Option<OrganisationModel>, DbErr> {
        match key {
            IdOrName::Id(id) => self.find_by_id(*id).await,
            IdOrName::Name(name) => self.find_by_name(name).await,
        }
    }

    /// 複数の参照をまとめて解決する。見つからなかった参照は `Err` で返す
    pub async fn resolve_all(
        &self,
        keys: &[IdOrName],
    ) -> Result<Result<Vec<OrganisationModel>, IdOrName>, DbErr> {
        let mut organisations = Vec::with_capacity(keys.len());
        for key in keys {
            match self.find_by_id_or_name(key).await? {
                Some(organisation) => organisations.push(organisation),
                None => return Ok(Err(key.clone())),
            }
        }
        Ok(Ok(organisations))
    }

    pub async fn find_all(&self) -> Result<Vec<OrganisationModel>, DbErr> {
        OrganisationEntity::find()
            .order_by_asc(organisation_model::Column::Name)
            .all(self.conn)
            .await
    }

    /// 組織を作成
    pub async fn create(
        &self,
        name: String,
        description: Option<String>,
        properties: Map<String, Value>,
        created_by: String,
    ) -> Result<OrganisationModel, DbErr> {
        let organisation = OrganisationActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            description: Set(description),
            properties: Set(Value::Object(properties)),
            created_by: Set(created_by),
            created_at: Set(Utc::now()),
            updated_by: Set(None),
            updated_at: Set(None),
        };

        organisation.insert(self.conn).await
    }

    /// 変更結果を保存し、更新者と更新日時を記録する
    pub async fn update(
        &self,
        organisation: OrganisationModel,
        applied: AppliedUpdate,
        updated_by: String,
    ) -> Result<OrganisationModel, DbErr> {
        let mut active: OrganisationActiveModel = organisation.into();
        active.name = Set(applied.name);
        active.description = Set(applied.description);
        active.properties = Set(Value::Object(applied.properties));
        active.updated_by = Set(Some(updated_by));
        active.updated_at = Set(Some(Utc::now()));

        active.update(self.conn).await
    }

    /// リンク先の組織ID
    pub async fn linked_ids(&self, organisation_id: Uuid) -> Result<Vec<Uuid>, DbErr> {
        let links = LinkEntity::find()
            .filter(organisation_link_model::Column::FromOrganisationId.eq(organisation_id))
            .all(self.conn)
            .await?;

        Ok(links.into_iter().map(|l| l.to_organisation_id).collect())
    }

    /// リンク先の組織（名前順）
    pub async fn neighbours(&self, organisation_id: Uuid) -> Result<Vec<OrganisationModel>, DbErr> {
        let ids = self.linked_ids(organisation_id).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        OrganisationEntity::find()
            .filter(organisation_model::Column::Id.is_in(ids))
            .order_by_asc(organisation_model::Column::Name)
            .all(self.conn)
            .await
    }

    pub async fn find_rich(&self, key: &IdOrName) -> Result<Option<RichOrganisation>, DbErr> {
        let Some(organisation) = self.find_by_id_or_name(key).await? else {
            return Ok(None);
        };
        let links = self.neighbours(organisation.id).await?;

        Ok(Some(RichOrganisation {
            organisation,
            links,
        }))
    }

    /// 全組織をリンク先付きで取得（名前順）
    pub async fn find_all_rich(&self) -> Result<Vec<RichOrganisation>, DbErr> {
        let organisations = self.find_all().await?;
        let links = LinkEntity::find().all(self.conn).await?;

        let by_id: HashMap<Uuid, &OrganisationModel> =
            organisations.iter().map(|o| (o.id, o)).collect();
        let mut adjacency: HashMap<Uuid, Vec<OrganisationModel>> = HashMap::new();
        for link in &links {
            if let Some(target) = by_id.get(&link.to_organisation_id) {
                adjacency
                    .entry(link.from_organisation_id)
                    .or_default()
                    .push((*target).clone());
            }
        }

        Ok(organisations
            .iter()
            .map(|organisation| {
                let mut links = adjacency.remove(&organisation.id).unwrap_or_default();
                links.sort_by(|a, b| a.name.cmp(&b.name));
                RichOrganisation {
                    organisation: organisation.clone(),
                    links,
                }
            })
            .collect())
    }

    fn edge(from: Uuid, to: Uuid) -> LinkActiveModel {
        LinkActiveModel {
            id: Set(Uuid::new_v4()),
            from_organisation_id: Set(from),
            to_organisation_id: Set(to),
            created_at: Set(Utc::now()),
        }
    }

    /// 両方向のリンクを作成する。すでに存在する方向は一意制約により読み飛ばす
    ///
    /// 新しく行を作成した場合は `true`
    pub async fn double_link(&self, a: Uuid, b: Uuid) -> Result<bool, DbErr> {
        let inserted = LinkEntity::insert_many([Self::edge(a, b), Self::edge(b, a)])
            .on_conflict(
                OnConflict::columns([
                    organisation_link_model::Column::FromOrganisationId,
                    organisation_link_model::Column::ToOrganisationId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.conn)
            .await?;
        Ok(inserted > 0)
    }

    /// 両方向のリンクを削除し、削除した行数を返す
    pub async fn double_unlink(&self, a: Uuid, b: Uuid) -> Result<u64, DbErr> {
        let result = LinkEntity::delete_many()
            .filter(
                Condition::any()
                    .add(
                        Condition::all()
                            .add(organisation_link_model::Column::FromOrganisationId.eq(a))
                            .add(organisation_link_model::Column::ToOrganisationId.eq(b)),
                    )
                    .add(
                        Condition::all()
                            .add(organisation_link_model::Column::FromOrganisationId.eq(b))
                            .add(organisation_link_model::Column::ToOrganisationId.eq(a)),
                    ),
            )
            .exec(self.conn)
            .await?;
        Ok(result.rows_affected)
    }

    /// `from` のリンク集合を `targets` に置き換える（両方向）
    pub async fn update_links(&self, from: Uuid, targets: &[Uuid]) -> Result<LinkChanges, DbErr> {
        let current: BTreeSet<Uuid> = self.linked_ids(from).await?.into_iter().collect();
        let wanted: BTreeSet<Uuid> = targets.iter().copied().collect();

        let mut changes = LinkChanges::default();

        for removed in current.difference(&wanted) {
            self.double_unlink(from, *removed).await?;
            changes.removed.push(*removed);
        }

        for added in wanted.difference(&current) {
            self.double_link(from, *added).await?;
            changes.added.push(*added);
        }

        Ok(changes)
    }
}
