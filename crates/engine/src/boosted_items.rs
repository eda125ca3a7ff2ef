//! Boosts: time-limited visibility promotion, at most one per item.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Boost {
    pub item_id: Uuid,
    pub user_id: Uuid,
    pub boosted_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Boost {
    /// A boost ranks only until it expires, even if the sweeper has not
    /// removed the row yet.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "boosted_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub item_id: String,
    pub user_id: String,
    pub boosted_at: DateTimeUtc,
    pub expires_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::items::Entity",
        from = "Column::ItemId",
        to = "super::items::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Items,
}

impl Related<super::items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Boost> for ActiveModel {
    fn from(boost: &Boost) -> Self {
        Self {
            item_id: ActiveValue::Set(boost.item_id.to_string()),
            user_id: ActiveValue::Set(boost.user_id.to_string()),
            boosted_at: ActiveValue::Set(boost.boosted_at),
            expires_at: ActiveValue::Set(boost.expires_at),
        }
    }
}

impl TryFrom<Model> for Boost {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            item_id: parse_uuid(&model.item_id, "item")?,
            user_id: parse_uuid(&model.user_id, "user")?,
            boosted_at: model.boosted_at,
            expires_at: model.expires_at,
        })
    }
}
