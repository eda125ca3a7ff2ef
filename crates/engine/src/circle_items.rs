//! Items shared into a circle. Visible to plain members once approved.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{EngineError, Item, util::parse_uuid};

#[derive(Clone, Debug, PartialEq)]
pub struct CircleItem {
    pub item: Item,
    pub shared_by: Uuid,
    pub is_approved: bool,
    pub shared_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "circle_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub circle_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub item_id: String,
    pub shared_by: String,
    pub is_approved: bool,
    pub shared_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::circles::Entity",
        from = "Column::CircleId",
        to = "super::circles::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Circles,
    #[sea_orm(
        belongs_to = "super::items::Entity",
        from = "Column::ItemId",
        to = "super::items::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Items,
}

impl Related<super::circles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Circles.def()
    }
}

impl Related<super::items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub(crate) fn into_circle_item(self, item: Item) -> Result<CircleItem, EngineError> {
        Ok(CircleItem {
            item,
            shared_by: parse_uuid(&self.shared_by, "user")?,
            is_approved: self.is_approved,
            shared_at: self.shared_at,
        })
    }
}
