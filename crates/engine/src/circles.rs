//! Circles: named groups where members share items.
//!
//! Private circles are invisible to non-members; members enter them only
//! when an admin adds them.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Circle {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub is_private: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "circles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub is_private: bool,
    pub created_by: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::circle_members::Entity")]
    Members,
    #[sea_orm(has_many = "super::circle_items::Entity")]
    Items,
}

impl Related<super::circle_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl Related<super::circle_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Circle> for ActiveModel {
    fn from(circle: &Circle) -> Self {
        Self {
            id: ActiveValue::Set(circle.id.to_string()),
            name: ActiveValue::Set(circle.name.clone()),
            description: ActiveValue::Set(circle.description.clone()),
            image: ActiveValue::Set(circle.image.clone()),
            is_private: ActiveValue::Set(circle.is_private),
            created_by: ActiveValue::Set(circle.created_by.to_string()),
            created_at: ActiveValue::Set(circle.created_at),
        }
    }
}

impl TryFrom<Model> for Circle {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "circle")?,
            name: model.name,
            description: model.description,
            image: model.image,
            is_private: model.is_private,
            created_by: parse_uuid(&model.created_by, "user")?,
            created_at: model.created_at,
        })
    }
}
