//! Listed items.
//!
//! An `Item` belongs to one user. `is_swapped` is owned by the swap
//! lifecycle: it is flipped only when a proposal that involves the item is
//! accepted or an accepted proposal is cancelled.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    util::{parse_uuid, search_key},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemCondition {
    New,
    LikeNew,
    Good,
    Fair,
    Poor,
}

impl ItemCondition {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::LikeNew => "LIKE_NEW",
            Self::Good => "GOOD",
            Self::Fair => "FAIR",
            Self::Poor => "POOR",
        }
    }
}

impl TryFrom<&str> for ItemCondition {
    type Error = EngineError;

    /// Accepts the canonical form as well as `like new`, `Like-New`, ...
    fn try_from(value: &str) -> ResultEngine<Self> {
        let canonical = value.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        match canonical.as_str() {
            "NEW" => Ok(Self::New),
            "LIKE_NEW" => Ok(Self::LikeNew),
            "GOOD" => Ok(Self::Good),
            "FAIR" => Ok(Self::Fair),
            "POOR" => Ok(Self::Poor),
            _ => Err(EngineError::Invalid(format!(
                "invalid item condition: {value}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub current_price: f64,
    pub original_price: f64,
    pub currency: String,
    pub company: String,
    pub category: String,
    pub condition: ItemCondition,
    pub has_bill: bool,
    /// Age in months.
    pub item_age: i32,
    pub score: f64,
    pub is_swapped: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner_id: String,
    pub title: String,
    /// Lowercased title, matched by browse queries.
    pub title_search: String,
    pub description: String,
    pub image: Option<String>,
    pub current_price: f64,
    pub original_price: f64,
    pub currency: String,
    pub company: String,
    pub category: String,
    pub condition: String,
    pub has_bill: bool,
    pub item_age: i32,
    pub score: f64,
    pub is_swapped: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Owner,
    #[sea_orm(has_one = "super::boosted_items::Entity")]
    Boost,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::boosted_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Boost.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Item> for ActiveModel {
    fn from(item: &Item) -> Self {
        Self {
            id: ActiveValue::Set(item.id.to_string()),
            owner_id: ActiveValue::Set(item.owner_id.to_string()),
            title: ActiveValue::Set(item.title.clone()),
            title_search: ActiveValue::Set(search_key(&item.title)),
            description: ActiveValue::Set(item.description.clone()),
            image: ActiveValue::Set(item.image.clone()),
            current_price: ActiveValue::Set(item.current_price),
            original_price: ActiveValue::Set(item.original_price),
            currency: ActiveValue::Set(item.currency.clone()),
            company: ActiveValue::Set(item.company.clone()),
            category: ActiveValue::Set(item.category.clone()),
            condition: ActiveValue::Set(item.condition.as_str().to_string()),
            has_bill: ActiveValue::Set(item.has_bill),
            item_age: ActiveValue::Set(item.item_age),
            score: ActiveValue::Set(item.score),
            is_swapped: ActiveValue::Set(item.is_swapped),
            created_at: ActiveValue::Set(item.created_at),
        }
    }
}

impl TryFrom<Model> for Item {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "item")?,
            owner_id: parse_uuid(&model.owner_id, "user")?,
            title: model.title,
            description: model.description,
            image: model.image,
            current_price: model.current_price,
            original_price: model.original_price,
            currency: model.currency,
            company: model.company,
            category: model.category,
            condition: ItemCondition::try_from(model.condition.as_str())?,
            has_bill: model.has_bill,
            item_age: model.item_age,
            score: model.score,
            is_swapped: model.is_swapped,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_parses_loose_spellings() {
        assert_eq!(
            ItemCondition::try_from("like new").unwrap(),
            ItemCondition::LikeNew
        );
        assert_eq!(
            ItemCondition::try_from("Like-New").unwrap(),
            ItemCondition::LikeNew
        );
        assert_eq!(ItemCondition::try_from("good").unwrap(), ItemCondition::Good);
        assert!(ItemCondition::try_from("mint").is_err());
    }
}
