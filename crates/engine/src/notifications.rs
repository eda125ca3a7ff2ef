//! Notifications written alongside state transitions.
//!
//! A notification is inserted in the same database transaction as the
//! change it reports, so it never describes a transition that rolled back.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationCategory {
    Swap,
    Meeting,
    Circle,
}

impl NotificationCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Swap => "SWAP",
            Self::Meeting => "MEETING",
            Self::Circle => "CIRCLE",
        }
    }
}

impl TryFrom<&str> for NotificationCategory {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "SWAP" => Ok(Self::Swap),
            "MEETING" => Ok(Self::Meeting),
            "CIRCLE" => Ok(Self::Circle),
            other => Err(EngineError::Invalid(format!(
                "invalid notification category: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub body: String,
    /// Dotted event name, e.g. `swap.proposal_accepted`.
    pub kind: String,
    pub category: NotificationCategory,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// A notification about to be written.
#[derive(Clone, Debug)]
pub(crate) struct NewNotification {
    pub user_id: Uuid,
    pub title: String,
    pub body: String,
    pub kind: &'static str,
    pub category: NotificationCategory,
    pub link: Option<String>,
}

impl NewNotification {
    pub(crate) fn new(
        user_id: Uuid,
        category: NotificationCategory,
        kind: &'static str,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            title: title.into(),
            body: body.into(),
            kind,
            category,
            link: None,
        }
    }

    #[must_use]
    pub(crate) fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub(crate) fn into_active_model(self, created_at: DateTime<Utc>) -> ActiveModel {
        ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4().to_string()),
            user_id: ActiveValue::Set(self.user_id.to_string()),
            title: ActiveValue::Set(self.title),
            body: ActiveValue::Set(self.body),
            kind: ActiveValue::Set(self.kind.to_string()),
            category: ActiveValue::Set(self.category.as_str().to_string()),
            link: ActiveValue::Set(self.link),
            is_read: ActiveValue::Set(false),
            created_at: ActiveValue::Set(created_at),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub body: String,
    pub kind: String,
    pub category: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Notification {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "notification")?,
            user_id: parse_uuid(&model.user_id, "user")?,
            title: model.title,
            body: model.body,
            kind: model.kind,
            category: NotificationCategory::try_from(model.category.as_str())?,
            link: model.link,
            is_read: model.is_read,
            created_at: model.created_at,
        })
    }
}
