//! In-person meetings, at most one per swap proposal.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MeetingStatus {
    Scheduled,
    Rescheduled,
    Cancelled,
}

impl MeetingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "SCHEDULED",
            Self::Rescheduled => "RESCHEDULED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl TryFrom<&str> for MeetingStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "SCHEDULED" => Ok(Self::Scheduled),
            "RESCHEDULED" => Ok(Self::Rescheduled),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(EngineError::Invalid(format!(
                "invalid meeting status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Meeting {
    pub id: Uuid,
    pub swap_id: Uuid,
    pub location: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub notes: Option<String>,
    pub status: MeetingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "swap_meetings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub swap_id: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::swap_proposals::Entity",
        from = "Column::SwapId",
        to = "super::swap_proposals::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    SwapProposals,
}

impl Related<super::swap_proposals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SwapProposals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Meeting> for ActiveModel {
    fn from(meeting: &Meeting) -> Self {
        Self {
            id: ActiveValue::Set(meeting.id.to_string()),
            swap_id: ActiveValue::Set(meeting.swap_id.to_string()),
            location: ActiveValue::Set(meeting.location.clone()),
            date: ActiveValue::Set(meeting.date.clone()),
            time: ActiveValue::Set(meeting.time.clone()),
            notes: ActiveValue::Set(meeting.notes.clone()),
            status: ActiveValue::Set(meeting.status.as_str().to_string()),
            created_at: ActiveValue::Set(meeting.created_at),
            updated_at: ActiveValue::Set(meeting.updated_at),
        }
    }
}

impl TryFrom<Model> for Meeting {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "meeting")?,
            swap_id: parse_uuid(&model.swap_id, "swap proposal")?,
            location: model.location,
            date: model.date,
            time: model.time,
            notes: model.notes,
            status: MeetingStatus::try_from(model.status.as_str())?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
