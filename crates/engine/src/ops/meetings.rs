use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Meeting, MeetingStatus, NotificationCategory, ResultEngine, ScheduleMeetingCmd,
    SwapStatus, notifications::NewNotification, swap_meetings,
    util::{normalize_optional_text, normalize_text, parse_meeting_date, parse_meeting_time, parse_uuid},
};

use super::Engine;

impl Engine {
    /// Create the meeting of an accepted swap, or move an existing one, which
    /// then becomes `RESCHEDULED`.
    pub async fn schedule_meeting(&self, cmd: ScheduleMeetingCmd) -> ResultEngine<Meeting> {
        let location = normalize_text(&cmd.location);
        if location.is_empty() {
            return Err(EngineError::Invalid(
                "meeting location must not be empty".to_string(),
            ));
        }
        let date = parse_meeting_date(&cmd.date)?;
        let time = parse_meeting_time(&cmd.time)?;
        let notes = normalize_optional_text(cmd.notes.as_deref());

        self.with_tx(|engine, db_tx| {
            Box::pin(async move {
                let (proposal, party) = engine
                    .require_swap_party(db_tx, cmd.swap_id, cmd.user_id)
                    .await?;
                if proposal.status != SwapStatus::Accepted {
                    return Err(EngineError::InvalidState(
                        "meetings can only be scheduled for accepted swaps".to_string(),
                    ));
                }

                let now = Utc::now();
                let existing = swap_meetings::Entity::find()
                    .filter(swap_meetings::Column::SwapId.eq(cmd.swap_id.to_string()))
                    .one(db_tx)
                    .await?;

                let model = match existing {
                    Some(model) => {
                        let mut active: swap_meetings::ActiveModel = model.into();
                        active.location = ActiveValue::Set(location);
                        active.date = ActiveValue::Set(date);
                        active.time = ActiveValue::Set(time);
                        active.notes = ActiveValue::Set(notes);
                        active.status =
                            ActiveValue::Set(MeetingStatus::Rescheduled.as_str().to_string());
                        active.updated_at = ActiveValue::Set(now);
                        active.update(db_tx).await?
                    }
                    None => {
                        let meeting = Meeting {
                            id: Uuid::new_v4(),
                            swap_id: cmd.swap_id,
                            location,
                            date,
                            time,
                            notes,
                            status: MeetingStatus::Scheduled,
                            created_at: now,
                            updated_at: now,
                        };
                        swap_meetings::ActiveModel::from(&meeting)
                            .insert(db_tx)
                            .await?
                    }
                };
                let meeting = Meeting::try_from(model)?;

                let actor = engine.require_user(db_tx, cmd.user_id).await?;
                let title = match meeting.status {
                    MeetingStatus::Rescheduled => "Meeting Rescheduled",
                    _ => "Meeting Scheduled",
                };
                engine
                    .notify(
                        db_tx,
                        NewNotification::new(
                            proposal.counterpart(party),
                            NotificationCategory::Meeting,
                            "meeting.scheduled",
                            title,
                            format!(
                                "{} set a meeting at {} on {} at {}",
                                actor.display_name(),
                                meeting.location,
                                meeting.date,
                                meeting.time
                            ),
                        )
                        .link(format!("/swap/{}", proposal.id)),
                    )
                    .await?;

                Ok(meeting)
            })
        })
        .await
    }

    pub async fn cancel_meeting(&self, meeting_id: Uuid, actor: Uuid) -> ResultEngine<Meeting> {
        self.with_tx(|engine, db_tx| {
            Box::pin(async move {
                let model = swap_meetings::Entity::find_by_id(meeting_id.to_string())
                    .one(db_tx)
                    .await?
                    .ok_or_else(|| EngineError::KeyNotFound("meeting".to_string()))?;
                let swap_id = parse_uuid(&model.swap_id, "swap proposal")?;
                let (proposal, party) = engine.require_swap_party(db_tx, swap_id, actor).await?;
                if MeetingStatus::try_from(model.status.as_str())? == MeetingStatus::Cancelled {
                    return Err(EngineError::InvalidState(
                        "meeting is already cancelled".to_string(),
                    ));
                }

                let mut active: swap_meetings::ActiveModel = model.into();
                active.status = ActiveValue::Set(MeetingStatus::Cancelled.as_str().to_string());
                active.updated_at = ActiveValue::Set(Utc::now());
                let meeting = Meeting::try_from(active.update(db_tx).await?)?;

                let actor_user = engine.require_user(db_tx, actor).await?;
                engine
                    .notify(
                        db_tx,
                        NewNotification::new(
                            proposal.counterpart(party),
                            NotificationCategory::Meeting,
                            "meeting.canceled",
                            "Meeting Cancelled",
                            format!("{} cancelled your meeting", actor_user.display_name()),
                        )
                        .link(format!("/swap/{}", proposal.id)),
                    )
                    .await?;

                Ok(meeting)
            })
        })
        .await
    }

    /// The meeting of a swap, if any. Parties only.
    pub async fn meeting_for_swap(
        &self,
        swap_id: Uuid,
        actor: Uuid,
    ) -> ResultEngine<Option<Meeting>> {
        self.with_tx(|engine, db_tx| {
            Box::pin(async move {
                engine.require_swap_party(db_tx, swap_id, actor).await?;
                swap_meetings::Entity::find()
                    .filter(swap_meetings::Column::SwapId.eq(swap_id.to_string()))
                    .one(db_tx)
                    .await?
                    .map(Meeting::try_from)
                    .transpose()
            })
        })
        .await
    }
}
