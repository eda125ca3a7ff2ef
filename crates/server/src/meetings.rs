use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use api_types::meeting::{MeetingResponse, MeetingSchedule, MeetingView};
use engine::{ScheduleMeetingCmd, User};

use crate::{ServerError, server::ServerState, views};

/// Schedule the meeting of an accepted swap, or move an existing one.
pub async fn schedule(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(swap_id): Path<Uuid>,
    Json(payload): Json<MeetingSchedule>,
) -> Result<Json<MeetingView>, ServerError> {
    let mut cmd = ScheduleMeetingCmd::new(
        swap_id,
        user.id,
        payload.location,
        payload.date,
        payload.time,
    );
    if let Some(notes) = payload.notes {
        cmd = cmd.notes(notes);
    }

    let meeting = state.engine.schedule_meeting(cmd).await?;
    Ok(Json(views::meeting(meeting)))
}

pub async fn for_swap(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(swap_id): Path<Uuid>,
) -> Result<Json<MeetingResponse>, ServerError> {
    let meeting = state.engine.meeting_for_swap(swap_id, user.id).await?;
    Ok(Json(MeetingResponse {
        meeting: meeting.map(views::meeting),
    }))
}

pub async fn cancel(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(meeting_id): Path<Uuid>,
) -> Result<Json<MeetingView>, ServerError> {
    let meeting = state.engine.cancel_meeting(meeting_id, user.id).await?;
    Ok(Json(views::meeting(meeting)))
}
