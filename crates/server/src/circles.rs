//! Circle endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use api_types::circle::{
    CircleDetailResponse, CircleItemView, CircleMemberView, CircleNew, CircleSummaryView,
    CircleView, CirclesResponse, ItemShare, MemberAdd,
};
use engine::{CircleRole, NewCircleCmd, User};

use crate::{ServerError, server::ServerState, views};

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<CircleNew>,
) -> Result<(StatusCode, Json<CircleView>), ServerError> {
    let mut cmd = NewCircleCmd::new(user.id, payload.name).private(payload.is_private);
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    if let Some(image) = payload.image {
        cmd = cmd.image(image);
    }

    let circle = state.engine.create_circle(cmd).await?;
    Ok((StatusCode::CREATED, Json(views::circle(circle))))
}

/// Public circles plus the private ones the caller belongs to.
pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<CirclesResponse>, ServerError> {
    let circles = state
        .engine
        .list_circles(user.id)
        .await?
        .into_iter()
        .map(|summary| CircleSummaryView {
            circle: views::circle(summary.circle),
            member_count: summary.member_count,
            my_role: summary.my_role.map(views::circle_role),
        })
        .collect();

    Ok(Json(CirclesResponse { circles }))
}

pub async fn detail(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(circle_id): Path<Uuid>,
) -> Result<Json<CircleDetailResponse>, ServerError> {
    let detail = state.engine.circle_detail(circle_id, user.id).await?;

    Ok(Json(CircleDetailResponse {
        circle: views::circle(detail.circle),
        members: detail.members.into_iter().map(views::circle_member).collect(),
        items: detail.items.into_iter().map(views::circle_item).collect(),
        my_role: detail.my_role.map(views::circle_role),
    }))
}

pub async fn join(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(circle_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.join_circle(circle_id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn leave(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(circle_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.leave_circle(circle_id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_member(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(circle_id): Path<Uuid>,
    Json(payload): Json<MemberAdd>,
) -> Result<Json<CircleMemberView>, ServerError> {
    let role = payload
        .role
        .map_or(CircleRole::Member, views::circle_role_from_api);
    let member = state
        .engine
        .add_circle_member(circle_id, payload.user_id, role, user.id)
        .await?;
    Ok(Json(views::circle_member(member)))
}

pub async fn share_item(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(circle_id): Path<Uuid>,
    Json(payload): Json<ItemShare>,
) -> Result<(StatusCode, Json<CircleItemView>), ServerError> {
    let shared = state
        .engine
        .share_item(circle_id, payload.item_id, user.id)
        .await?;
    Ok((StatusCode::CREATED, Json(views::circle_item(shared))))
}

pub async fn approve_item(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path((circle_id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<CircleItemView>, ServerError> {
    let shared = state
        .engine
        .approve_item(circle_id, item_id, user.id)
        .await?;
    Ok(Json(views::circle_item(shared)))
}

pub async fn unshare_item(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path((circle_id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .unshare_item(circle_id, item_id, user.id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
