//! Swap proposal endpoints. Every route acts on behalf of the caller, who
//! must be a party of the proposal.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use api_types::swap::{SwapDetailResponse, SwapListQuery, SwapNew, SwapView, SwapsResponse};
use engine::{ProposeSwapCmd, User};

use crate::{ServerError, server::ServerState, views};

pub async fn propose(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<SwapNew>,
) -> Result<(StatusCode, Json<SwapView>), ServerError> {
    let mut cmd = ProposeSwapCmd::new(
        user.id,
        payload.receiver_id,
        payload.proposed_item_id,
        payload.receiver_item_id,
    );
    if let Some(message) = payload.message {
        cmd = cmd.message(message);
    }

    let proposal = state.engine.propose_swap(cmd).await?;
    Ok((StatusCode::CREATED, Json(views::swap(proposal))))
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Query(query): Query<SwapListQuery>,
) -> Result<Json<SwapsResponse>, ServerError> {
    let swaps = state
        .engine
        .list_swaps(
            user.id,
            views::swap_direction_from_api(query.direction.unwrap_or_default()),
            query.status.map(views::swap_status_from_api),
        )
        .await?
        .into_iter()
        .map(views::swap)
        .collect();

    Ok(Json(SwapsResponse { swaps }))
}

pub async fn detail(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(swap_id): Path<Uuid>,
) -> Result<Json<SwapDetailResponse>, ServerError> {
    let detail = state.engine.swap_detail(swap_id, user.id).await?;

    Ok(Json(SwapDetailResponse {
        swap: views::swap(detail.proposal),
        proposer: views::public_user(detail.proposer),
        receiver: views::public_user(detail.receiver),
        proposed_item: views::item(detail.proposed_item),
        receiver_item: views::item(detail.receiver_item),
        meeting: detail.meeting.map(views::meeting),
    }))
}

pub async fn accept(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(swap_id): Path<Uuid>,
) -> Result<Json<SwapView>, ServerError> {
    let proposal = state.engine.accept_swap(swap_id, user.id).await?;
    Ok(Json(views::swap(proposal)))
}

pub async fn reject(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(swap_id): Path<Uuid>,
) -> Result<Json<SwapView>, ServerError> {
    let proposal = state.engine.reject_swap(swap_id, user.id).await?;
    Ok(Json(views::swap(proposal)))
}

pub async fn cancel(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(swap_id): Path<Uuid>,
) -> Result<Json<SwapView>, ServerError> {
    let proposal = state.engine.cancel_swap(swap_id, user.id).await?;
    Ok(Json(views::swap(proposal)))
}
