//! Swap proposal operations.
//!
//! Every transition re-checks the stored status inside its `UPDATE`, and
//! accepting flips both item flags with `is_swapped = false` in the filter.
//! When another accept got there first the row count is short and the whole
//! transaction rolls back.

use chrono::Utc;
use sea_orm::{Condition, DatabaseTransaction, QueryFilter, QueryOrder, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{
    EngineError, Item, Meeting, NotificationCategory, ProposeSwapCmd, ResultEngine, SwapAction,
    SwapParty, SwapProposal, SwapStatus, User, items, notifications::NewNotification,
    swap_meetings, swap_proposals, util::normalize_optional_text,
};

use super::Engine;

/// Which proposals of a user to list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SwapDirection {
    Sent,
    Received,
    #[default]
    All,
}

impl TryFrom<&str> for SwapDirection {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "sent" => Ok(Self::Sent),
            "received" => Ok(Self::Received),
            "all" => Ok(Self::All),
            other => Err(EngineError::Invalid(format!("invalid swap direction: {other}"))),
        }
    }
}

/// A proposal with both parties, both items and the meeting if one exists.
#[derive(Clone, Debug, PartialEq)]
pub struct SwapDetail {
    pub proposal: SwapProposal,
    pub proposer: User,
    pub receiver: User,
    pub proposed_item: Item,
    pub receiver_item: Item,
    pub meeting: Option<Meeting>,
}

impl Engine {
    /// Offer `cmd.proposed_item_id` in exchange for `cmd.receiver_item_id`.
    pub async fn propose_swap(&self, cmd: ProposeSwapCmd) -> ResultEngine<SwapProposal> {
        if cmd.proposer_id == cmd.receiver_id {
            return Err(EngineError::Invalid(
                "cannot propose a swap to yourself".to_string(),
            ));
        }
        let message = normalize_optional_text(cmd.message.as_deref());

        self.with_tx(|engine, db_tx| {
            Box::pin(async move {
                let proposer = engine.require_user(db_tx, cmd.proposer_id).await?;
                engine.require_user_model(db_tx, cmd.receiver_id).await?;
                let proposed_item = engine.require_item(db_tx, cmd.proposed_item_id).await?;
                let receiver_item = engine.require_item(db_tx, cmd.receiver_item_id).await?;

                if proposed_item.owner_id != cmd.proposer_id {
                    return Err(EngineError::Forbidden(
                        "you can only offer your own items".to_string(),
                    ));
                }
                if receiver_item.owner_id != cmd.receiver_id {
                    return Err(EngineError::Invalid(
                        "requested item does not belong to the receiver".to_string(),
                    ));
                }
                if proposed_item.is_swapped || receiver_item.is_swapped {
                    return Err(EngineError::Unavailable(
                        "one of the items has already been swapped".to_string(),
                    ));
                }

                let now = Utc::now();
                let proposal = SwapProposal {
                    id: Uuid::new_v4(),
                    proposer_id: cmd.proposer_id,
                    receiver_id: cmd.receiver_id,
                    proposed_item_id: cmd.proposed_item_id,
                    receiver_item_id: cmd.receiver_item_id,
                    message,
                    status: SwapStatus::Pending,
                    created_at: now,
                    updated_at: now,
                };
                swap_proposals::ActiveModel::from(&proposal)
                    .insert(db_tx)
                    .await?;

                engine
                    .notify(
                        db_tx,
                        NewNotification::new(
                            proposal.receiver_id,
                            NotificationCategory::Swap,
                            "swap.proposal_received",
                            "New Swap Proposal",
                            format!(
                                "{} wants to swap their \"{}\" for your \"{}\"",
                                proposer.display_name(),
                                proposed_item.title,
                                receiver_item.title
                            ),
                        )
                        .link(format!("/swap/{}", proposal.id)),
                    )
                    .await?;

                tracing::info!(swap_id = %proposal.id, "swap proposed");
                Ok(proposal)
            })
        })
        .await
    }

    pub async fn accept_swap(&self, swap_id: Uuid, actor: Uuid) -> ResultEngine<SwapProposal> {
        self.transition_swap(swap_id, actor, SwapAction::Accept)
            .await
    }

    pub async fn reject_swap(&self, swap_id: Uuid, actor: Uuid) -> ResultEngine<SwapProposal> {
        self.transition_swap(swap_id, actor, SwapAction::Reject)
            .await
    }

    /// Cancel a pending or accepted proposal. Item flags are reverted only
    /// when the proposal had been accepted; any meeting is removed.
    pub async fn cancel_swap(&self, swap_id: Uuid, actor: Uuid) -> ResultEngine<SwapProposal> {
        self.transition_swap(swap_id, actor, SwapAction::Cancel)
            .await
    }

    async fn transition_swap(
        &self,
        swap_id: Uuid,
        actor: Uuid,
        action: SwapAction,
    ) -> ResultEngine<SwapProposal> {
        self.with_tx(|engine, db_tx| {
            Box::pin(async move {
                let (mut proposal, party) =
                    engine.require_swap_party(db_tx, swap_id, actor).await?;
                if !action.permits(party) {
                    return Err(EngineError::Forbidden(format!(
                        "only the receiver can {} a proposal",
                        action.verb()
                    )));
                }
                let previous = proposal.status;
                let next = previous.apply(action)?;
                let now = Utc::now();

                let updated = swap_proposals::Entity::update_many()
                    .col_expr(swap_proposals::Column::Status, Expr::value(next.as_str()))
                    .col_expr(swap_proposals::Column::UpdatedAt, Expr::value(now))
                    .filter(swap_proposals::Column::Id.eq(swap_id.to_string()))
                    .filter(swap_proposals::Column::Status.eq(previous.as_str()))
                    .exec(db_tx)
                    .await?;
                if updated.rows_affected != 1 {
                    return Err(EngineError::InvalidState(
                        "swap proposal was changed concurrently".to_string(),
                    ));
                }

                match action {
                    SwapAction::Accept => mark_items_swapped(db_tx, &proposal).await?,
                    SwapAction::Cancel => {
                        if previous.holds_items() {
                            release_items(db_tx, &proposal).await?;
                        }
                        swap_meetings::Entity::delete_many()
                            .filter(swap_meetings::Column::SwapId.eq(swap_id.to_string()))
                            .exec(db_tx)
                            .await?;
                    }
                    SwapAction::Reject => {}
                }

                proposal.status = next;
                proposal.updated_at = now;

                let actor_user = engine.require_user(db_tx, actor).await?;
                let notification = transition_notification(&proposal, party, action, &actor_user);
                engine.notify(db_tx, notification).await?;

                tracing::info!(%swap_id, status = next.as_str(), "swap proposal transitioned");
                Ok(proposal)
            })
        })
        .await
    }

    /// Full view of a proposal. Only its two parties may read it.
    pub async fn swap_detail(&self, swap_id: Uuid, actor: Uuid) -> ResultEngine<SwapDetail> {
        self.with_tx(|engine, db_tx| {
            Box::pin(async move {
                let (proposal, _) = engine.require_swap_party(db_tx, swap_id, actor).await?;
                let proposer = engine.require_user(db_tx, proposal.proposer_id).await?;
                let receiver = engine.require_user(db_tx, proposal.receiver_id).await?;
                let proposed_item = engine.require_item(db_tx, proposal.proposed_item_id).await?;
                let receiver_item = engine.require_item(db_tx, proposal.receiver_item_id).await?;
                let meeting = swap_meetings::Entity::find()
                    .filter(swap_meetings::Column::SwapId.eq(swap_id.to_string()))
                    .one(db_tx)
                    .await?
                    .map(Meeting::try_from)
                    .transpose()?;
                Ok(SwapDetail {
                    proposal,
                    proposer,
                    receiver,
                    proposed_item,
                    receiver_item,
                    meeting,
                })
            })
        })
        .await
    }

    /// Proposals of a user, newest first.
    pub async fn list_swaps(
        &self,
        user_id: Uuid,
        direction: SwapDirection,
        status: Option<SwapStatus>,
    ) -> ResultEngine<Vec<SwapProposal>> {
        let id = user_id.to_string();
        let side = match direction {
            SwapDirection::Sent => Condition::all().add(swap_proposals::Column::ProposerId.eq(id)),
            SwapDirection::Received => {
                Condition::all().add(swap_proposals::Column::ReceiverId.eq(id))
            }
            SwapDirection::All => Condition::any()
                .add(swap_proposals::Column::ProposerId.eq(id.clone()))
                .add(swap_proposals::Column::ReceiverId.eq(id)),
        };

        let mut select = swap_proposals::Entity::find().filter(side);
        if let Some(status) = status {
            select = select.filter(swap_proposals::Column::Status.eq(status.as_str()));
        }

        select
            .order_by_desc(swap_proposals::Column::CreatedAt)
            .order_by_asc(swap_proposals::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(SwapProposal::try_from)
            .collect()
    }
}

async fn mark_items_swapped(db: &DatabaseTransaction, proposal: &SwapProposal) -> ResultEngine<()> {
    let flipped = items::Entity::update_many()
        .col_expr(items::Column::IsSwapped, Expr::value(true))
        .filter(items::Column::Id.is_in([
            proposal.proposed_item_id.to_string(),
            proposal.receiver_item_id.to_string(),
        ]))
        .filter(items::Column::IsSwapped.eq(false))
        .exec(db)
        .await?;
    if flipped.rows_affected != 2 {
        return Err(EngineError::Unavailable(
            "one of the items has already been swapped".to_string(),
        ));
    }
    Ok(())
}

async fn release_items(db: &DatabaseTransaction, proposal: &SwapProposal) -> ResultEngine<()> {
    items::Entity::update_many()
        .col_expr(items::Column::IsSwapped, Expr::value(false))
        .filter(items::Column::Id.is_in([
            proposal.proposed_item_id.to_string(),
            proposal.receiver_item_id.to_string(),
        ]))
        .exec(db)
        .await?;
    Ok(())
}

fn transition_notification(
    proposal: &SwapProposal,
    actor_party: SwapParty,
    action: SwapAction,
    actor: &User,
) -> NewNotification {
    let recipient = proposal.counterpart(actor_party);
    let (kind, title, body, link) = match action {
        SwapAction::Accept => (
            "swap.proposal_accepted",
            "Swap Proposal Accepted",
            format!("{} accepted your swap proposal", actor.display_name()),
            format!("/swap/{}", proposal.id),
        ),
        SwapAction::Reject => (
            "swap.proposal_rejected",
            "Swap Proposal Rejected",
            format!("{} declined your swap proposal", actor.display_name()),
            "/my-swaps".to_string(),
        ),
        SwapAction::Cancel => (
            "swap.proposal_cancelled",
            "Swap Proposal Cancelled",
            format!("{} cancelled the swap proposal", actor.display_name()),
            "/my-swaps".to_string(),
        ),
    };
    NewNotification::new(recipient, NotificationCategory::Swap, kind, title, body).link(link)
}
