//! Swap proposals and their lifecycle.
//!
//! ```text
//! (none) --propose--> PENDING --accept--> ACCEPTED
//!                        |  \--reject--> REJECTED
//!                        |
//!                        +--cancel--> CANCELLED <--cancel-- ACCEPTED
//! ```
//!
//! The table lives in [`SwapStatus::apply`]; who may fire an action lives in
//! [`SwapAction::permits`]. Both are pure so the engine only has to persist
//! the result.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwapStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
}

impl SwapStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Next status after `action`, or `InvalidState` if the transition is not
    /// in the table.
    pub fn apply(self, action: SwapAction) -> ResultEngine<SwapStatus> {
        match (self, action) {
            (Self::Pending, SwapAction::Accept) => Ok(Self::Accepted),
            (Self::Pending, SwapAction::Reject) => Ok(Self::Rejected),
            (Self::Pending | Self::Accepted, SwapAction::Cancel) => Ok(Self::Cancelled),
            _ => Err(EngineError::InvalidState(format!(
                "cannot {} a proposal that is {}",
                action.verb(),
                self.as_str().to_ascii_lowercase()
            ))),
        }
    }

    /// Whether the proposal currently holds both items as swapped.
    pub fn holds_items(self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Whether the proposal still involves its items (open or completed).
    pub fn is_live(self) -> bool {
        matches!(self, Self::Pending | Self::Accepted)
    }
}

impl TryFrom<&str> for SwapStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "ACCEPTED" => Ok(Self::Accepted),
            "REJECTED" => Ok(Self::Rejected),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(EngineError::Invalid(format!("invalid swap status: {value}"))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapAction {
    Accept,
    Reject,
    Cancel,
}

impl SwapAction {
    pub fn verb(self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::Cancel => "cancel",
        }
    }

    pub fn permits(self, party: SwapParty) -> bool {
        match self {
            Self::Accept | Self::Reject => party == SwapParty::Receiver,
            Self::Cancel => true,
        }
    }
}

/// The side of a proposal a user is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapParty {
    Proposer,
    Receiver,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapProposal {
    pub id: Uuid,
    pub proposer_id: Uuid,
    pub receiver_id: Uuid,
    pub proposed_item_id: Uuid,
    pub receiver_item_id: Uuid,
    pub message: Option<String>,
    pub status: SwapStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SwapProposal {
    pub fn party_of(&self, user_id: Uuid) -> Option<SwapParty> {
        if user_id == self.proposer_id {
            Some(SwapParty::Proposer)
        } else if user_id == self.receiver_id {
            Some(SwapParty::Receiver)
        } else {
            None
        }
    }

    /// The user on the other side of `party`.
    pub fn counterpart(&self, party: SwapParty) -> Uuid {
        match party {
            SwapParty::Proposer => self.receiver_id,
            SwapParty::Receiver => self.proposer_id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "swap_proposals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub proposer_id: String,
    pub receiver_id: String,
    pub proposed_item_id: String,
    pub receiver_item_id: String,
    pub message: Option<String>,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::swap_meetings::Entity")]
    Meeting,
}

impl Related<super::swap_meetings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Meeting.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&SwapProposal> for ActiveModel {
    fn from(proposal: &SwapProposal) -> Self {
        Self {
            id: ActiveValue::Set(proposal.id.to_string()),
            proposer_id: ActiveValue::Set(proposal.proposer_id.to_string()),
            receiver_id: ActiveValue::Set(proposal.receiver_id.to_string()),
            proposed_item_id: ActiveValue::Set(proposal.proposed_item_id.to_string()),
            receiver_item_id: ActiveValue::Set(proposal.receiver_item_id.to_string()),
            message: ActiveValue::Set(proposal.message.clone()),
            status: ActiveValue::Set(proposal.status.as_str().to_string()),
            created_at: ActiveValue::Set(proposal.created_at),
            updated_at: ActiveValue::Set(proposal.updated_at),
        }
    }
}

impl TryFrom<Model> for SwapProposal {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "swap proposal")?,
            proposer_id: parse_uuid(&model.proposer_id, "user")?,
            receiver_id: parse_uuid(&model.receiver_id, "user")?,
            proposed_item_id: parse_uuid(&model.proposed_item_id, "item")?,
            receiver_item_id: parse_uuid(&model.receiver_item_id, "item")?,
            message: model.message,
            status: SwapStatus::try_from(model.status.as_str())?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_transitions() {
        assert_eq!(
            SwapStatus::Pending.apply(SwapAction::Accept),
            Ok(SwapStatus::Accepted)
        );
        assert_eq!(
            SwapStatus::Pending.apply(SwapAction::Reject),
            Ok(SwapStatus::Rejected)
        );
        assert_eq!(
            SwapStatus::Pending.apply(SwapAction::Cancel),
            Ok(SwapStatus::Cancelled)
        );
    }

    #[test]
    fn accepted_can_only_be_cancelled() {
        assert_eq!(
            SwapStatus::Accepted.apply(SwapAction::Cancel),
            Ok(SwapStatus::Cancelled)
        );
        assert_eq!(
            SwapStatus::Accepted.apply(SwapAction::Accept),
            Err(EngineError::InvalidState(
                "cannot accept a proposal that is accepted".to_string()
            ))
        );
        assert!(SwapStatus::Accepted.apply(SwapAction::Reject).is_err());
    }

    #[test]
    fn terminal_states_reject_everything() {
        for status in [SwapStatus::Rejected, SwapStatus::Cancelled] {
            for action in [SwapAction::Accept, SwapAction::Reject, SwapAction::Cancel] {
                assert!(status.apply(action).is_err(), "{status:?} {action:?}");
            }
        }
    }

    #[test]
    fn cancelled_message_names_status() {
        assert_eq!(
            SwapStatus::Rejected.apply(SwapAction::Cancel),
            Err(EngineError::InvalidState(
                "cannot cancel a proposal that is rejected".to_string()
            ))
        );
    }

    #[test]
    fn only_receiver_decides() {
        assert!(SwapAction::Accept.permits(SwapParty::Receiver));
        assert!(!SwapAction::Accept.permits(SwapParty::Proposer));
        assert!(SwapAction::Reject.permits(SwapParty::Receiver));
        assert!(!SwapAction::Reject.permits(SwapParty::Proposer));
        assert!(SwapAction::Cancel.permits(SwapParty::Proposer));
        assert!(SwapAction::Cancel.permits(SwapParty::Receiver));
    }

    #[test]
    fn only_accepted_holds_items() {
        assert!(SwapStatus::Accepted.holds_items());
        assert!(!SwapStatus::Pending.holds_items());
        assert!(SwapStatus::Pending.is_live());
        assert!(!SwapStatus::Cancelled.is_live());
    }
}
