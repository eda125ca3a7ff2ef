//! Domain engine of the swap marketplace.
//!
//! The [`Engine`] is stateless apart from its database connection: every
//! operation opens one database transaction, checks ownership/role guards,
//! mutates rows and records the notifications it owes, then commits.

pub use boosted_items::Boost;
pub use circle_items::CircleItem;
pub use circle_members::{CircleMember, CircleRole};
pub use circles::Circle;
pub use commands::{LoginCmd, NewCircleCmd, NewItemCmd, ProposeSwapCmd, ScheduleMeetingCmd};
pub use error::EngineError;
pub use items::{Item, ItemCondition};
pub use notifications::{Notification, NotificationCategory};
pub use ops::{
    BrowseFilter, BrowsedItem, CircleDetail, CircleSummary, Engine, EngineBuilder, ItemDetail,
    NotificationPage, SwapDetail, SwapDirection, UserProfile,
};
pub use score::item_score;
pub use swap_meetings::{Meeting, MeetingStatus};
pub use swap_proposals::{SwapAction, SwapParty, SwapProposal, SwapStatus};
pub use users::User;

mod boosted_items;
mod circle_items;
mod circle_members;
mod circles;
mod commands;
mod error;
mod items;
mod notifications;
mod ops;
mod score;
mod swap_meetings;
mod swap_proposals;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
