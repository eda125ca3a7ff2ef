use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod user {
    use super::*;

    /// Profile fields sent on login. The identity itself comes from the
    /// bearer token.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Login {
        pub email: String,
        pub name: Option<String>,
        pub image: Option<String>,
    }

    /// The caller's own account.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: Uuid,
        pub name: Option<String>,
        pub email: String,
        pub image: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    /// What other users may see of an account.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PublicUserView {
        pub id: Uuid,
        pub name: Option<String>,
        pub image: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProfileResponse {
        pub user: PublicUserView,
        pub items: Vec<super::item::ItemView>,
    }
}

pub mod item {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum ItemCondition {
        New,
        LikeNew,
        Good,
        Fair,
        Poor,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemNew {
        pub title: String,
        pub description: String,
        /// URL of an image already uploaded to the asset host.
        pub image: Option<String>,
        pub current_price: f64,
        pub original_price: f64,
        /// ISO currency code, `INR` when absent.
        pub currency: Option<String>,
        pub company: Option<String>,
        pub category: Option<String>,
        pub condition: ItemCondition,
        #[serde(default)]
        pub has_bill: bool,
        /// Age in months.
        #[serde(default)]
        pub item_age: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemView {
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
        pub item_age: i32,
        pub score: f64,
        pub is_swapped: bool,
        pub created_at: DateTime<Utc>,
    }

    /// Query string of `GET /api/items`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct BrowseQuery {
        pub query: Option<String>,
        pub category: Option<String>,
        pub from_price: Option<f64>,
        pub to_price: Option<f64>,
        pub max_score: Option<f64>,
        pub condition: Option<ItemCondition>,
        pub include_swapped: Option<bool>,
        pub limit: Option<u64>,
        pub offset: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BrowsedItemView {
        #[serde(flatten)]
        pub item: ItemView,
        pub boosted: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BrowseResponse {
        pub items: Vec<BrowsedItemView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemsResponse {
        pub items: Vec<ItemView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemDetailResponse {
        pub item: ItemView,
        pub owner: super::user::PublicUserView,
        pub boosted: bool,
        /// Set while the boost is running.
        pub boost_expires_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BoostView {
        pub item_id: Uuid,
        pub boosted_at: DateTime<Utc>,
        pub expires_at: DateTime<Utc>,
    }
}

pub mod swap {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum SwapStatus {
        Pending,
        Accepted,
        Rejected,
        Cancelled,
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SwapDirection {
        Sent,
        Received,
        #[default]
        All,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SwapNew {
        pub receiver_id: Uuid,
        /// The caller's item being offered.
        pub proposed_item_id: Uuid,
        /// The receiver's item being asked for.
        pub receiver_item_id: Uuid,
        pub message: Option<String>,
    }

    /// Query string of `GET /api/swaps`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SwapListQuery {
        pub direction: Option<SwapDirection>,
        pub status: Option<SwapStatus>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SwapView {
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

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SwapsResponse {
        pub swaps: Vec<SwapView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SwapDetailResponse {
        pub swap: SwapView,
        pub proposer: super::user::PublicUserView,
        pub receiver: super::user::PublicUserView,
        pub proposed_item: super::item::ItemView,
        pub receiver_item: super::item::ItemView,
        pub meeting: Option<super::meeting::MeetingView>,
    }
}

pub mod meeting {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum MeetingStatus {
        Scheduled,
        Rescheduled,
        Cancelled,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MeetingSchedule {
        pub location: String,
        /// `YYYY-MM-DD`
        pub date: String,
        /// `HH:MM` or `HH:MM:SS`
        pub time: String,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MeetingView {
        pub id: Uuid,
        pub swap_id: Uuid,
        pub location: String,
        pub date: String,
        pub time: String,
        pub notes: Option<String>,
        pub status: MeetingStatus,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MeetingResponse {
        pub meeting: Option<MeetingView>,
    }
}

pub mod circle {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum CircleRole {
        Member,
        Admin,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CircleNew {
        pub name: String,
        pub description: Option<String>,
        pub image: Option<String>,
        #[serde(default)]
        pub is_private: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CircleView {
        pub id: Uuid,
        pub name: String,
        pub description: String,
        pub image: Option<String>,
        pub is_private: bool,
        pub created_by: Uuid,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CircleSummaryView {
        #[serde(flatten)]
        pub circle: CircleView,
        pub member_count: u64,
        pub my_role: Option<CircleRole>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CirclesResponse {
        pub circles: Vec<CircleSummaryView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CircleMemberView {
        pub user_id: Uuid,
        pub name: Option<String>,
        pub image: Option<String>,
        pub role: CircleRole,
        pub joined_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CircleItemView {
        pub item: super::item::ItemView,
        pub shared_by: Uuid,
        pub is_approved: bool,
        pub shared_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CircleDetailResponse {
        pub circle: CircleView,
        pub members: Vec<CircleMemberView>,
        pub items: Vec<CircleItemView>,
        pub my_role: Option<CircleRole>,
    }

    /// Request body for adding a member or changing their role.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberAdd {
        pub user_id: Uuid,
        /// `MEMBER` when absent.
        pub role: Option<CircleRole>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemShare {
        pub item_id: Uuid,
    }
}

pub mod notification {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum NotificationCategory {
        Swap,
        Meeting,
        Circle,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct NotificationListQuery {
        pub limit: Option<u64>,
        /// Opaque pagination cursor (base64), from `next_cursor`.
        pub cursor: Option<String>,
        pub unread_only: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct NotificationView {
        pub id: Uuid,
        pub title: String,
        pub body: String,
        /// Dotted event name, e.g. `swap.proposal_received`.
        #[serde(rename = "type")]
        pub kind: String,
        pub category: NotificationCategory,
        pub link: Option<String>,
        pub is_read: bool,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct NotificationListResponse {
        pub notifications: Vec<NotificationView>,
        /// Opaque cursor for fetching the next page (older items).
        pub next_cursor: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MarkedRead {
        pub updated: u64,
    }
}
