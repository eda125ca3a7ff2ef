//! Engine types rendered as wire types.

use api_types::{
    circle::{CircleMemberView, CircleRole as ApiCircleRole, CircleItemView, CircleView},
    item::{ItemCondition as ApiItemCondition, ItemView},
    meeting::{MeetingStatus as ApiMeetingStatus, MeetingView},
    notification::{NotificationCategory as ApiNotificationCategory, NotificationView},
    swap::{SwapDirection as ApiSwapDirection, SwapStatus as ApiSwapStatus, SwapView},
    user::{PublicUserView, UserView},
};
use engine::{
    Circle, CircleItem, CircleMember, CircleRole, Item, ItemCondition, Meeting, MeetingStatus,
    Notification, NotificationCategory, SwapDirection, SwapProposal, SwapStatus, User,
};

pub fn user(user: User) -> UserView {
    UserView {
        id: user.id,
        name: user.name,
        email: user.email,
        image: user.image,
        created_at: user.created_at,
    }
}

pub fn public_user(user: User) -> PublicUserView {
    PublicUserView {
        id: user.id,
        name: user.name,
        image: user.image,
    }
}

pub fn condition(condition: ItemCondition) -> ApiItemCondition {
    match condition {
        ItemCondition::New => ApiItemCondition::New,
        ItemCondition::LikeNew => ApiItemCondition::LikeNew,
        ItemCondition::Good => ApiItemCondition::Good,
        ItemCondition::Fair => ApiItemCondition::Fair,
        ItemCondition::Poor => ApiItemCondition::Poor,
    }
}

pub fn condition_from_api(condition: ApiItemCondition) -> ItemCondition {
    match condition {
        ApiItemCondition::New => ItemCondition::New,
        ApiItemCondition::LikeNew => ItemCondition::LikeNew,
        ApiItemCondition::Good => ItemCondition::Good,
        ApiItemCondition::Fair => ItemCondition::Fair,
        ApiItemCondition::Poor => ItemCondition::Poor,
    }
}

pub fn item(item: Item) -> ItemView {
    ItemView {
        id: item.id,
        owner_id: item.owner_id,
        title: item.title,
        description: item.description,
        image: item.image,
        current_price: item.current_price,
        original_price: item.original_price,
        currency: item.currency,
        company: item.company,
        category: item.category,
        condition: condition(item.condition),
        has_bill: item.has_bill,
        item_age: item.item_age,
        score: item.score,
        is_swapped: item.is_swapped,
        created_at: item.created_at,
    }
}

pub fn swap_status(status: SwapStatus) -> ApiSwapStatus {
    match status {
        SwapStatus::Pending => ApiSwapStatus::Pending,
        SwapStatus::Accepted => ApiSwapStatus::Accepted,
        SwapStatus::Rejected => ApiSwapStatus::Rejected,
        SwapStatus::Cancelled => ApiSwapStatus::Cancelled,
    }
}

pub fn swap_status_from_api(status: ApiSwapStatus) -> SwapStatus {
    match status {
        ApiSwapStatus::Pending => SwapStatus::Pending,
        ApiSwapStatus::Accepted => SwapStatus::Accepted,
        ApiSwapStatus::Rejected => SwapStatus::Rejected,
        ApiSwapStatus::Cancelled => SwapStatus::Cancelled,
    }
}

pub fn swap_direction_from_api(direction: ApiSwapDirection) -> SwapDirection {
    match direction {
        ApiSwapDirection::Sent => SwapDirection::Sent,
        ApiSwapDirection::Received => SwapDirection::Received,
        ApiSwapDirection::All => SwapDirection::All,
    }
}

pub fn swap(proposal: SwapProposal) -> SwapView {
    SwapView {
        id: proposal.id,
        proposer_id: proposal.proposer_id,
        receiver_id: proposal.receiver_id,
        proposed_item_id: proposal.proposed_item_id,
        receiver_item_id: proposal.receiver_item_id,
        message: proposal.message,
        status: swap_status(proposal.status),
        created_at: proposal.created_at,
        updated_at: proposal.updated_at,
    }
}

pub fn meeting(meeting: Meeting) -> MeetingView {
    MeetingView {
        id: meeting.id,
        swap_id: meeting.swap_id,
        location: meeting.location,
        date: meeting.date,
        time: meeting.time,
        notes: meeting.notes,
        status: match meeting.status {
            MeetingStatus::Scheduled => ApiMeetingStatus::Scheduled,
            MeetingStatus::Rescheduled => ApiMeetingStatus::Rescheduled,
            MeetingStatus::Cancelled => ApiMeetingStatus::Cancelled,
        },
        created_at: meeting.created_at,
        updated_at: meeting.updated_at,
    }
}

pub fn circle_role(role: CircleRole) -> ApiCircleRole {
    match role {
        CircleRole::Member => ApiCircleRole::Member,
        CircleRole::Admin => ApiCircleRole::Admin,
    }
}

pub fn circle_role_from_api(role: ApiCircleRole) -> CircleRole {
    match role {
        ApiCircleRole::Member => CircleRole::Member,
        ApiCircleRole::Admin => CircleRole::Admin,
    }
}

pub fn circle(circle: Circle) -> CircleView {
    CircleView {
        id: circle.id,
        name: circle.name,
        description: circle.description,
        image: circle.image,
        is_private: circle.is_private,
        created_by: circle.created_by,
        created_at: circle.created_at,
    }
}

pub fn circle_member(member: CircleMember) -> CircleMemberView {
    CircleMemberView {
        user_id: member.user_id,
        name: member.name,
        image: member.image,
        role: circle_role(member.role),
        joined_at: member.joined_at,
    }
}

pub fn circle_item(shared: CircleItem) -> CircleItemView {
    CircleItemView {
        item: item(shared.item),
        shared_by: shared.shared_by,
        is_approved: shared.is_approved,
        shared_at: shared.shared_at,
    }
}

pub fn notification(notification: Notification) -> NotificationView {
    NotificationView {
        id: notification.id,
        title: notification.title,
        body: notification.body,
        kind: notification.kind,
        category: match notification.category {
            NotificationCategory::Swap => ApiNotificationCategory::Swap,
            NotificationCategory::Meeting => ApiNotificationCategory::Meeting,
            NotificationCategory::Circle => ApiNotificationCategory::Circle,
        },
        link: notification.link,
        is_read: notification.is_read,
        created_at: notification.created_at,
    }
}
