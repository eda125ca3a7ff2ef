//! Command structs for engine operations.
//!
//! These types group parameters for write operations (listing an item,
//! proposing a swap, scheduling a meeting, ...), keeping call sites readable
//! and avoiding long argument lists.

use uuid::Uuid;

use crate::ItemCondition;

/// Login (or first-time registration) of an identity-provider subject.
#[derive(Clone, Debug)]
pub struct LoginCmd {
    pub external_id: String,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
}

impl LoginCmd {
    #[must_use]
    pub fn new(external_id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            email: email.into(),
            name: None,
            image: None,
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// List a new item.
#[derive(Clone, Debug)]
pub struct NewItemCmd {
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
}

impl NewItemCmd {
    #[must_use]
    pub fn new(
        owner_id: Uuid,
        title: impl Into<String>,
        description: impl Into<String>,
        condition: ItemCondition,
    ) -> Self {
        Self {
            owner_id,
            title: title.into(),
            description: description.into(),
            image: None,
            current_price: 0.0,
            original_price: 0.0,
            currency: "INR".to_string(),
            company: String::new(),
            category: "OTHER".to_string(),
            condition,
            has_bill: false,
            item_age: 0,
        }
    }

    #[must_use]
    pub fn prices(mut self, current: f64, original: f64) -> Self {
        self.current_price = current;
        self.original_price = original;
        self
    }

    #[must_use]
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    #[must_use]
    pub fn company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    #[must_use]
    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    #[must_use]
    pub fn has_bill(mut self, has_bill: bool) -> Self {
        self.has_bill = has_bill;
        self
    }

    #[must_use]
    pub fn item_age(mut self, months: i32) -> Self {
        self.item_age = months;
        self
    }
}

/// Offer `proposed_item_id` (owned by the proposer) for `receiver_item_id`
/// (owned by the receiver).
#[derive(Clone, Debug)]
pub struct ProposeSwapCmd {
    pub proposer_id: Uuid,
    pub receiver_id: Uuid,
    pub proposed_item_id: Uuid,
    pub receiver_item_id: Uuid,
    pub message: Option<String>,
}

impl ProposeSwapCmd {
    #[must_use]
    pub fn new(
        proposer_id: Uuid,
        receiver_id: Uuid,
        proposed_item_id: Uuid,
        receiver_item_id: Uuid,
    ) -> Self {
        Self {
            proposer_id,
            receiver_id,
            proposed_item_id,
            receiver_item_id,
            message: None,
        }
    }

    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Schedule (or reschedule) the in-person meeting of a swap.
#[derive(Clone, Debug)]
pub struct ScheduleMeetingCmd {
    pub swap_id: Uuid,
    pub user_id: Uuid,
    pub location: String,
    pub date: String,
    pub time: String,
    pub notes: Option<String>,
}

impl ScheduleMeetingCmd {
    #[must_use]
    pub fn new(
        swap_id: Uuid,
        user_id: Uuid,
        location: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            swap_id,
            user_id,
            location: location.into(),
            date: date.into(),
            time: time.into(),
            notes: None,
        }
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Create a circle; the creator becomes its first admin.
#[derive(Clone, Debug)]
pub struct NewCircleCmd {
    pub creator_id: Uuid,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub is_private: bool,
}

impl NewCircleCmd {
    #[must_use]
    pub fn new(creator_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            creator_id,
            name: name.into(),
            description: String::new(),
            image: None,
            is_private: false,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    #[must_use]
    pub fn private(mut self, is_private: bool) -> Self {
        self.is_private = is_private;
        self
    }
}
