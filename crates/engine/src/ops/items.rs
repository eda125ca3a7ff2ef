use chrono::{DateTime, Utc};
use sea_orm::{Condition, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    Boost, EngineError, Item, NewItemCmd, ResultEngine, User, boosted_items, item_score, items,
    swap_proposals, SwapStatus,
    util::{normalize_optional_text, normalize_required_text, normalize_text},
};

use super::Engine;

const MIN_TITLE_CHARS: usize = 5;
const MIN_DESCRIPTION_CHARS: usize = 5;

/// An item with its owner and its boost, if any.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemDetail {
    pub item: Item,
    pub owner: User,
    pub boost: Option<Boost>,
}

impl ItemDetail {
    pub fn is_boosted(&self, now: DateTime<Utc>) -> bool {
        self.boost.as_ref().is_some_and(|b| b.is_active(now))
    }
}

fn validate_price(value: f64, label: &str) -> ResultEngine<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(EngineError::Invalid(format!(
            "{label} must be a valid non-negative number"
        )));
    }
    Ok(value)
}

fn normalize_category(value: &str) -> ResultEngine<String> {
    let category = normalize_text(value).to_uppercase();
    if category.is_empty() {
        return Err(EngineError::Invalid("category must not be empty".to_string()));
    }
    Ok(category)
}

impl Engine {
    /// List a new item for `cmd.owner_id`. The score is computed here and
    /// never supplied by the client.
    pub async fn add_item(&self, cmd: NewItemCmd) -> ResultEngine<Item> {
        let title = normalize_required_text(&cmd.title, "title", MIN_TITLE_CHARS)?;
        let description =
            normalize_required_text(&cmd.description, "description", MIN_DESCRIPTION_CHARS)?;
        let current_price = validate_price(cmd.current_price, "current price")?;
        let original_price = validate_price(cmd.original_price, "original price")?;
        if cmd.item_age < 0 {
            return Err(EngineError::Invalid(
                "item age must not be negative".to_string(),
            ));
        }
        let category = normalize_category(&cmd.category)?;
        let currency = normalize_text(&cmd.currency).to_uppercase();
        if currency.is_empty() {
            return Err(EngineError::Invalid("currency must not be empty".to_string()));
        }

        let item = Item {
            id: Uuid::new_v4(),
            owner_id: cmd.owner_id,
            title,
            description,
            image: normalize_optional_text(cmd.image.as_deref()),
            current_price,
            original_price,
            currency,
            company: normalize_text(&cmd.company),
            category,
            condition: cmd.condition,
            has_bill: cmd.has_bill,
            item_age: cmd.item_age,
            score: item_score(cmd.condition, cmd.item_age, cmd.has_bill),
            is_swapped: false,
            created_at: Utc::now(),
        };

        self.with_tx(|engine, db_tx| {
            Box::pin(async move {
                engine.require_user_model(db_tx, item.owner_id).await?;
                items::ActiveModel::from(&item).insert(db_tx).await?;
                Ok(item)
            })
        })
        .await
    }

    pub async fn item_detail(&self, item_id: Uuid) -> ResultEngine<ItemDetail> {
        self.with_tx(|engine, db_tx| {
            Box::pin(async move {
                let item = engine.require_item(db_tx, item_id).await?;
                let owner = engine.require_user(db_tx, item.owner_id).await?;
                let boost = boosted_items::Entity::find_by_id(item_id.to_string())
                    .one(db_tx)
                    .await?
                    .map(Boost::try_from)
                    .transpose()?;
                Ok(ItemDetail { item, owner, boost })
            })
        })
        .await
    }

    /// All items of a user, swapped ones included, newest first.
    pub async fn list_user_items(&self, user_id: Uuid) -> ResultEngine<Vec<Item>> {
        items::Entity::find()
            .filter(items::Column::OwnerId.eq(user_id.to_string()))
            .order_by_desc(items::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Item::try_from)
            .collect()
    }

    /// Delete an item. Refused while the item is swapped or part of a
    /// pending/accepted proposal.
    pub async fn delete_item(&self, item_id: Uuid, user_id: Uuid) -> ResultEngine<()> {
        self.with_tx(|engine, db_tx| {
            Box::pin(async move {
                let item = engine.require_item_owner(db_tx, item_id, user_id).await?;
                if item.is_swapped {
                    return Err(EngineError::Unavailable(
                        "a swapped item cannot be deleted".to_string(),
                    ));
                }

                let id = item_id.to_string();
                let live = swap_proposals::Entity::find()
                    .filter(
                        Condition::any()
                            .add(swap_proposals::Column::ProposedItemId.eq(id.clone()))
                            .add(swap_proposals::Column::ReceiverItemId.eq(id.clone())),
                    )
                    .filter(swap_proposals::Column::Status.is_in([
                        SwapStatus::Pending.as_str(),
                        SwapStatus::Accepted.as_str(),
                    ]))
                    .count(db_tx)
                    .await?;
                if live > 0 {
                    return Err(EngineError::InvalidState(
                        "item is part of an open swap proposal".to_string(),
                    ));
                }

                items::Entity::delete_by_id(id).exec(db_tx).await?;
                Ok(())
            })
        })
        .await
    }
}
