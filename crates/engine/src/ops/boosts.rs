use chrono::{DateTime, Utc};
use sea_orm::{QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{Boost, EngineError, ResultEngine, boosted_items};

use super::Engine;

impl Engine {
    /// Boost an item for the configured duration. A running boost blocks a
    /// new one; an expired row left by the sweeper is replaced.
    pub async fn boost_item(
        &self,
        item_id: Uuid,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> ResultEngine<Boost> {
        let duration = self.boost_duration;
        self.with_tx(|engine, db_tx| {
            Box::pin(async move {
                let item = engine.require_item_owner(db_tx, item_id, user_id).await?;
                if item.is_swapped {
                    return Err(EngineError::Unavailable(
                        "a swapped item cannot be boosted".to_string(),
                    ));
                }

                if let Some(existing) = boosted_items::Entity::find_by_id(item_id.to_string())
                    .one(db_tx)
                    .await?
                {
                    if existing.expires_at > now {
                        return Err(EngineError::InvalidState(
                            "item is already boosted".to_string(),
                        ));
                    }
                    existing.delete(db_tx).await?;
                }

                let boost = Boost {
                    item_id,
                    user_id,
                    boosted_at: now,
                    expires_at: now + duration,
                };
                boosted_items::ActiveModel::from(&boost)
                    .insert(db_tx)
                    .await?;
                tracing::info!(%item_id, expires_at = %boost.expires_at, "item boosted");
                Ok(boost)
            })
        })
        .await
    }

    /// Delete every boost that expired before `now` and return how many
    /// rows went away.
    pub async fn sweep_expired_boosts(&self, now: DateTime<Utc>) -> ResultEngine<u64> {
        let result = boosted_items::Entity::delete_many()
            .filter(boosted_items::Column::ExpiresAt.lt(now))
            .exec(&self.database)
            .await?;
        if result.rows_affected > 0 {
            tracing::info!(removed = result.rows_affected, "swept expired boosts");
        }
        Ok(result.rows_affected)
    }
}
