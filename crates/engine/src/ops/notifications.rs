use base64::Engine as _;
use chrono::{DateTime, Utc};
use sea_orm::{Condition, QueryFilter, QueryOrder, QuerySelect, prelude::*, sea_query::Expr};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Notification, ResultEngine, notifications};

use super::Engine;

const DEFAULT_PAGE_SIZE: u64 = 20;
const MAX_PAGE_SIZE: u64 = 100;

/// One page of notifications, newest first. `next_cursor` is set when more
/// rows follow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationPage {
    pub notifications: Vec<Notification>,
    pub next_cursor: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct NotificationsCursor {
    created_at: DateTime<Utc>,
    notification_id: String,
}

impl NotificationsCursor {
    fn encode(&self) -> ResultEngine<String> {
        let bytes = serde_json::to_vec(self)
            .map_err(|_| EngineError::InvalidCursor("cannot encode cursor".to_string()))?;
        Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
    }

    fn decode(input: &str) -> ResultEngine<Self> {
        let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(input.as_bytes())
            .map_err(|_| EngineError::InvalidCursor(input.to_string()))?;
        serde_json::from_slice::<Self>(&bytes)
            .map_err(|_| EngineError::InvalidCursor(input.to_string()))
    }
}

impl Engine {
    pub async fn list_notifications(
        &self,
        user_id: Uuid,
        limit: Option<u64>,
        cursor: Option<&str>,
        unread_only: bool,
    ) -> ResultEngine<NotificationPage> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE);
        if limit == 0 || limit > MAX_PAGE_SIZE {
            return Err(EngineError::Invalid(format!(
                "limit must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }

        let mut query = notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(user_id.to_string()))
            .order_by_desc(notifications::Column::CreatedAt)
            .order_by_desc(notifications::Column::Id)
            .limit(limit.saturating_add(1));
        if unread_only {
            query = query.filter(notifications::Column::IsRead.eq(false));
        }
        if let Some(cursor) = cursor {
            let cursor = NotificationsCursor::decode(cursor)?;
            query = query.filter(
                Condition::any()
                    .add(notifications::Column::CreatedAt.lt(cursor.created_at))
                    .add(
                        Condition::all()
                            .add(notifications::Column::CreatedAt.eq(cursor.created_at))
                            .add(notifications::Column::Id.lt(cursor.notification_id)),
                    ),
            );
        }

        let rows = query.all(&self.database).await?;
        let has_more = rows.len() as u64 > limit;
        let notifications = rows
            .into_iter()
            .take(limit as usize)
            .map(Notification::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        let next_cursor = if has_more {
            notifications
                .last()
                .map(|n| {
                    NotificationsCursor {
                        created_at: n.created_at,
                        notification_id: n.id.to_string(),
                    }
                    .encode()
                })
                .transpose()?
        } else {
            None
        };

        Ok(NotificationPage {
            notifications,
            next_cursor,
        })
    }

    /// Mark one of the user's notifications as read. Someone else's
    /// notification is reported as missing.
    pub async fn mark_notification_read(
        &self,
        notification_id: Uuid,
        user_id: Uuid,
    ) -> ResultEngine<()> {
        let result = notifications::Entity::update_many()
            .col_expr(notifications::Column::IsRead, Expr::value(true))
            .filter(notifications::Column::Id.eq(notification_id.to_string()))
            .filter(notifications::Column::UserId.eq(user_id.to_string()))
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("notification".to_string()));
        }
        Ok(())
    }

    /// Mark every unread notification of the user as read; returns how many
    /// changed.
    pub async fn mark_all_read(&self, user_id: Uuid) -> ResultEngine<u64> {
        let result = notifications::Entity::update_many()
            .col_expr(notifications::Column::IsRead, Expr::value(true))
            .filter(notifications::Column::UserId.eq(user_id.to_string()))
            .filter(notifications::Column::IsRead.eq(false))
            .exec(&self.database)
            .await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn cursor_survives_encoding() {
        let cursor = NotificationsCursor {
            created_at: Utc.with_ymd_and_hms(2026, 5, 4, 10, 30, 0).unwrap(),
            notification_id: Uuid::new_v4().to_string(),
        };
        let encoded = cursor.encode().unwrap();
        assert!(!encoded.contains('='));
        assert_eq!(NotificationsCursor::decode(&encoded).unwrap(), cursor);
    }

    #[test]
    fn garbage_cursor_is_rejected() {
        assert!(matches!(
            NotificationsCursor::decode("not a cursor"),
            Err(EngineError::InvalidCursor(_))
        ));
        let not_json = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(b"[1,2]");
        assert!(matches!(
            NotificationsCursor::decode(&not_json),
            Err(EngineError::InvalidCursor(_))
        ));
    }
}
