use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Item, LoginCmd, ResultEngine, User, items, users,
    util::{looks_like_email, normalize_optional_text, normalize_text},
};

use super::Engine;

const MIN_NAME_CHARS: usize = 2;

/// A user as seen by other users: profile plus the items still available.
#[derive(Clone, Debug, PartialEq)]
pub struct UserProfile {
    pub user: User,
    pub items: Vec<Item>,
}

impl Engine {
    /// Create the local user for an identity-provider subject on first login,
    /// refresh its profile on later logins.
    pub async fn login(&self, cmd: LoginCmd) -> ResultEngine<User> {
        let LoginCmd {
            external_id,
            email,
            name,
            image,
        } = cmd;
        let external_id = normalize_text(&external_id);
        if external_id.is_empty() {
            return Err(EngineError::Invalid(
                "identity subject must not be empty".to_string(),
            ));
        }
        let email = normalize_text(&email).to_lowercase();
        if !looks_like_email(&email) {
            return Err(EngineError::Invalid(format!("invalid email: {email}")));
        }
        let name = normalize_optional_text(name.as_deref());
        if name
            .as_deref()
            .is_some_and(|n| n.chars().count() < MIN_NAME_CHARS)
        {
            return Err(EngineError::Invalid("name is too short".to_string()));
        }
        let image = normalize_optional_text(image.as_deref());

        self.with_tx(|_engine, db_tx| {
            Box::pin(async move {
                let email_owner = users::Entity::find()
                    .filter(users::Column::Email.eq(email.clone()))
                    .one(db_tx)
                    .await?;
                if email_owner.is_some_and(|u| u.external_id != external_id) {
                    return Err(EngineError::ExistingKey("email".to_string()));
                }

                let existing = users::Entity::find()
                    .filter(users::Column::ExternalId.eq(external_id.clone()))
                    .one(db_tx)
                    .await?;

                let model = match existing {
                    Some(model) => {
                        let mut active: users::ActiveModel = model.into();
                        active.email = ActiveValue::Set(email);
                        if name.is_some() {
                            active.name = ActiveValue::Set(name);
                        }
                        if image.is_some() {
                            active.image = ActiveValue::Set(image);
                        }
                        active.update(db_tx).await?
                    }
                    None => {
                        let user = User {
                            id: Uuid::new_v4(),
                            external_id,
                            name,
                            email,
                            image,
                            created_at: Utc::now(),
                        };
                        tracing::info!(user_id = %user.id, "registered new user");
                        users::ActiveModel::from(&user).insert(db_tx).await?
                    }
                };
                User::try_from(model)
            })
        })
        .await
    }

    /// Resolve the local user of an identity-provider subject.
    pub async fn user_by_identity(&self, external_id: &str) -> ResultEngine<Option<User>> {
        users::Entity::find()
            .filter(users::Column::ExternalId.eq(external_id))
            .one(&self.database)
            .await?
            .map(User::try_from)
            .transpose()
    }

    pub async fn user(&self, user_id: Uuid) -> ResultEngine<User> {
        self.with_tx(|engine, db_tx| {
            Box::pin(async move { engine.require_user(db_tx, user_id).await })
        })
        .await
    }

    /// Public profile: the user and their unswapped items, newest first.
    pub async fn public_profile(&self, user_id: Uuid) -> ResultEngine<UserProfile> {
        self.with_tx(|engine, db_tx| {
            Box::pin(async move {
                let user = engine.require_user(db_tx, user_id).await?;
                let items = items::Entity::find()
                    .filter(items::Column::OwnerId.eq(user_id.to_string()))
                    .filter(items::Column::IsSwapped.eq(false))
                    .order_by_desc(items::Column::CreatedAt)
                    .all(db_tx)
                    .await?
                    .into_iter()
                    .map(Item::try_from)
                    .collect::<ResultEngine<Vec<_>>>()?;
                Ok(UserProfile { user, items })
            })
        })
        .await
    }
}
