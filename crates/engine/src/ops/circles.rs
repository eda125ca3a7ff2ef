use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveValue, Condition, QueryFilter, QueryOrder, QuerySelect, prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    Circle, CircleItem, CircleMember, CircleRole, EngineError, Item, NewCircleCmd,
    NotificationCategory, ResultEngine, circle_items, circle_members, circles, items,
    notifications::NewNotification,
    users,
    util::{normalize_optional_text, normalize_required_text, normalize_text, parse_uuid},
};

use super::Engine;

/// A circle as listed, with its size and the caller's role in it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CircleSummary {
    pub circle: Circle,
    pub member_count: u64,
    pub my_role: Option<CircleRole>,
}

/// Everything a member sees on a circle page. `items` holds unapproved
/// items only when the caller is an admin.
#[derive(Clone, Debug, PartialEq)]
pub struct CircleDetail {
    pub circle: Circle,
    pub members: Vec<CircleMember>,
    pub items: Vec<CircleItem>,
    pub my_role: Option<CircleRole>,
}

impl Engine {
    pub async fn create_circle(&self, cmd: NewCircleCmd) -> ResultEngine<Circle> {
        let name = normalize_required_text(&cmd.name, "circle name", 1)?;
        let circle = Circle {
            id: Uuid::new_v4(),
            name,
            description: normalize_text(&cmd.description),
            image: normalize_optional_text(cmd.image.as_deref()),
            is_private: cmd.is_private,
            created_by: cmd.creator_id,
            created_at: Utc::now(),
        };

        self.with_tx(|engine, db_tx| {
            Box::pin(async move {
                engine.require_user_model(db_tx, circle.created_by).await?;
                circles::ActiveModel::from(&circle).insert(db_tx).await?;
                circle_members::ActiveModel {
                    circle_id: ActiveValue::Set(circle.id.to_string()),
                    user_id: ActiveValue::Set(circle.created_by.to_string()),
                    role: ActiveValue::Set(CircleRole::Admin.as_str().to_string()),
                    joined_at: ActiveValue::Set(circle.created_at),
                }
                .insert(db_tx)
                .await?;
                tracing::info!(circle_id = %circle.id, "circle created");
                Ok(circle)
            })
        })
        .await
    }

    /// Public circles plus the private ones the user belongs to.
    pub async fn list_circles(&self, user_id: Uuid) -> ResultEngine<Vec<CircleSummary>> {
        self.with_tx(|_engine, db_tx| {
            Box::pin(async move {
                let mut roles = HashMap::new();
                for membership in circle_members::Entity::find()
                    .filter(circle_members::Column::UserId.eq(user_id.to_string()))
                    .all(db_tx)
                    .await?
                {
                    let role = membership.role()?;
                    roles.insert(membership.circle_id, role);
                }

                let counts: HashMap<String, i64> = circle_members::Entity::find()
                    .select_only()
                    .column(circle_members::Column::CircleId)
                    .column_as(
                        Expr::col(circle_members::Column::UserId).count(),
                        "member_count",
                    )
                    .group_by(circle_members::Column::CircleId)
                    .into_tuple::<(String, i64)>()
                    .all(db_tx)
                    .await?
                    .into_iter()
                    .collect();

                let visible = circles::Entity::find()
                    .filter(
                        Condition::any()
                            .add(circles::Column::IsPrivate.eq(false))
                            .add(circles::Column::Id.is_in(roles.keys().cloned())),
                    )
                    .order_by_desc(circles::Column::CreatedAt)
                    .all(db_tx)
                    .await?;

                visible
                    .into_iter()
                    .map(|model| -> ResultEngine<CircleSummary> {
                        let member_count = counts
                            .get(&model.id)
                            .and_then(|count| u64::try_from(*count).ok())
                            .unwrap_or_default();
                        let my_role = roles.get(&model.id).copied();
                        Ok(CircleSummary {
                            circle: Circle::try_from(model)?,
                            member_count,
                            my_role,
                        })
                    })
                    .collect()
            })
        })
        .await
    }

    pub async fn circle_detail(
        &self,
        circle_id: Uuid,
        user_id: Uuid,
    ) -> ResultEngine<CircleDetail> {
        self.with_tx(|engine, db_tx| {
            Box::pin(async move {
                let (circle, my_role) = engine
                    .require_circle_visible(db_tx, circle_id, user_id)
                    .await?;
                let id = circle_id.to_string();

                let members = circle_members::Entity::find()
                    .filter(circle_members::Column::CircleId.eq(id.clone()))
                    .find_also_related(users::Entity)
                    .order_by_asc(circle_members::Column::JoinedAt)
                    .all(db_tx)
                    .await?
                    .into_iter()
                    .map(|(member, user)| member.into_member(user))
                    .collect::<ResultEngine<Vec<_>>>()?;

                let mut shared = circle_items::Entity::find()
                    .filter(circle_items::Column::CircleId.eq(id));
                if !my_role.is_some_and(CircleRole::is_admin) {
                    shared = shared.filter(circle_items::Column::IsApproved.eq(true));
                }
                let items = shared
                    .find_also_related(items::Entity)
                    .order_by_desc(circle_items::Column::SharedAt)
                    .all(db_tx)
                    .await?
                    .into_iter()
                    .map(|(shared, item)| {
                        let item =
                            item.ok_or_else(|| EngineError::KeyNotFound("item".to_string()))?;
                        shared.into_circle_item(Item::try_from(item)?)
                    })
                    .collect::<ResultEngine<Vec<_>>>()?;

                Ok(CircleDetail {
                    circle: Circle::try_from(circle)?,
                    members,
                    items,
                    my_role,
                })
            })
        })
        .await
    }

    /// Join a public circle as a plain member.
    pub async fn join_circle(&self, circle_id: Uuid, user_id: Uuid) -> ResultEngine<()> {
        self.with_tx(|engine, db_tx| {
            Box::pin(async move {
                let circle = engine.require_circle_model(db_tx, circle_id).await?;
                let role = engine.circle_role(db_tx, circle_id, user_id).await?;
                if circle.is_private && role.is_none() {
                    return Err(EngineError::Forbidden(
                        "private circles can only be entered when an admin adds you".to_string(),
                    ));
                }
                if role.is_some() {
                    return Err(EngineError::InvalidState(
                        "already a member of this circle".to_string(),
                    ));
                }
                engine.require_user_model(db_tx, user_id).await?;
                circle_members::ActiveModel {
                    circle_id: ActiveValue::Set(circle_id.to_string()),
                    user_id: ActiveValue::Set(user_id.to_string()),
                    role: ActiveValue::Set(CircleRole::Member.as_str().to_string()),
                    joined_at: ActiveValue::Set(Utc::now()),
                }
                .insert(db_tx)
                .await?;
                Ok(())
            })
        })
        .await
    }

    /// Leave a circle. The last admin stays while anyone else remains; the
    /// last member leaving deletes the circle.
    pub async fn leave_circle(&self, circle_id: Uuid, user_id: Uuid) -> ResultEngine<()> {
        self.with_tx(|engine, db_tx| {
            Box::pin(async move {
                let (_, role) = engine
                    .require_circle_member(db_tx, circle_id, user_id)
                    .await?;
                let id = circle_id.to_string();
                let member_count = circle_members::Entity::find()
                    .filter(circle_members::Column::CircleId.eq(id.clone()))
                    .count(db_tx)
                    .await?;

                if role.is_admin() && member_count > 1 {
                    let admins = engine.circle_admin_ids(db_tx, circle_id).await?;
                    if admins.len() == 1 {
                        return Err(EngineError::InvalidState(
                            "the last admin cannot leave while other members remain".to_string(),
                        ));
                    }
                }

                circle_members::Entity::delete_by_id((id.clone(), user_id.to_string()))
                    .exec(db_tx)
                    .await?;

                if member_count == 1 {
                    circle_items::Entity::delete_many()
                        .filter(circle_items::Column::CircleId.eq(id.clone()))
                        .exec(db_tx)
                        .await?;
                    circles::Entity::delete_by_id(id).exec(db_tx).await?;
                    tracing::info!(%circle_id, "deleted empty circle");
                }
                Ok(())
            })
        })
        .await
    }

    /// Add a user to a circle or change their role. Admins only.
    pub async fn add_circle_member(
        &self,
        circle_id: Uuid,
        member_id: Uuid,
        role: CircleRole,
        actor: Uuid,
    ) -> ResultEngine<CircleMember> {
        self.with_tx(|engine, db_tx| {
            Box::pin(async move {
                let circle = engine.require_circle_admin(db_tx, circle_id, actor).await?;
                let user = engine.require_user_model(db_tx, member_id).await?;
                let key = (circle_id.to_string(), member_id.to_string());

                let model = match circle_members::Entity::find_by_id(key).one(db_tx).await? {
                    Some(existing) => {
                        if existing.role == CircleRole::Admin.as_str() && !role.is_admin() {
                            let admins = engine.circle_admin_ids(db_tx, circle_id).await?;
                            if admins.len() <= 1 {
                                return Err(EngineError::InvalidState(
                                    "the last admin cannot be demoted".to_string(),
                                ));
                            }
                        }
                        let mut active: circle_members::ActiveModel = existing.into();
                        active.role = ActiveValue::Set(role.as_str().to_string());
                        active.update(db_tx).await?
                    }
                    None => {
                        let inserted = circle_members::ActiveModel {
                            circle_id: ActiveValue::Set(circle_id.to_string()),
                            user_id: ActiveValue::Set(member_id.to_string()),
                            role: ActiveValue::Set(role.as_str().to_string()),
                            joined_at: ActiveValue::Set(Utc::now()),
                        }
                        .insert(db_tx)
                        .await?;
                        engine
                            .notify(
                                db_tx,
                                NewNotification::new(
                                    member_id,
                                    NotificationCategory::Circle,
                                    "circle.member_added",
                                    "Added to Circle",
                                    format!("You were added to \"{}\"", circle.name),
                                )
                                .link(format!("/circles/{circle_id}")),
                            )
                            .await?;
                        inserted
                    }
                };
                model.into_member(Some(user))
            })
        })
        .await
    }

    /// Share one of your items into a circle you belong to. Items shared by
    /// an admin are approved right away; otherwise the admins are notified.
    pub async fn share_item(
        &self,
        circle_id: Uuid,
        item_id: Uuid,
        user_id: Uuid,
    ) -> ResultEngine<CircleItem> {
        self.with_tx(|engine, db_tx| {
            Box::pin(async move {
                let (circle, role) = engine
                    .require_circle_member(db_tx, circle_id, user_id)
                    .await?;
                let item = engine.require_item_owner(db_tx, item_id, user_id).await?;

                let key = (circle_id.to_string(), item_id.to_string());
                if circle_items::Entity::find_by_id(key)
                    .one(db_tx)
                    .await?
                    .is_some()
                {
                    return Err(EngineError::ExistingKey("circle item".to_string()));
                }

                let is_approved = role.is_admin();
                let model = circle_items::ActiveModel {
                    circle_id: ActiveValue::Set(circle_id.to_string()),
                    item_id: ActiveValue::Set(item_id.to_string()),
                    shared_by: ActiveValue::Set(user_id.to_string()),
                    is_approved: ActiveValue::Set(is_approved),
                    shared_at: ActiveValue::Set(Utc::now()),
                }
                .insert(db_tx)
                .await?;

                if !is_approved {
                    for admin in engine.circle_admin_ids(db_tx, circle_id).await? {
                        engine
                            .notify(
                                db_tx,
                                NewNotification::new(
                                    admin,
                                    NotificationCategory::Circle,
                                    "circle.item_pending",
                                    "Item Awaiting Approval",
                                    format!(
                                        "\"{}\" was shared in \"{}\" and needs approval",
                                        item.title, circle.name
                                    ),
                                )
                                .link(format!("/circles/{circle_id}")),
                            )
                            .await?;
                    }
                }

                model.into_circle_item(item)
            })
        })
        .await
    }

    pub async fn approve_item(
        &self,
        circle_id: Uuid,
        item_id: Uuid,
        actor: Uuid,
    ) -> ResultEngine<CircleItem> {
        self.with_tx(|engine, db_tx| {
            Box::pin(async move {
                let circle = engine.require_circle_admin(db_tx, circle_id, actor).await?;
                let shared = circle_items::Entity::find_by_id((
                    circle_id.to_string(),
                    item_id.to_string(),
                ))
                .one(db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("circle item".to_string()))?;
                if shared.is_approved {
                    return Err(EngineError::InvalidState(
                        "item is already approved".to_string(),
                    ));
                }
                let sharer = parse_uuid(&shared.shared_by, "user")?;
                let item = engine.require_item(db_tx, item_id).await?;

                let mut active: circle_items::ActiveModel = shared.into();
                active.is_approved = ActiveValue::Set(true);
                let model = active.update(db_tx).await?;

                if sharer != actor {
                    engine
                        .notify(
                            db_tx,
                            NewNotification::new(
                                sharer,
                                NotificationCategory::Circle,
                                "circle.item_approved",
                                "Item Approved",
                                format!(
                                    "\"{}\" is now visible in \"{}\"",
                                    item.title, circle.name
                                ),
                            )
                            .link(format!("/circles/{circle_id}")),
                        )
                        .await?;
                }

                model.into_circle_item(item)
            })
        })
        .await
    }

    /// Remove an item from a circle. Allowed for whoever shared it and for
    /// admins.
    pub async fn unshare_item(
        &self,
        circle_id: Uuid,
        item_id: Uuid,
        actor: Uuid,
    ) -> ResultEngine<()> {
        self.with_tx(|engine, db_tx| {
            Box::pin(async move {
                let (_, role) = engine
                    .require_circle_member(db_tx, circle_id, actor)
                    .await?;
                let shared = circle_items::Entity::find_by_id((
                    circle_id.to_string(),
                    item_id.to_string(),
                ))
                .one(db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("circle item".to_string()))?;
                if shared.shared_by != actor.to_string() && !role.is_admin() {
                    return Err(EngineError::Forbidden(
                        "only the sharer or an admin can remove this item".to_string(),
                    ));
                }
                shared.delete(db_tx).await?;
                Ok(())
            })
        })
        .await
    }
}
