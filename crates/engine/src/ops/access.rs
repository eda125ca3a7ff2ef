use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{
    CircleRole, EngineError, Item, ResultEngine, SwapParty, SwapProposal, User, circle_members,
    circles, items, notifications::NewNotification, swap_proposals, users, util::parse_uuid,
};

use super::Engine;

/// Generates a `require_*` lookup that maps a missing row to `KeyNotFound`.
macro_rules! impl_require_by_id {
    ($require_fn:ident, $entity:path, $model:ty, $label:literal) => {
        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            id: Uuid,
        ) -> ResultEngine<$model> {
            <$entity>::find_by_id(id.to_string())
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound($label.to_string()))
        }
    };
}

impl Engine {
    impl_require_by_id!(require_user_model, users::Entity, users::Model, "user");
    impl_require_by_id!(require_item_model, items::Entity, items::Model, "item");
    impl_require_by_id!(
        require_swap_model,
        swap_proposals::Entity,
        swap_proposals::Model,
        "swap proposal"
    );
    impl_require_by_id!(require_circle_model, circles::Entity, circles::Model, "circle");

    pub(super) async fn require_user(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
    ) -> ResultEngine<User> {
        User::try_from(self.require_user_model(db, user_id).await?)
    }

    pub(super) async fn require_item(
        &self,
        db: &DatabaseTransaction,
        item_id: Uuid,
    ) -> ResultEngine<Item> {
        Item::try_from(self.require_item_model(db, item_id).await?)
    }

    /// Item owned by `user_id`; someone else's item is `Forbidden`.
    pub(super) async fn require_item_owner(
        &self,
        db: &DatabaseTransaction,
        item_id: Uuid,
        user_id: Uuid,
    ) -> ResultEngine<Item> {
        let item = self.require_item(db, item_id).await?;
        if item.owner_id != user_id {
            return Err(EngineError::Forbidden(
                "only the item owner can do this".to_string(),
            ));
        }
        Ok(item)
    }

    pub(super) async fn require_swap(
        &self,
        db: &DatabaseTransaction,
        swap_id: Uuid,
    ) -> ResultEngine<SwapProposal> {
        SwapProposal::try_from(self.require_swap_model(db, swap_id).await?)
    }

    /// Proposal plus the side `user_id` is on; outsiders are `Forbidden`.
    pub(super) async fn require_swap_party(
        &self,
        db: &DatabaseTransaction,
        swap_id: Uuid,
        user_id: Uuid,
    ) -> ResultEngine<(SwapProposal, SwapParty)> {
        let proposal = self.require_swap(db, swap_id).await?;
        let party = proposal.party_of(user_id).ok_or_else(|| {
            EngineError::Forbidden("not a party of this swap proposal".to_string())
        })?;
        Ok((proposal, party))
    }

    pub(super) async fn circle_role(
        &self,
        db: &DatabaseTransaction,
        circle_id: Uuid,
        user_id: Uuid,
    ) -> ResultEngine<Option<CircleRole>> {
        let row = circle_members::Entity::find_by_id((circle_id.to_string(), user_id.to_string()))
            .one(db)
            .await?;
        row.as_ref().map(circle_members::Model::role).transpose()
    }

    /// Circle the user may see. Private circles are `KeyNotFound` for
    /// non-members so their existence does not leak.
    pub(super) async fn require_circle_visible(
        &self,
        db: &DatabaseTransaction,
        circle_id: Uuid,
        user_id: Uuid,
    ) -> ResultEngine<(circles::Model, Option<CircleRole>)> {
        let circle = self.require_circle_model(db, circle_id).await?;
        let role = self.circle_role(db, circle_id, user_id).await?;
        if circle.is_private && role.is_none() {
            return Err(EngineError::KeyNotFound("circle".to_string()));
        }
        Ok((circle, role))
    }

    pub(super) async fn require_circle_member(
        &self,
        db: &DatabaseTransaction,
        circle_id: Uuid,
        user_id: Uuid,
    ) -> ResultEngine<(circles::Model, CircleRole)> {
        let (circle, role) = self.require_circle_visible(db, circle_id, user_id).await?;
        let role = role.ok_or_else(|| {
            EngineError::Forbidden("only circle members can do this".to_string())
        })?;
        Ok((circle, role))
    }

    pub(super) async fn require_circle_admin(
        &self,
        db: &DatabaseTransaction,
        circle_id: Uuid,
        user_id: Uuid,
    ) -> ResultEngine<circles::Model> {
        let (circle, role) = self.require_circle_member(db, circle_id, user_id).await?;
        if !role.is_admin() {
            return Err(EngineError::Forbidden(
                "only circle admins can do this".to_string(),
            ));
        }
        Ok(circle)
    }

    pub(super) async fn circle_admin_ids(
        &self,
        db: &DatabaseTransaction,
        circle_id: Uuid,
    ) -> ResultEngine<Vec<Uuid>> {
        circle_members::Entity::find()
            .filter(circle_members::Column::CircleId.eq(circle_id.to_string()))
            .filter(circle_members::Column::Role.eq(CircleRole::Admin.as_str()))
            .all(db)
            .await?
            .into_iter()
            .map(|m| parse_uuid(&m.user_id, "user"))
            .collect()
    }

    pub(super) async fn notify(
        &self,
        db: &DatabaseTransaction,
        notification: NewNotification,
    ) -> ResultEngine<()> {
        notification
            .into_active_model(chrono::Utc::now())
            .insert(db)
            .await?;
        Ok(())
    }
}
