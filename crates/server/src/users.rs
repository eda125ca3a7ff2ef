//! Account endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use api_types::{
    item::ItemView,
    user::{Login, ProfileResponse, UserView},
};
use engine::{LoginCmd, User};

use crate::{ServerError, auth::Identity, server::ServerState, views};

/// Register the caller on first login, refresh their profile afterwards.
pub async fn login(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Json(payload): Json<Login>,
) -> Result<Json<UserView>, ServerError> {
    let mut cmd = LoginCmd::new(identity.subject, payload.email);
    if let Some(name) = payload.name {
        cmd = cmd.name(name);
    }
    if let Some(image) = payload.image {
        cmd = cmd.image(image);
    }

    let user = state.engine.login(cmd).await?;
    Ok(Json(views::user(user)))
}

pub async fn me(Extension(user): Extension<User>) -> Json<UserView> {
    Json(views::user(user))
}

pub async fn profile(
    State(state): State<ServerState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ProfileResponse>, ServerError> {
    let profile = state.engine.public_profile(user_id).await?;
    let items: Vec<ItemView> = profile.items.into_iter().map(views::item).collect();

    Ok(Json(ProfileResponse {
        user: views::public_user(profile.user),
        items,
    }))
}
