//! Item listing, browsing and boosting.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use api_types::item::{
    BoostView, BrowseQuery, BrowseResponse, BrowsedItemView, ItemDetailResponse, ItemNew,
    ItemView, ItemsResponse,
};
use engine::{BrowseFilter, NewItemCmd, User};

use crate::{ServerError, server::ServerState, views};

pub async fn add(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<ItemNew>,
) -> Result<(StatusCode, Json<ItemView>), ServerError> {
    let mut cmd = NewItemCmd::new(
        user.id,
        payload.title,
        payload.description,
        views::condition_from_api(payload.condition),
    )
    .prices(payload.current_price, payload.original_price)
    .has_bill(payload.has_bill)
    .item_age(payload.item_age);
    if let Some(image) = payload.image {
        cmd = cmd.image(image);
    }
    if let Some(currency) = payload.currency {
        cmd = cmd.currency(currency);
    }
    if let Some(company) = payload.company {
        cmd = cmd.company(company);
    }
    if let Some(category) = payload.category {
        cmd = cmd.category(category);
    }

    let item = state.engine.add_item(cmd).await?;
    Ok((StatusCode::CREATED, Json(views::item(item))))
}

pub async fn browse(
    State(state): State<ServerState>,
    Query(query): Query<BrowseQuery>,
) -> Result<Json<BrowseResponse>, ServerError> {
    let filter = BrowseFilter {
        query: query.query,
        category: query.category,
        from_price: query.from_price,
        to_price: query.to_price,
        max_score: query.max_score,
        condition: query.condition.map(views::condition_from_api),
        include_swapped: query.include_swapped.unwrap_or(false),
        limit: query.limit,
        offset: query.offset,
    };

    let items = state
        .engine
        .browse_items(&filter, Utc::now())
        .await?
        .into_iter()
        .map(|browsed| BrowsedItemView {
            item: views::item(browsed.item),
            boosted: browsed.boosted,
        })
        .collect();

    Ok(Json(BrowseResponse { items }))
}

/// The caller's own items, swapped ones included.
pub async fn mine(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<ItemsResponse>, ServerError> {
    let items = state
        .engine
        .list_user_items(user.id)
        .await?
        .into_iter()
        .map(views::item)
        .collect();

    Ok(Json(ItemsResponse { items }))
}

pub async fn detail(
    State(state): State<ServerState>,
    Path(item_id): Path<Uuid>,
) -> Result<Json<ItemDetailResponse>, ServerError> {
    let detail = state.engine.item_detail(item_id).await?;
    let boosted = detail.is_boosted(Utc::now());
    let boost_expires_at = detail
        .boost
        .as_ref()
        .filter(|_| boosted)
        .map(|boost| boost.expires_at);

    Ok(Json(ItemDetailResponse {
        item: views::item(detail.item),
        owner: views::public_user(detail.owner),
        boosted,
        boost_expires_at,
    }))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(item_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_item(item_id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn boost(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(item_id): Path<Uuid>,
) -> Result<(StatusCode, Json<BoostView>), ServerError> {
    let boost = state.engine.boost_item(item_id, user.id, Utc::now()).await?;

    Ok((
        StatusCode::CREATED,
        Json(BoostView {
            item_id: boost.item_id,
            boosted_at: boost.boosted_at,
            expires_at: boost.expires_at,
        }),
    ))
}
