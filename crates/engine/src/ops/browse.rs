//! Browse query construction.
//!
//! Filters are validated and defaulted in [`BrowseFilter::resolve`], then
//! turned into a single `SELECT` joined with the boost table. Ranking puts
//! items with a boost that is still running first, newest first within each
//! group. A boost row the sweeper has not removed yet ranks like no boost.

use chrono::{DateTime, Utc};
use sea_orm::{
    Order, QueryFilter, QueryOrder, QuerySelect,
    prelude::*,
    sea_query::{Expr, LikeExpr, SimpleExpr},
};

use crate::{
    EngineError, Item, ItemCondition, ResultEngine, boosted_items, items,
    util::{escape_like, search_key},
};

use super::Engine;

const DEFAULT_TO_PRICE: f64 = 99_999_999.0;
const MAX_SCORE: f64 = 100.0;
const DEFAULT_LIMIT: u64 = 50;
const MAX_LIMIT: u64 = 200;

/// Browse filters, every field optional.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BrowseFilter {
    pub query: Option<String>,
    pub category: Option<String>,
    pub from_price: Option<f64>,
    pub to_price: Option<f64>,
    pub max_score: Option<f64>,
    pub condition: Option<ItemCondition>,
    pub include_swapped: bool,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Clone, Debug, PartialEq)]
struct ResolvedFilter {
    title_pattern: Option<String>,
    category: Option<String>,
    from_price: f64,
    to_price: f64,
    max_score: f64,
    condition: Option<ItemCondition>,
    include_swapped: bool,
    limit: u64,
    offset: u64,
}

impl BrowseFilter {
    fn resolve(&self) -> ResultEngine<ResolvedFilter> {
        let from_price = self.from_price.unwrap_or(0.0);
        let to_price = self.to_price.unwrap_or(DEFAULT_TO_PRICE);
        if !from_price.is_finite() || !to_price.is_finite() || from_price < 0.0 || to_price < 0.0
        {
            return Err(EngineError::Invalid(
                "price bounds must be non-negative numbers".to_string(),
            ));
        }
        if from_price > to_price {
            return Err(EngineError::Invalid(
                "from price must not exceed to price".to_string(),
            ));
        }

        let max_score = self.max_score.unwrap_or(MAX_SCORE);
        if !(0.0..=MAX_SCORE).contains(&max_score) {
            return Err(EngineError::Invalid(format!(
                "max score must be between 0 and {MAX_SCORE}"
            )));
        }

        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        if limit == 0 || limit > MAX_LIMIT {
            return Err(EngineError::Invalid(format!(
                "limit must be between 1 and {MAX_LIMIT}"
            )));
        }

        let title_pattern = self
            .query
            .as_deref()
            .map(|q| search_key(q.trim().trim_matches('"')))
            .filter(|q| !q.is_empty())
            .map(|q| format!("%{}%", escape_like(&q)));

        let category = self
            .category
            .as_deref()
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty());

        Ok(ResolvedFilter {
            title_pattern,
            category,
            from_price,
            to_price,
            max_score,
            condition: self.condition,
            include_swapped: self.include_swapped,
            limit,
            offset: self.offset.unwrap_or(0),
        })
    }
}

/// A browse hit. `boosted` is true only while the boost is running.
#[derive(Clone, Debug, PartialEq)]
pub struct BrowsedItem {
    pub item: Item,
    pub boosted: bool,
}

impl Engine {
    pub async fn browse_items(
        &self,
        filter: &BrowseFilter,
        now: DateTime<Utc>,
    ) -> ResultEngine<Vec<BrowsedItem>> {
        let filter = filter.resolve()?;

        let mut select = items::Entity::find()
            .find_also_related(boosted_items::Entity)
            .filter(items::Column::CurrentPrice.between(filter.from_price, filter.to_price))
            .filter(items::Column::Score.between(0.0, filter.max_score));

        if !filter.include_swapped {
            select = select.filter(items::Column::IsSwapped.eq(false));
        }
        if let Some(pattern) = filter.title_pattern {
            select = select.filter(
                Expr::col((items::Entity, items::Column::TitleSearch))
                    .like(LikeExpr::new(pattern).escape('\\')),
            );
        }
        if let Some(category) = filter.category {
            select = select.filter(items::Column::Category.eq(category));
        }
        if let Some(condition) = filter.condition {
            select = select.filter(items::Column::Condition.eq(condition.as_str()));
        }

        let boost_rank: SimpleExpr = Expr::case(boosted_items::Column::ExpiresAt.gt(now), 1)
            .finally(0)
            .into();

        let rows = select
            .order_by(boost_rank, Order::Desc)
            .order_by_desc(items::Column::CreatedAt)
            .order_by_asc(items::Column::Id)
            .limit(filter.limit)
            .offset(filter.offset)
            .all(&self.database)
            .await?;

        rows.into_iter()
            .map(|(item, boost)| -> ResultEngine<BrowsedItem> {
                Ok(BrowsedItem {
                    item: Item::try_from(item)?,
                    boosted: boost.is_some_and(|b| b.expires_at > now),
                })
            })
            .collect()
    }
}
