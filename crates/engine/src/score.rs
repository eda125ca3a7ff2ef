//! Item score: a fixed weighted sum over condition, age and bill presence.
//!
//! The score lives in `0..=100` and is stored with the item when it is
//! listed; browse filters on it.

use crate::ItemCondition;

const CONDITION_WEIGHT: f64 = 50.0;
const AGE_WEIGHT: f64 = 30.0;
const BILL_WEIGHT: f64 = 20.0;
/// Items at least this old (in months) get no age points.
const AGE_HORIZON_MONTHS: f64 = 60.0;

fn condition_factor(condition: ItemCondition) -> f64 {
    match condition {
        ItemCondition::New => 1.0,
        ItemCondition::LikeNew => 0.8,
        ItemCondition::Good => 0.6,
        ItemCondition::Fair => 0.4,
        ItemCondition::Poor => 0.2,
    }
}

/// Compute the score of an item, rounded to two decimals.
///
/// Negative ages are treated as brand new.
pub fn item_score(condition: ItemCondition, item_age_months: i32, has_bill: bool) -> f64 {
    let age = f64::from(item_age_months.max(0));
    let age_factor = (1.0 - age / AGE_HORIZON_MONTHS).max(0.0);
    let bill = if has_bill { BILL_WEIGHT } else { 0.0 };

    let raw = CONDITION_WEIGHT * condition_factor(condition) + AGE_WEIGHT * age_factor + bill;
    (raw * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_item_with_bill_scores_full() {
        assert_eq!(item_score(ItemCondition::New, 0, true), 100.0);
    }

    #[test]
    fn old_poor_item_without_bill_scores_condition_only() {
        assert_eq!(item_score(ItemCondition::Poor, 120, false), 10.0);
    }

    #[test]
    fn age_decays_linearly() {
        assert_eq!(item_score(ItemCondition::Good, 30, false), 45.0);
        assert_eq!(item_score(ItemCondition::Good, 6, true), 77.0);
    }

    #[test]
    fn score_is_monotonic_in_condition() {
        let conditions = [
            ItemCondition::Poor,
            ItemCondition::Fair,
            ItemCondition::Good,
            ItemCondition::LikeNew,
            ItemCondition::New,
        ];
        let scores: Vec<f64> = conditions
            .iter()
            .map(|c| item_score(*c, 12, false))
            .collect();
        assert!(scores.windows(2).all(|w| w[0] < w[1]));
    }
}
