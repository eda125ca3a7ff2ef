mod common;

use chrono::{Duration, Utc};
use engine::{BrowseFilter, EngineError, ItemCondition, NewItemCmd, ProposeSwapCmd};

use common::{engine_with_db, item, listed, user};

fn titles(results: &[engine::BrowsedItem]) -> Vec<&str> {
    results.iter().map(|r| r.item.title.as_str()).collect()
}

#[tokio::test]
async fn newest_first_without_boosts() {
    let engine = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    item(&engine, &alice, "Desk lamp").await;
    item(&engine, &alice, "Road bike").await;
    item(&engine, &alice, "Electric kettle").await;

    let results = engine
        .browse_items(&BrowseFilter::default(), Utc::now())
        .await
        .unwrap();
    assert_eq!(titles(&results), ["Electric kettle", "Road bike", "Desk lamp"]);
    assert!(results.iter().all(|r| !r.boosted));
}

#[tokio::test]
async fn boosted_items_rank_first_only_while_active() {
    let engine = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let lamp = item(&engine, &alice, "Desk lamp").await;
    item(&engine, &alice, "Road bike").await;

    let now = Utc::now();
    let boost = engine.boost_item(lamp.id, alice.id, now).await.unwrap();
    assert_eq!(boost.expires_at, now + Duration::hours(24));

    let results = engine
        .browse_items(&BrowseFilter::default(), now + Duration::hours(1))
        .await
        .unwrap();
    assert_eq!(titles(&results), ["Desk lamp", "Road bike"]);
    assert!(results[0].boosted);

    // expired but not swept yet: ranks like any other item
    let later = engine
        .browse_items(&BrowseFilter::default(), now + Duration::hours(25))
        .await
        .unwrap();
    assert_eq!(titles(&later), ["Road bike", "Desk lamp"]);
    assert!(later.iter().all(|r| !r.boosted));
}

#[tokio::test]
async fn sweep_removes_exactly_the_expired_boosts() {
    let engine = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let lamp = item(&engine, &alice, "Desk lamp").await;
    let bike = item(&engine, &alice, "Road bike").await;

    let t0 = Utc::now();
    engine.boost_item(lamp.id, alice.id, t0).await.unwrap();
    engine
        .boost_item(bike.id, alice.id, t0 + Duration::hours(12))
        .await
        .unwrap();

    assert_eq!(engine.sweep_expired_boosts(t0).await.unwrap(), 0);
    assert_eq!(
        engine
            .sweep_expired_boosts(t0 + Duration::hours(30))
            .await
            .unwrap(),
        1
    );
    assert!(engine.item_detail(lamp.id).await.unwrap().boost.is_none());
    assert!(engine.item_detail(bike.id).await.unwrap().boost.is_some());
}

#[tokio::test]
async fn boost_rules() {
    let engine = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let bob = user(&engine, "bob").await;
    let lamp = item(&engine, &alice, "Desk lamp").await;
    let now = Utc::now();

    assert!(matches!(
        engine.boost_item(lamp.id, bob.id, now).await,
        Err(EngineError::Forbidden(_))
    ));

    engine.boost_item(lamp.id, alice.id, now).await.unwrap();
    assert!(matches!(
        engine
            .boost_item(lamp.id, alice.id, now + Duration::hours(2))
            .await,
        Err(EngineError::InvalidState(_))
    ));

    // an expired, unswept boost is replaced
    let renewed = engine
        .boost_item(lamp.id, alice.id, now + Duration::hours(30))
        .await
        .unwrap();
    assert_eq!(renewed.boosted_at, now + Duration::hours(30));
    let detail = engine.item_detail(lamp.id).await.unwrap();
    assert!(detail.is_boosted(now + Duration::hours(31)));
}

#[tokio::test]
async fn query_matches_non_ascii_titles_ignoring_case() {
    let engine = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    item(&engine, &alice, "Ärmel jacket").await;
    item(&engine, &alice, "Road bike").await;

    for query in ["ärmel", "ÄRMEL", "JACKET"] {
        let filter = BrowseFilter {
            query: Some(query.to_string()),
            ..BrowseFilter::default()
        };
        let results = engine.browse_items(&filter, Utc::now()).await.unwrap();
        assert_eq!(titles(&results), ["Ärmel jacket"], "query {query}");
    }
}

#[tokio::test]
async fn filters_compose() {
    let engine = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    listed(
        &engine,
        NewItemCmd::new(alice.id, "Brass desk lamp", "Warm light, no scratches", ItemCondition::New)
            .prices(40.0, 80.0)
            .category("home")
            .has_bill(true),
    )
    .await;
    listed(
        &engine,
        NewItemCmd::new(alice.id, "Floor lamp 50% off", "Tall and bright lamp", ItemCondition::Fair)
            .prices(15.0, 60.0)
            .category("HOME")
            .item_age(48),
    )
    .await;
    listed(
        &engine,
        NewItemCmd::new(alice.id, "Lamp 500 lumen", "Clip-on reading lamp", ItemCondition::Poor)
            .prices(5.0, 10.0)
            .category("home")
            .item_age(60),
    )
    .await;
    listed(
        &engine,
        NewItemCmd::new(alice.id, "Road bike", "Aluminium frame, 54cm", ItemCondition::Good)
            .prices(300.0, 900.0)
            .category("sports"),
    )
    .await;

    let by_query = engine
        .browse_items(
            &BrowseFilter {
                query: Some("\"LAMP\"".to_string()),
                ..BrowseFilter::default()
            },
            Utc::now(),
        )
        .await
        .unwrap();
    assert_eq!(by_query.len(), 3);

    let literal_percent = engine
        .browse_items(
            &BrowseFilter {
                query: Some("50%".to_string()),
                ..BrowseFilter::default()
            },
            Utc::now(),
        )
        .await
        .unwrap();
    assert_eq!(titles(&literal_percent), ["Floor lamp 50% off"]);

    let priced = engine
        .browse_items(
            &BrowseFilter {
                category: Some("home".to_string()),
                from_price: Some(10.0),
                to_price: Some(50.0),
                ..BrowseFilter::default()
            },
            Utc::now(),
        )
        .await
        .unwrap();
    assert_eq!(titles(&priced), ["Floor lamp 50% off", "Brass desk lamp"]);

    // FAIR at 48 months scores 26, POOR at 60 months scores 10
    let low_score = engine
        .browse_items(
            &BrowseFilter {
                query: Some("lamp".to_string()),
                max_score: Some(30.0),
                ..BrowseFilter::default()
            },
            Utc::now(),
        )
        .await
        .unwrap();
    assert_eq!(titles(&low_score), ["Lamp 500 lumen", "Floor lamp 50% off"]);

    let new_only = engine
        .browse_items(
            &BrowseFilter {
                condition: Some(ItemCondition::New),
                ..BrowseFilter::default()
            },
            Utc::now(),
        )
        .await
        .unwrap();
    assert_eq!(titles(&new_only), ["Brass desk lamp"]);

    let paged = engine
        .browse_items(
            &BrowseFilter {
                limit: Some(2),
                offset: Some(1),
                ..BrowseFilter::default()
            },
            Utc::now(),
        )
        .await
        .unwrap();
    assert_eq!(titles(&paged), ["Lamp 500 lumen", "Floor lamp 50% off"]);
}

#[tokio::test]
async fn swapped_items_are_hidden_unless_requested() {
    let engine = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let bob = user(&engine, "bob").await;
    let lamp = item(&engine, &alice, "Desk lamp").await;
    let bike = item(&engine, &bob, "Road bike").await;
    item(&engine, &bob, "Electric kettle").await;

    let proposal = engine
        .propose_swap(ProposeSwapCmd::new(alice.id, bob.id, lamp.id, bike.id))
        .await
        .unwrap();
    engine.accept_swap(proposal.id, bob.id).await.unwrap();

    let visible = engine
        .browse_items(&BrowseFilter::default(), Utc::now())
        .await
        .unwrap();
    assert_eq!(titles(&visible), ["Electric kettle"]);

    let everything = engine
        .browse_items(
            &BrowseFilter {
                include_swapped: true,
                ..BrowseFilter::default()
            },
            Utc::now(),
        )
        .await
        .unwrap();
    assert_eq!(everything.len(), 3);

    assert!(matches!(
        engine
            .browse_items(
                &BrowseFilter {
                    from_price: Some(50.0),
                    to_price: Some(10.0),
                    ..BrowseFilter::default()
                },
                Utc::now(),
            )
            .await,
        Err(EngineError::Invalid(_))
    ));
}
