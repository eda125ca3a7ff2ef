mod common;

use engine::{CircleRole, EngineError, NewCircleCmd};

use common::{engine_with_db, item, user};

#[tokio::test]
async fn creator_becomes_admin_and_listing_counts_members() {
    let engine = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let bob = user(&engine, "bob").await;

    let circle = engine
        .create_circle(NewCircleCmd::new(alice.id, "Cyclists").description("Two wheels"))
        .await
        .unwrap();
    engine.join_circle(circle.id, bob.id).await.unwrap();

    let listed = engine.list_circles(alice.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].member_count, 2);
    assert_eq!(listed[0].my_role, Some(CircleRole::Admin));

    let detail = engine.circle_detail(circle.id, bob.id).await.unwrap();
    assert_eq!(detail.my_role, Some(CircleRole::Member));
    assert_eq!(detail.members.len(), 2);
    assert_eq!(detail.members[0].user_id, alice.id);
    assert_eq!(detail.members[0].role, CircleRole::Admin);

    assert!(matches!(
        engine.join_circle(circle.id, bob.id).await,
        Err(EngineError::InvalidState(_))
    ));
    assert!(matches!(
        engine.create_circle(NewCircleCmd::new(alice.id, "   ")).await,
        Err(EngineError::Invalid(_))
    ));
}

#[tokio::test]
async fn private_circles_are_hidden_from_outsiders() {
    let engine = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let bob = user(&engine, "bob").await;
    let circle = engine
        .create_circle(NewCircleCmd::new(alice.id, "Family").private(true))
        .await
        .unwrap();

    assert!(engine.list_circles(bob.id).await.unwrap().is_empty());
    assert!(matches!(
        engine.circle_detail(circle.id, bob.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine.join_circle(circle.id, bob.id).await,
        Err(EngineError::Forbidden(_))
    ));

    let member = engine
        .add_circle_member(circle.id, bob.id, CircleRole::Member, alice.id)
        .await
        .unwrap();
    assert_eq!(member.role, CircleRole::Member);
    assert_eq!(member.name.as_deref(), Some("bob"));

    let listed = engine.list_circles(bob.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].my_role, Some(CircleRole::Member));

    // members cannot add people, admins can promote
    let carol = user(&engine, "carol").await;
    assert!(matches!(
        engine
            .add_circle_member(circle.id, carol.id, CircleRole::Member, bob.id)
            .await,
        Err(EngineError::Forbidden(_))
    ));
    let promoted = engine
        .add_circle_member(circle.id, bob.id, CircleRole::Admin, alice.id)
        .await
        .unwrap();
    assert_eq!(promoted.role, CircleRole::Admin);
}

#[tokio::test]
async fn shared_items_wait_for_approval() {
    let engine = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let bob = user(&engine, "bob").await;
    let circle = engine
        .create_circle(NewCircleCmd::new(alice.id, "Cyclists"))
        .await
        .unwrap();
    engine.join_circle(circle.id, bob.id).await.unwrap();
    let bike = item(&engine, &bob, "Road bike").await;
    let helmet = item(&engine, &alice, "Bike helmet").await;

    let shared = engine.share_item(circle.id, bike.id, bob.id).await.unwrap();
    assert!(!shared.is_approved);
    assert_eq!(shared.shared_by, bob.id);

    let by_admin = engine
        .share_item(circle.id, helmet.id, alice.id)
        .await
        .unwrap();
    assert!(by_admin.is_approved);

    let member_view = engine.circle_detail(circle.id, bob.id).await.unwrap();
    assert_eq!(member_view.items.len(), 1);
    assert_eq!(member_view.items[0].item.id, helmet.id);
    let admin_view = engine.circle_detail(circle.id, alice.id).await.unwrap();
    assert_eq!(admin_view.items.len(), 2);

    let inbox = engine
        .list_notifications(alice.id, None, None, false)
        .await
        .unwrap();
    assert_eq!(inbox.notifications.len(), 1);
    assert_eq!(inbox.notifications[0].kind, "circle.item_pending");

    assert!(matches!(
        engine.approve_item(circle.id, bike.id, bob.id).await,
        Err(EngineError::Forbidden(_))
    ));
    let approved = engine
        .approve_item(circle.id, bike.id, alice.id)
        .await
        .unwrap();
    assert!(approved.is_approved);
    assert_eq!(
        engine
            .circle_detail(circle.id, bob.id)
            .await
            .unwrap()
            .items
            .len(),
        2
    );
    let inbox = engine
        .list_notifications(bob.id, None, None, false)
        .await
        .unwrap();
    assert_eq!(inbox.notifications[0].kind, "circle.item_approved");
}

#[tokio::test]
async fn sharing_rules() {
    let engine = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let bob = user(&engine, "bob").await;
    let carol = user(&engine, "carol").await;
    let circle = engine
        .create_circle(NewCircleCmd::new(alice.id, "Cyclists"))
        .await
        .unwrap();
    engine.join_circle(circle.id, bob.id).await.unwrap();
    engine.join_circle(circle.id, carol.id).await.unwrap();
    let bike = item(&engine, &bob, "Road bike").await;

    assert!(matches!(
        engine.share_item(circle.id, bike.id, carol.id).await,
        Err(EngineError::Forbidden(_))
    ));
    engine.share_item(circle.id, bike.id, bob.id).await.unwrap();
    assert!(matches!(
        engine.share_item(circle.id, bike.id, bob.id).await,
        Err(EngineError::ExistingKey(_))
    ));

    assert!(matches!(
        engine.unshare_item(circle.id, bike.id, carol.id).await,
        Err(EngineError::Forbidden(_))
    ));
    engine
        .unshare_item(circle.id, bike.id, alice.id)
        .await
        .unwrap();
    assert!(matches!(
        engine.unshare_item(circle.id, bike.id, bob.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn leaving_keeps_an_admin_and_removes_empty_circles() {
    let engine = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let bob = user(&engine, "bob").await;
    let circle = engine
        .create_circle(NewCircleCmd::new(alice.id, "Cyclists"))
        .await
        .unwrap();
    engine.join_circle(circle.id, bob.id).await.unwrap();

    assert!(matches!(
        engine.leave_circle(circle.id, alice.id).await,
        Err(EngineError::InvalidState(_))
    ));

    engine.leave_circle(circle.id, bob.id).await.unwrap();
    assert!(matches!(
        engine.leave_circle(circle.id, bob.id).await,
        Err(EngineError::Forbidden(_))
    ));

    engine.leave_circle(circle.id, alice.id).await.unwrap();
    assert!(matches!(
        engine.circle_detail(circle.id, alice.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn the_last_admin_cannot_be_demoted() {
    let engine = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let bob = user(&engine, "bob").await;
    let circle = engine
        .create_circle(NewCircleCmd::new(alice.id, "Cyclists"))
        .await
        .unwrap();
    engine.join_circle(circle.id, bob.id).await.unwrap();

    assert!(matches!(
        engine
            .add_circle_member(circle.id, alice.id, CircleRole::Member, alice.id)
            .await,
        Err(EngineError::InvalidState(_))
    ));
    let detail = engine.circle_detail(circle.id, alice.id).await.unwrap();
    assert_eq!(detail.my_role, Some(CircleRole::Admin));

    // with a second admin the demotion goes through
    engine
        .add_circle_member(circle.id, bob.id, CircleRole::Admin, alice.id)
        .await
        .unwrap();
    let demoted = engine
        .add_circle_member(circle.id, alice.id, CircleRole::Member, alice.id)
        .await
        .unwrap();
    assert_eq!(demoted.role, CircleRole::Member);
    let detail = engine.circle_detail(circle.id, bob.id).await.unwrap();
    assert_eq!(detail.members.iter().filter(|m| m.role == CircleRole::Admin).count(), 1);
}
