use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use engine::Engine;
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use server::{AuthConfig, ServerConfig};
use tower::ServiceExt;

const ORIGIN: &str = "http://localhost:5173";

fn config() -> ServerConfig {
    ServerConfig {
        bind: "127.0.0.1".to_string(),
        port: 0,
        allowed_origins: vec![ORIGIN.to_string()],
        auth: AuthConfig {
            secret: "test-secret".to_string(),
            issuer: None,
            audience: None,
        },
    }
}

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    server::router(engine, &config())
}

fn token(subject: &str) -> String {
    config().auth.mint(subject, 3600).unwrap()
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Log `name` in and return their bearer token and user id.
async fn login(app: &Router, name: &str) -> (String, String) {
    let token = token(&format!("sub-{name}"));
    let (status, body) = call(
        app,
        "POST",
        "/api/auth/login",
        Some(&token),
        Some(json!({ "email": format!("{name}@example.com"), "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let id = body["id"].as_str().unwrap().to_string();
    (token, id)
}

async fn add_item(app: &Router, token: &str, title: &str) -> String {
    let (status, body) = call(
        app,
        "POST",
        "/api/items",
        Some(token),
        Some(json!({
            "title": title,
            "description": format!("{title} in working order"),
            "current_price": 100.0,
            "original_price": 200.0,
            "category": "home",
            "condition": "GOOD",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_needs_no_token() {
    let app = app().await;
    let (status, _) = call(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn tokens_are_checked() {
    let app = app().await;

    let (status, body) = call(&app, "GET", "/api/auth/user", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let forged = AuthConfig {
        secret: "not-the-secret".to_string(),
        issuer: None,
        audience: None,
    }
    .mint("sub-alice", 3600)
    .unwrap();
    let (status, _) = call(&app, "GET", "/api/auth/user", Some(&forged), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // valid token, but no account yet
    let (status, _) = call(&app, "GET", "/api/auth/user", Some(&token("sub-alice")), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (token, id) = login(&app, "alice").await;
    let (status, body) = call(&app, "GET", "/api/auth/user", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["email"], "alice@example.com");
}

#[tokio::test]
async fn browsing_and_item_detail_are_public() {
    let app = app().await;
    let (alice, alice_id) = login(&app, "alice").await;
    let lamp = add_item(&app, &alice, "Desk lamp").await;
    add_item(&app, &alice, "Road bike").await;

    let (status, body) = call(&app, "GET", "/api/items", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["items"][0]["title"], "Road bike");
    assert_eq!(body["items"][0]["boosted"], false);

    let (status, body) = call(&app, "GET", "/api/items?query=lamp&category=HOME", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    let (status, body) = call(&app, "GET", "/api/items?from_price=50&to_price=10", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = call(&app, "GET", &format!("/api/items/{lamp}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["owner"]["id"], alice_id.as_str());
    assert_eq!(body["item"]["category"], "HOME");
    assert!(body["owner"].get("email").is_none());

    let (status, body) = call(&app, "GET", &format!("/api/users/{alice_id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);

    // adding still needs a token
    let (status, _) = call(&app, "POST", "/api/items", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn boosting_puts_an_item_on_top() {
    let app = app().await;
    let (alice, _) = login(&app, "alice").await;
    let lamp = add_item(&app, &alice, "Desk lamp").await;
    add_item(&app, &alice, "Road bike").await;

    let (status, body) = call(&app, "POST", &format!("/api/items/{lamp}/boost"), Some(&alice), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["item_id"], lamp.as_str());

    let (status, _) = call(&app, "POST", &format!("/api/items/{lamp}/boost"), Some(&alice), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = call(&app, "GET", "/api/items", None, None).await;
    assert_eq!(body["items"][0]["id"], lamp.as_str());
    assert_eq!(body["items"][0]["boosted"], true);

    let (_, body) = call(&app, "GET", &format!("/api/items/{lamp}"), None, None).await;
    assert_eq!(body["boosted"], true);
    assert!(body["boost_expires_at"].is_string());
}

#[tokio::test]
async fn swap_flow_over_http() {
    let app = app().await;
    let (alice, alice_id) = login(&app, "alice").await;
    let (bob, bob_id) = login(&app, "bob").await;
    let (carol, _) = login(&app, "carol").await;
    let lamp = add_item(&app, &alice, "Desk lamp").await;
    let bike = add_item(&app, &bob, "Road bike").await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/swaps",
        Some(&alice),
        Some(json!({
            "receiver_id": bob_id,
            "proposed_item_id": lamp,
            "receiver_item_id": bike,
            "message": "deal?",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["status"], "PENDING");
    let swap = body["id"].as_str().unwrap().to_string();

    let (status, body) = call(&app, "GET", "/api/swaps?direction=received", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["swaps"][0]["id"], swap.as_str());
    let (_, body) = call(&app, "GET", "/api/swaps?direction=sent", Some(&bob), None).await;
    assert!(body["swaps"].as_array().unwrap().is_empty());

    let (status, _) = call(&app, "GET", &format!("/api/swaps/{swap}"), Some(&carol), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(&app, "POST", &format!("/api/swaps/{swap}/accept"), Some(&alice), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(&app, "POST", &format!("/api/swaps/{swap}/accept"), Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ACCEPTED");
    let (status, _) = call(&app, "POST", &format!("/api/swaps/{swap}/accept"), Some(&bob), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(
        &app,
        "PUT",
        &format!("/api/swaps/{swap}/meeting"),
        Some(&alice),
        Some(json!({ "location": "Central station", "date": "2026-11-02", "time": "18:30" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "SCHEDULED");
    let meeting = body["id"].as_str().unwrap().to_string();

    let (status, body) = call(&app, "GET", &format!("/api/swaps/{swap}"), Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["proposer"]["id"], alice_id.as_str());
    assert_eq!(body["meeting"]["location"], "Central station");
    assert_eq!(body["proposed_item"]["is_swapped"], true);

    let (status, body) = call(&app, "POST", &format!("/api/meetings/{meeting}/cancel"), Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "CANCELLED");

    let (status, body) = call(&app, "GET", "/api/notifications", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    let kinds: Vec<&str> = body["notifications"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["type"].as_str().unwrap())
        .collect();
    assert!(kinds.contains(&"swap.proposal_accepted"));
    assert!(kinds.contains(&"meeting.canceled"));

    let (status, body) = call(&app, "POST", "/api/notifications/read-all", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 2);
    let (_, body) = call(&app, "GET", "/api/notifications?unread_only=true", Some(&alice), None).await;
    assert!(body["notifications"].as_array().unwrap().is_empty());

    let (status, _) = call(&app, "POST", &format!("/api/swaps/{swap}/cancel"), Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = call(&app, "GET", &format!("/api/items/{lamp}"), None, None).await;
    assert_eq!(body["item"]["is_swapped"], false);
}

#[tokio::test]
async fn circles_over_http() {
    let app = app().await;
    let (alice, _) = login(&app, "alice").await;
    let (bob, bob_id) = login(&app, "bob").await;
    let bike = add_item(&app, &bob, "Road bike").await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/circles",
        Some(&alice),
        Some(json!({ "name": "Cyclists", "is_private": true })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let circle = body["id"].as_str().unwrap().to_string();

    let (status, _) = call(&app, "GET", &format!("/api/circles/{circle}"), Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(&app, "POST", &format!("/api/circles/{circle}/join"), Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/circles/{circle}/members"),
        Some(&alice),
        Some(json!({ "user_id": bob_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "MEMBER");

    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/circles/{circle}/items"),
        Some(&bob),
        Some(json!({ "item_id": bike })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["is_approved"], false);

    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/circles/{circle}/items/{bike}/approve"),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_approved"], true);

    let (status, body) = call(&app, "GET", "/api/circles", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["circles"][0]["member_count"], 2);
    assert_eq!(body["circles"][0]["my_role"], "MEMBER");

    let (status, _) = call(
        &app,
        "DELETE",
        &format!("/api/circles/{circle}/items/{bike}"),
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call(&app, "POST", &format!("/api/circles/{circle}/leave"), Some(&bob), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn cors_allows_configured_origins_only() {
    let app = app().await;

    let preflight = |origin: &str| {
        Request::builder()
            .method("OPTIONS")
            .uri("/api/items")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap()
    };

    let response = app.clone().oneshot(preflight(ORIGIN)).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        ORIGIN
    );
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
        "true"
    );

    let response = app.oneshot(preflight("http://evil.example")).await.unwrap();
    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}
