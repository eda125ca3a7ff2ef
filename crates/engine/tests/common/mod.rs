#![allow(dead_code)]

use std::time::Duration;

use engine::{Engine, Item, ItemCondition, LoginCmd, NewItemCmd, User};
use migration::MigratorTrait;
use sea_orm::Database;

pub async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

pub async fn user(engine: &Engine, name: &str) -> User {
    engine
        .login(LoginCmd::new(format!("sub-{name}"), format!("{name}@example.com")).name(name))
        .await
        .unwrap()
}

/// Listed items are spaced a little apart so `created_at` ordering is
/// deterministic.
pub async fn item(engine: &Engine, owner: &User, title: &str) -> Item {
    listed(
        engine,
        NewItemCmd::new(owner.id, title, format!("{title} in working order"), ItemCondition::Good)
            .prices(100.0, 200.0),
    )
    .await
}

pub async fn listed(engine: &Engine, cmd: NewItemCmd) -> Item {
    tokio::time::sleep(Duration::from_millis(3)).await;
    engine.add_item(cmd).await.unwrap()
}
