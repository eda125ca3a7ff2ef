use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;
    let mut tasks = tokio::task::JoinSet::new();

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "swapply={level},server={level},engine={level},tower_http={level}",
            level = settings.app.level
        ))
        .init();

    let db = parse_database(&settings.server.database).await?;
    let boost_duration = chrono::Duration::hours(settings.boost.duration_hours);

    let engine = engine::Engine::builder()
        .database(db.clone())
        .boost_duration(boost_duration)
        .build()
        .await?;
    let config = server::ServerConfig {
        bind: settings.server.bind,
        port: settings.server.port,
        allowed_origins: settings.server.allowed_origins,
        auth: server::AuthConfig {
            secret: settings.auth.secret,
            issuer: settings.auth.issuer,
            audience: settings.auth.audience,
        },
    };
    tasks.spawn(server::run(engine, config));

    let sweeper = engine::Engine::builder()
        .database(db)
        .boost_duration(boost_duration)
        .build()
        .await?;
    let every = Duration::from_secs(settings.boost.sweep_interval_secs.max(1));
    tasks.spawn(async move {
        tracing::info!("Sweeping expired boosts every {}s", every.as_secs());
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            if let Err(err) = sweeper.sweep_expired_boosts(chrono::Utc::now()).await {
                tracing::error!("boost sweep failed: {err}");
            }
        }
    });

    while tasks.join_next().await.is_some() {
        tasks.shutdown().await;
    }

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
