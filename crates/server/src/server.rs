use axum::{
    Router,
    http::{HeaderValue, Method, StatusCode, header},
    middleware,
    routing::{delete, get, post, put},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use std::sync::Arc;

use crate::{
    auth::{self, AuthConfig},
    circles, items, meetings, notifications, swaps, users,
};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub auth: Arc<AuthConfig>,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// Browser origins allowed to call the API with credentials.
    pub allowed_origins: Vec<String>,
    pub auth: AuthConfig,
}

fn cors(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("ignoring invalid CORS origin: {origin}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

/// Build the application router. Exposed so tests can drive it without a
/// socket.
pub fn router(engine: Engine, config: &ServerConfig) -> Router {
    let state = ServerState {
        engine: Arc::new(engine),
        auth: Arc::new(config.auth.clone()),
    };

    let public = Router::new()
        .route("/items", get(items::browse))
        .route("/items/{id}", get(items::detail))
        .route("/users/{id}", get(users::profile));

    let login = Router::new()
        .route("/auth/login", post(users::login))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::identity));

    let protected = Router::new()
        .route("/auth/user", get(users::me))
        .route("/items", post(items::add))
        .route("/items/mine", get(items::mine))
        .route("/items/{id}", delete(items::delete))
        .route("/items/{id}/boost", post(items::boost))
        .route("/swaps", post(swaps::propose).get(swaps::list))
        .route("/swaps/{id}", get(swaps::detail))
        .route("/swaps/{id}/accept", post(swaps::accept))
        .route("/swaps/{id}/reject", post(swaps::reject))
        .route("/swaps/{id}/cancel", post(swaps::cancel))
        .route(
            "/swaps/{id}/meeting",
            put(meetings::schedule).get(meetings::for_swap),
        )
        .route("/meetings/{id}/cancel", post(meetings::cancel))
        .route("/circles", post(circles::create).get(circles::list))
        .route("/circles/{id}", get(circles::detail))
        .route("/circles/{id}/join", post(circles::join))
        .route("/circles/{id}/leave", post(circles::leave))
        .route("/circles/{id}/members", post(circles::add_member))
        .route("/circles/{id}/items", post(circles::share_item))
        .route(
            "/circles/{id}/items/{item_id}/approve",
            post(circles::approve_item),
        )
        .route(
            "/circles/{id}/items/{item_id}",
            delete(circles::unshare_item),
        )
        .route("/notifications", get(notifications::list))
        .route("/notifications/read-all", post(notifications::mark_all_read))
        .route("/notifications/{id}/read", post(notifications::mark_read))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::auth));

    Router::new()
        .nest("/api", public.merge(login).merge(protected))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors(&config.allowed_origins))
        .with_state(state)
}

pub async fn run(engine: Engine, config: ServerConfig) {
    let addr = format!("{}:{}", config.bind, config.port);
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, config, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    config: ServerConfig,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(engine, &config)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    config: ServerConfig,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, config, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
