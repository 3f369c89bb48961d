use axum::{routing::get, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use stayaway_api::actions::AppContext;
use stayaway_api::blob::HttpObjectStore;
use stayaway_api::cache::WebhookRevalidator;
use stayaway_api::handlers;
use stayaway_api::identity::JwtIdentityProvider;
use stayaway_api::store::PgStore;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, secrets, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = stayaway_api::config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("Starting Stayaway API in {:?} mode", config.environment);

    let store = Arc::new(
        PgStore::connect()
            .await
            .unwrap_or_else(|e| panic!("failed to connect to database: {}", e)),
    );

    let ctx = AppContext {
        store: store.clone(),
        identity: Arc::new(JwtIdentityProvider::new()),
        blobs: Arc::new(HttpObjectStore::new()),
        cache: Arc::new(WebhookRevalidator::new()),
    };

    let app = app(ctx, store);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Stayaway API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app(ctx: AppContext, store: Arc<PgStore>) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(move || health(store.clone())))
        // Actions
        .merge(profile_routes())
        .merge(property_routes())
        .merge(favorite_routes())
        .merge(review_routes())
        .with_state(ctx)
        // Global middleware
        .layer(axum::middleware::from_fn(handlers::session_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn profile_routes() -> Router<AppContext> {
    use stayaway_api::handlers::profile;

    Router::new()
        .route(
            "/profile",
            get(profile::profile_get)
                .post(profile::profile_post)
                .put(profile::profile_put),
        )
        .route(
            "/profile/image",
            get(profile::profile_image_get).post(profile::profile_image_post),
        )
}

fn property_routes() -> Router<AppContext> {
    use stayaway_api::handlers::property;

    Router::new()
        .route(
            "/properties",
            get(property::properties_get).post(property::properties_post),
        )
        .route("/properties/:id", get(property::property_get))
        .route("/properties/:id/reviews", get(property::property_reviews_get))
        .route("/properties/:id/review", get(property::property_own_review_get))
        .route("/properties/:id/rating", get(property::property_rating_get))
}

fn favorite_routes() -> Router<AppContext> {
    use axum::routing::post;
    use stayaway_api::handlers::favorite;

    Router::new()
        .route("/favorites", get(favorite::favorites_get))
        .route("/favorites/toggle", post(favorite::favorite_toggle_post))
        .route("/properties/:id/favorite", get(favorite::favorite_id_get))
}

fn review_routes() -> Router<AppContext> {
    use axum::routing::delete;
    use stayaway_api::handlers::review;

    Router::new()
        .route("/reviews", get(review::reviews_get).post(review::reviews_post))
        .route("/reviews/:id", delete(review::review_delete))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Stayaway API",
            "version": version,
            "description": "Rental marketplace backend built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "properties": "/properties[/:id] (listing public, hosting requires session)",
                "profile": "/profile, /profile/image (requires session)",
                "favorites": "/favorites, /favorites/toggle, /properties/:id/favorite (requires session)",
                "reviews": "/reviews[/:id], /properties/:id/reviews, /properties/:id/rating",
            }
        }
    }))
}

async fn health(store: Arc<PgStore>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match store.health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
