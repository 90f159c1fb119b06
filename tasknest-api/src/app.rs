/// Application state and router builder
///
/// This module defines the shared application state and builds the Axum
/// router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use tasknest_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = tasknest_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tasknest_shared::auth::guard;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. Uses Arc
/// internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Gets the session token lifetime
    pub fn token_ttl(&self) -> chrono::Duration {
        self.config.token_ttl()
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                    # Health check (public)
/// ├── /api/user/
/// │   ├── POST /register         # Public
/// │   ├── POST /login            # Public
/// │   ├── GET  /me               # Access guard
/// │   ├── PUT  /profile          # Access guard
/// │   └── PUT  /password         # Access guard
/// └── /api/tasks/                # Access guard on the whole group
///     ├── GET    /
///     ├── POST   /
///     ├── GET    /:id
///     ├── PUT    /:id
///     └── DELETE /:id
/// ```
///
/// Every protected route sits behind [`access_guard_layer`]; there is no
/// other path to a task or profile handler.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Public user routes
    let public_user_routes = Router::new()
        .route("/register", post(routes::user::register))
        .route("/login", post(routes::user::login));

    // Profile routes (require a verified identity)
    let protected_user_routes = Router::new()
        .route("/me", get(routes::user::current_user))
        .route("/profile", put(routes::user::update_profile))
        .route("/password", put(routes::user::update_password))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            access_guard_layer,
        ));

    // Task routes (require a verified identity)
    let task_routes = Router::new()
        .route(
            "/",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            access_guard_layer,
        ));

    let cors = build_cors(&state.config.api.cors_origins);

    Router::new()
        .merge(health_routes)
        .nest("/api/user", public_user_routes.merge(protected_user_routes))
        .nest("/api/tasks", task_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Configures CORS from the allowed-origins list
///
/// `["*"]` (the development default) yields a permissive layer; anything
/// else becomes an explicit origin allow-list.
fn build_cors(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    }
}

/// Access guard middleware layer
///
/// Authenticates the request's bearer token, resolves it to a stored user,
/// and injects the resulting [`guard::AuthUser`] into request extensions for
/// handlers to extract. Rejections convert to the standard error envelope
/// via `ApiError`.
async fn access_guard_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let user = guard::authenticate(&state.db, state.jwt_secret(), authorization).await?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
