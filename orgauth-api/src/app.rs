/// Application state and router builder
///
/// This module defines the shared application state and builds the Axum
/// router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use orgauth_api::{app::AppState, config::Config};
/// use orgauth_shared::{
///     clock::SystemClock,
///     db::pool::{create_pool, DatabaseConfig},
///     store::PgStore,
/// };
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig {
///     url: config.database.url.clone(),
///     ..Default::default()
/// })
/// .await?;
/// let state = AppState::new(Arc::new(PgStore::new(pool)), Arc::new(SystemClock), config);
/// let app = orgauth_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::{Config, CorsOrigins};
use crate::error::ApiError;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::get,
    Router,
};
use chrono::Duration;
use orgauth_shared::{
    auth::{identity::resolve_identity, jwt::TokenIssuer},
    clock::Clock,
    service::Services,
    store::IdentityStore,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor; every field
/// is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Storage backend
    pub store: Arc<dyn IdentityStore>,

    /// Business services over `store`
    pub services: Services,

    /// Token issuer/verifier
    pub tokens: TokenIssuer,

    /// Request clock
    pub clock: Arc<dyn Clock>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates application state over a store and a clock
    pub fn new(store: Arc<dyn IdentityStore>, clock: Arc<dyn Clock>, config: Config) -> Self {
        let tokens = TokenIssuer::new(&config.jwt.secret, Duration::minutes(config.jwt.ttl_minutes));
        let services = Services::new(store.clone(), tokens.clone(), clock.clone());

        Self {
            store,
            services,
            tokens,
            clock,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET /health                          # Health check (public)
/// └── /api/
///     ├── /auth/                           # Public
///     │   ├── POST /register
///     │   └── POST /login
///     ├── /users/                          # Bearer token required
///     │   └── GET  /:userId
///     └── /organisations/                  # Bearer token required
///         ├── GET  /
///         ├── POST /
///         ├── GET  /:orgId
///         ├── GET  /:orgId/users
///         └── POST /:orgId/users
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication (protected routes only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/register", axum::routing::post(routes::auth::register))
        .route("/login", axum::routing::post(routes::auth::login));

    let user_routes = Router::new()
        .route("/:user_id", get(routes::users::show))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let organisation_routes = Router::new()
        .route(
            "/",
            get(routes::organisations::index).post(routes::organisations::create),
        )
        .route("/:org_id", get(routes::organisations::show))
        .route(
            "/:org_id/users",
            get(routes::organisations::members).post(routes::organisations::add_member),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/organisations", organisation_routes);

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config.api.cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    match origins {
        // Development mode: permissive CORS
        CorsOrigins::Any => CorsLayer::permissive(),
        CorsOrigins::List(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
                .max_age(std::time::Duration::from_secs(3600))
        }
    }
}

/// JWT authentication middleware layer
///
/// Resolves the caller from the `Authorization` header against the request
/// clock and injects their `Identity` into request extensions.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let identity = resolve_identity(
        &*state.store,
        &state.tokens,
        authorization.as_deref(),
        state.clock.now(),
    )
    .await
    .map_err(|e| {
        tracing::debug!(error = %e, "Rejected bearer token");
        ApiError::from(e)
    })?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}
