/// Application state and router builder
///
/// Defines the shared application state and builds the Axum router with all
/// routes and middleware.
///
/// # Example
///
/// ```no_run
/// use planboard_api::{app::AppState, config::Config};
/// use planboard_shared::events::EventSender;
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let (events, _rx) = EventSender::new();
/// let state = AppState::new(pool, config, events);
/// let app = planboard_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use planboard_shared::auth::middleware::{jwt_auth_middleware, AuthError};
use planboard_shared::events::EventSender;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::config::Config;
use crate::routes;

/// Shared application state
///
/// Cloned per request via Axum's `State` extractor; Arc keeps the clone
/// cheap.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Immutable application configuration
    pub config: Arc<Config>,

    /// Handle for enqueueing outbound events
    pub events: EventSender,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config, events: EventSender) -> Self {
        Self {
            db,
            config: Arc::new(config),
            events,
        }
    }

    /// JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                          # Health check (public)
/// └── /v1/                             # API v1
///     ├── /auth/                       # register/login public, me/logout authed
///     ├── /plans/                      # plan CRUD, sections, summary, members
///     ├── /invitations/                # note: nested under plans
///     └── /notifications/
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. JWT authentication (per-route-group)
pub fn build_router(state: AppState) -> Router {
    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Public auth routes
    let auth_public = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    // Authenticated auth routes
    let auth_private = Router::new()
        .route("/me", get(routes::auth::me))
        .route("/logout", post(routes::auth::logout))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let plan_routes = Router::new()
        .route("/", post(routes::plans::create_plan))
        .route("/", get(routes::plans::list_plans))
        .route("/owned", get(routes::plans::list_owned_with_progress))
        .route("/shared", get(routes::plans::list_shared_with_progress))
        .route("/:plan_id", get(routes::plans::get_plan))
        .route("/:plan_id", put(routes::plans::update_plan))
        .route("/:plan_id", delete(routes::plans::delete_plan))
        .route(
            "/:plan_id/company-identity",
            get(routes::sections::get_company_identity)
                .put(routes::sections::update_company_identity),
        )
        .route(
            "/:plan_id/strategic-analysis",
            get(routes::sections::get_strategic_analysis)
                .put(routes::sections::update_strategic_analysis),
        )
        .route(
            "/:plan_id/analysis-tools",
            get(routes::sections::get_analysis_tools)
                .put(routes::sections::update_analysis_tools),
        )
        .route(
            "/:plan_id/strategies",
            get(routes::sections::get_strategies).put(routes::sections::update_strategies),
        )
        .route(
            "/:plan_id/executive-summary",
            get(routes::summary::executive_summary),
        )
        .route("/:plan_id/invite", post(routes::members::invite))
        .route(
            "/:plan_id/invitations/:invitation_id/accept",
            post(routes::members::accept_invitation),
        )
        .route(
            "/:plan_id/invitations/:invitation_id/reject",
            post(routes::members::reject_invitation),
        )
        .route("/:plan_id/members", get(routes::members::list_members))
        .route(
            "/:plan_id/members/:user_id",
            delete(routes::members::remove_member),
        )
        .route(
            "/:plan_id/members/:user_id/role",
            put(routes::members::update_member_role),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let notification_routes = Router::new()
        .route("/", get(routes::notifications::list_notifications))
        .route(
            "/:notification_id/read",
            put(routes::notifications::mark_read),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let v1_routes = Router::new()
        .nest("/auth", auth_public.merge(auth_private))
        .nest("/plans", plan_routes)
        .nest("/notifications", notification_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
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
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Delegates to the shared middleware, which validates the bearer token,
/// loads the user, rejects inactive accounts, and injects `CurrentUser`
/// into request extensions.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    jwt_auth_middleware(
        state.db.clone(),
        state.config.jwt.secret.clone(),
        req,
        next,
    )
    .await
}
