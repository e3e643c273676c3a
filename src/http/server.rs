//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with every API handler
//! - Wire up middleware (request ID, tracing, timeout, body limit, CORS,
//!   metrics)
//! - Mount the admin router when enabled
//! - Serve until the shutdown coordinator fires

use axum::{
    extract::{DefaultBodyLimit, Request},
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin::setup_admin_router;
use crate::config::{PlatformConfig, ServerConfig};
use crate::database::StoreHandle;
use crate::http::handlers::{
    donations, notifications, projects, requests, stats, system, transactions, users, wallet,
    zakat,
};
use crate::http::middleware::track_metrics;
use crate::http::request::{request_id, X_REQUEST_ID};
use crate::lifecycle::Shutdown;
use crate::solana::{BalanceCache, SolanaClient, Wallet};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<PlatformConfig>,
    pub store: StoreHandle,
    pub solana: SolanaClient,
    pub balances: BalanceCache,
    /// Platform authority, present only when a keypair was configured.
    pub authority: Option<Arc<Wallet>>,
}

impl AppState {
    pub fn new(
        config: PlatformConfig,
        store: StoreHandle,
        solana: SolanaClient,
        authority: Option<Wallet>,
    ) -> Self {
        let balances = BalanceCache::new(Duration::from_secs(config.solana.balance_cache_ttl_secs));
        Self {
            config: Arc::new(config),
            store,
            solana,
            balances,
            authority: authority.map(Arc::new),
        }
    }

    /// Longest a handler may poll for confirmation: half the request
    /// timeout, leaving the rest for the send and the store write.
    pub fn confirmation_budget(&self) -> Duration {
        Duration::from_secs(self.config.server.request_timeout_secs) / 2
    }

    /// Poll for confirmation of `signature`, giving up once the
    /// confirmation budget is spent. Unconfirmed is not an error: the
    /// signature is still returned to the caller.
    pub async fn confirm_within_budget(&self, signature: &str) -> bool {
        let budget = self.confirmation_budget();
        match tokio::time::timeout(budget, self.solana.wait_for_confirmation(signature)).await {
            Ok(confirmed) => confirmed,
            Err(_) => {
                tracing::warn!(
                    signature,
                    budget_ms = budget.as_millis() as u64,
                    "Stopped waiting for confirmation"
                );
                false
            }
        }
    }
}

/// HTTP server for the platform API.
pub struct HttpServer {
    router: Router,
    config: Arc<PlatformConfig>,
}

impl HttpServer {
    pub fn new(state: AppState) -> Self {
        let config = state.config.clone();
        Self {
            router: build_router(state),
            config,
        }
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.wait().await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }
}

/// Build the full router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(state: AppState) -> Router {
    let server_config = state.config.server.clone();

    let mut router = Router::new()
        .route("/health", get(system::health))
        .route("/api/test", get(system::test_get).post(system::test_post))
        .route(
            "/api/users",
            get(users::get_users).post(users::upsert_user).put(users::update_user),
        )
        .route("/api/requests", get(requests::list_requests).post(requests::create_request))
        .route("/api/requests/{id}", get(requests::get_request))
        .route("/api/projects", get(projects::list_projects).post(projects::create_project))
        .route("/api/projects/{id}", get(projects::get_project))
        .route("/api/donations", get(donations::list_donations).post(donations::record_donation))
        .route("/api/notifications", get(notifications::list_notifications))
        .route("/api/notifications/{id}/read", put(notifications::mark_read))
        .route("/api/stats", get(stats::get_stats))
        .route("/api/wallet/{address}", get(wallet::get_wallet))
        .route("/api/wallet/{address}/history", get(wallet::get_history))
        .route("/api/transactions/donation", post(transactions::create_donation_transaction))
        .route("/api/transactions/submit", post(transactions::submit_transaction))
        .route("/api/airdrop", post(wallet::airdrop))
        .route("/api/zakat/pool", get(zakat::get_pool))
        .route("/api/token", get(zakat::get_token));

    if state.config.admin.enabled {
        router = router.merge(setup_admin_router(state.clone()));
    }

    router
        .with_state(state)
        .layer(DefaultBodyLimit::max(server_config.max_body_size))
        .layer(middleware::from_fn(track_metrics))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(X_REQUEST_ID.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = request_id(request.headers()).unwrap_or("-"),
                    )
                }))
                .layer(PropagateRequestIdLayer::new(X_REQUEST_ID.clone()))
                .layer(cors_layer(&server_config))
                .layer(TimeoutLayer::new(Duration::from_secs(server_config.request_timeout_secs))),
        )
}

/// Any origin when none are configured, otherwise exactly the listed ones.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(Any)
}
