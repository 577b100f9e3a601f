//! Axum HTTP front door for the companion and the guardrail.
//!
//! Handlers are thin: they parse, hand the blocking work to the local
//! services on a blocking thread, and serialize the result. Body size and
//! request time are bounded at the router.

mod dashboard;
mod handlers;

use handlers::{
    handle_dashboard, handle_guardrail_events, handle_health, handle_legacy_dashboard,
    handle_local_action, handle_validate_response,
};

use crate::companion::{CompanionService, LocalActionExecutor};
use crate::config::Config;
use crate::error::{GatewayError, Result};
use crate::guardrail::{AuditLimits, GuardrailAuditLog, HallucinationGuard};
use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Maximum request body size (64KB)
pub const MAX_BODY_SIZE: usize = 65_536;
/// Request timeout (30s)
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Legacy dashboard pages that now redirect to `/dashboard`.
pub const LEGACY_DASHBOARD_PATHS: [&str; 3] = [
    "/dashboard_v1.html",
    "/dashboard_v2.html",
    "/dashboard_v3.html",
];

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub companion: Arc<CompanionService>,
    pub guard: Arc<HallucinationGuard>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        let audit = Arc::new(GuardrailAuditLog::new(config.guardrail_log_path()));
        let executor = LocalActionExecutor::from_config(config, Arc::clone(&audit));
        Self {
            companion: Arc::new(CompanionService::new(executor)),
            guard: Arc::new(HallucinationGuard::new(
                audit,
                AuditLimits::from(&config.guardrail),
            )),
        }
    }
}

fn is_public_bind(host: &str) -> bool {
    !matches!(
        host,
        "127.0.0.1" | "localhost" | "::1" | "[::1]" | "0:0:0:0:0:0:0:1"
    )
}

pub fn build_router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/", get(handle_dashboard))
        .route("/dashboard", get(handle_dashboard))
        .route("/health", get(handle_health))
        .route("/companion/local-action", post(handle_local_action))
        .route("/companion/validate-response", post(handle_validate_response))
        .route("/companion/guardrail-events", get(handle_guardrail_events));
    for path in LEGACY_DASHBOARD_PATHS {
        app = app.route(path, get(handle_legacy_dashboard));
    }

    app.with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        ))
}

/// Run the HTTP gateway on `host:port`.
pub async fn run_gateway(host: &str, port: u16, config: Config) -> Result<()> {
    // ── Security: refuse public bind without explicit opt-in ──
    if is_public_bind(host) && !config.gateway.allow_public_bind {
        return Err(GatewayError::PublicBind(format!(
            "{host} (use --host 127.0.0.1, or set [gateway] allow_public_bind = true in config.toml)"
        ))
        .into());
    }

    let listener = tokio::net::TcpListener::bind((host.trim_matches(['[', ']']), port))
        .await
        .map_err(|e| GatewayError::Bind(format!("{host}:{port}: {e}")))?;

    run_gateway_with_listener(host, listener, config).await
}

/// Run the HTTP gateway from a pre-bound listener.
pub async fn run_gateway_with_listener(
    host: &str,
    listener: tokio::net::TcpListener,
    config: Config,
) -> Result<()> {
    let actual_port = listener
        .local_addr()
        .map_err(|e| GatewayError::Bind(e.to_string()))?
        .port();
    let state = AppState::from_config(&config);

    println!("◆ Mistward gateway listening on http://{host}:{actual_port}");
    println!("  GET  /dashboard");
    println!("  POST /companion/local-action");
    println!("  POST /companion/validate-response");
    println!("  GET  /companion/guardrail-events?limit=N");
    println!("  GET  /health");
    println!("  Press Ctrl+C to stop.\n");
    tracing::info!(
        desktop = %state.companion.executor().desktop_dir().display(),
        guardrail_log = %state.guard.audit().path().display(),
        "gateway ready"
    );

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await
        .map_err(|e| GatewayError::Serve(e.to_string()))?;

    Ok(())
}
