use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `Mistward`.
///
/// Recognized local intents never surface these to the user: executor
/// failures are reported as `ok: false` envelopes. These errors cover startup,
/// configuration and the audit trail, where a caller has to decide what to do.
#[derive(Debug, Error)]
pub enum MistwardError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Local actions ───────────────────────────────────────────────────
    #[error("action: {0}")]
    Action(#[from] ActionError),

    // ── Guardrail audit log ─────────────────────────────────────────────
    #[error("audit: {0}")]
    Audit(#[from] AuditError),

    // ── HTTP front door ─────────────────────────────────────────────────
    #[error("gateway: {0}")]
    Gateway(#[from] GatewayError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("validation failed: {0}")]
    Validation(String),
}

// ─── Local action errors ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("desktop directory unavailable: {0}")]
    DesktopUnavailable(String),

    #[error("failed to write {path}: {message}")]
    Write { path: String, message: String },
}

// ─── Audit log errors ────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("failed to append guardrail event to {path}: {message}")]
    Append { path: String, message: String },

    #[error("failed to encode guardrail event: {0}")]
    Encode(#[from] serde_json::Error),
}

// ─── Gateway errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("refusing to bind public address {0}")]
    PublicBind(String),

    #[error("bind failed: {0}")]
    Bind(String),

    #[error("server stopped: {0}")]
    Serve(String),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, MistwardError>;
