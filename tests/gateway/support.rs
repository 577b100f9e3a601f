use mistward::companion::{CompanionService, LocalActionExecutor, PortProbe};
use mistward::config::Config;
use mistward::gateway::{AppState, build_router, run_gateway_with_listener};
use mistward::guardrail::{AuditLimits, GuardrailAuditLog, HallucinationGuard};
use reqwest::StatusCode;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Reports a fixed set of ports as open.
pub struct FakeProbe {
    pub open_ports: Vec<u16>,
}

impl PortProbe for FakeProbe {
    fn name(&self) -> &str {
        "fake"
    }

    fn is_open(&self, _host: &str, port: u16, _timeout: Duration) -> bool {
        self.open_ports.contains(&port)
    }
}

pub struct GatewayTestServer {
    port: u16,
    handle: tokio::task::JoinHandle<()>,
    pub desktop: PathBuf,
    pub log_path: PathBuf,
    _workspace: TempDir,
}

fn sandbox_config(workspace: &TempDir) -> Config {
    let mut config = Config {
        data_dir: workspace.path().join("data"),
        config_path: workspace.path().join("config.toml"),
        ..Config::default()
    };
    config.companion.desktop_dir = Some(workspace.path().join("Desktop").display().to_string());
    config.guardrail.log_path = Some(
        workspace
            .path()
            .join("logs/guardrail_events.jsonl")
            .display()
            .to_string(),
    );
    config
}

async fn ephemeral_listener() -> (tokio::net::TcpListener, u16) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("ephemeral gateway listener should bind");
    let port = listener
        .local_addr()
        .expect("ephemeral gateway listener should expose local address")
        .port();
    (listener, port)
}

impl GatewayTestServer {
    /// The gateway exactly as `mistward serve` runs it, sandboxed.
    pub async fn start() -> Self {
        let workspace = TempDir::new().expect("temp workspace should be created");
        let config = sandbox_config(&workspace);
        let desktop = config.desktop_dir();
        let log_path = config.guardrail_log_path();
        let (listener, port) = ephemeral_listener().await;

        let host = "127.0.0.1".to_string();
        let handle = tokio::spawn(async move {
            if let Err(e) = run_gateway_with_listener(&host, listener, config).await {
                eprintln!("test gateway stopped: {e}");
            }
        });
        wait_until_gateway_ready(port).await;

        Self {
            port,
            handle,
            desktop,
            log_path,
            _workspace: workspace,
        }
    }

    /// Same routes, with the TCP probe replaced and the audit log seeded by
    /// `seed` before the first request.
    pub async fn start_with_probe(probe: FakeProbe, seed: impl FnOnce(&GuardrailAuditLog)) -> Self {
        let workspace = TempDir::new().expect("temp workspace should be created");
        let config = sandbox_config(&workspace);
        let desktop = config.desktop_dir();
        let log_path = config.guardrail_log_path();

        let audit = Arc::new(GuardrailAuditLog::new(&log_path));
        seed(&audit);
        let executor = LocalActionExecutor::from_config(&config, Arc::clone(&audit))
            .with_probe(Arc::new(probe));
        let state = AppState {
            companion: Arc::new(CompanionService::new(executor)),
            guard: Arc::new(HallucinationGuard::new(
                audit,
                AuditLimits::from(&config.guardrail),
            )),
        };

        let (listener, port) = ephemeral_listener().await;
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, build_router(state)).await {
                eprintln!("test gateway stopped: {e}");
            }
        });
        wait_until_gateway_ready(port).await;

        Self {
            port,
            handle,
            desktop,
            log_path,
            _workspace: workspace,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{path}", self.port)
    }

    pub async fn local_action(&self, message: &str) -> serde_json::Value {
        reqwest::Client::new()
            .post(self.url("/companion/local-action"))
            .json(&serde_json::json!({ "message": message }))
            .send()
            .await
            .expect("local-action request should complete")
            .json()
            .await
            .expect("local-action response should be json")
    }

    pub async fn validate(&self, user: &str, assistant: &str) -> serde_json::Value {
        let response = reqwest::Client::new()
            .post(self.url("/companion/validate-response"))
            .json(&serde_json::json!({
                "user_message": user,
                "assistant_message": assistant,
            }))
            .send()
            .await
            .expect("validate-response request should complete");
        assert_eq!(response.status(), StatusCode::OK);
        response
            .json()
            .await
            .expect("validate-response body should be json")
    }
}

impl Drop for GatewayTestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn wait_until_gateway_ready(port: u16) {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .expect("reqwest client should be built");

    for _ in 0..80 {
        let health = client
            .get(format!("http://127.0.0.1:{port}/health"))
            .send()
            .await;
        if matches!(health, Ok(resp) if resp.status() == StatusCode::OK) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    panic!("gateway did not become ready on port {port}");
}
