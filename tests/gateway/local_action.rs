use super::support::{FakeProbe, GatewayTestServer};
use mistward::guardrail::{GuardrailEvent, ViolationKind};
use serde_json::Value;
use std::path::PathBuf;

#[tokio::test]
async fn dashboard_tutorial_phrase_is_handled_locally() {
    let server = GatewayTestServer::start().await;

    let payload = server
        .local_action("give me a tutorial on this dashboard as a .md file on my desktop")
        .await;

    assert_eq!(payload["handled"], true);
    assert_eq!(payload["ok"], true);
    assert_eq!(payload["kind"], "create_file");
    assert_eq!(payload["verified_local"], true);
    assert_eq!(payload["receipt"]["kind"], "create_file");
    assert_eq!(payload["receipt"]["ok"], true);
    assert!(
        payload["receipt"]["id"]
            .as_str()
            .is_some_and(|id| !id.is_empty())
    );

    let path = PathBuf::from(payload["path"].as_str().expect("path should be set"));
    assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("MIST.md"));
    assert_eq!(path.parent(), Some(server.desktop.as_path()));
    let content = std::fs::read_to_string(&path).expect("created file should exist");
    assert!(content.contains("# MIST Dashboard Tutorial"));
}

#[tokio::test]
async fn file_you_created_followup_returns_recorded_path() {
    let server = GatewayTestServer::start().await;

    let created = server
        .local_action("create MIST.md on my desktop with a 5-line dashboard tutorial")
        .await;
    let follow_up = server.local_action("no i meant the file you created").await;

    assert_eq!(created["kind"], "create_file");
    assert_eq!(follow_up["handled"], true);
    assert_eq!(follow_up["ok"], true);
    assert_eq!(follow_up["kind"], "where_file");
    assert_eq!(follow_up["path"], created["path"]);
}

#[tokio::test]
async fn followup_without_prior_creation_never_returns_a_path() {
    let server = GatewayTestServer::start().await;

    let payload = server.local_action("no i meant the file you created").await;

    assert_ne!(payload["kind"], "where_file");
    assert!(payload.get("path").is_none());
}

#[tokio::test]
async fn generic_desktop_markdown_create_is_handled() {
    let server = GatewayTestServer::start().await;

    let payload = server.local_action("create a markdown file on my desktop").await;

    assert_eq!(payload["handled"], true);
    assert_eq!(payload["ok"], true);
    assert_eq!(payload["kind"], "create_file");
    let path = PathBuf::from(payload["path"].as_str().expect("path should be set"));
    assert_eq!(path.parent(), Some(server.desktop.as_path()));
    let content = std::fs::read_to_string(&path).expect("created file should exist");
    assert!(content.starts_with("# MIST Note"));
}

#[tokio::test]
async fn unparsed_local_intent_is_kept_from_gateway_fallback() {
    let server = GatewayTestServer::start().await;

    let payload = server
        .local_action("rename MIST.md on my desktop to MIST_v2.md")
        .await;

    assert_eq!(payload["handled"], true);
    assert_eq!(payload["ok"], false);
    assert_eq!(payload["kind"], "local_intent_unparsed");
    assert_eq!(payload["verified_local"], true);
    assert!(
        payload["response"]
            .as_str()
            .is_some_and(|r| r.contains("explicit command format"))
    );
}

#[tokio::test]
async fn capability_queries_are_answered_locally() {
    let server = GatewayTestServer::start().await;

    let openclawd = server
        .local_action("do you have local access to files on my computer in openclawd?")
        .await;
    assert_eq!(openclawd["handled"], true);
    assert_eq!(openclawd["ok"], true);
    assert_eq!(openclawd["kind"], "capability_statement");
    assert!(
        openclawd["response"]
            .as_str()
            .is_some_and(|r| r.contains("OpenClawd local runtime"))
    );

    let plain = server.local_action("what can you do?").await;
    assert_eq!(plain["handled"], true);
    assert_eq!(plain["kind"], "capability_statement");
    assert_eq!(plain["verified_local"], true);
}

#[tokio::test]
async fn repair_status_returns_verified_local_diagnostics() {
    let server = GatewayTestServer::start_with_probe(
        FakeProbe {
            open_ports: vec![8765],
        },
        |audit| {
            for _ in 0..32 {
                audit
                    .record(&GuardrailEvent::now(
                        vec![ViolationKind::CloudLimitContradiction],
                        true,
                        "run command: whoami",
                        "I cannot access your local device.",
                    ))
                    .expect("seed event should be written");
            }
        },
    )
    .await;

    let payload = server
        .local_action("tell me something that needs to be repaired in your workspace")
        .await;

    assert_eq!(payload["handled"], true);
    assert_eq!(payload["ok"], false);
    assert_eq!(payload["kind"], "repair_status");
    assert_eq!(payload["verified_local"], true);
    let response = payload["response"].as_str().unwrap_or_default();
    assert!(response.contains("Gateway 18789: offline"));
    assert!(response.contains("Guardrail recent blocks: 32"));
}

#[tokio::test]
async fn avatar_advancement_prompt_is_answered_locally() {
    let server = GatewayTestServer::start().await;

    let payload = server
        .local_action("how can you advanced your companion avatar?")
        .await;

    assert_eq!(payload["handled"], true);
    assert_eq!(payload["ok"], true);
    assert_eq!(payload["kind"], "avatar_advancement_plan");
    assert_eq!(payload["verified_local"], true);
    let response = payload["response"].as_str().unwrap_or_default();
    assert!(response.contains("Companion avatar advancement plan"));
    assert!(response.contains("`python mycelium/ship_gate.py`"));
}

#[tokio::test]
async fn i_meant_yours_clarifier_gets_avatar_plan_locally() {
    let server = GatewayTestServer::start().await;

    let payload = server.local_action("i meant yours").await;

    assert_eq!(payload["handled"], true);
    assert_eq!(payload["ok"], true);
    assert_eq!(payload["kind"], "avatar_advancement_plan");
    assert_eq!(payload["verified_local"], true);
    assert!(
        payload["response"]
            .as_str()
            .is_some_and(|r| r.contains("If you meant my own advancement path"))
    );
}

#[tokio::test]
async fn chit_chat_is_left_for_the_chat_gateway() {
    let server = GatewayTestServer::start().await;

    let payload = server.local_action("what's your favorite color?").await;

    assert_eq!(payload["handled"], false);
    assert_eq!(payload["verified_local"], false);
    assert_eq!(payload["kind"], "unhandled");
}

#[tokio::test]
async fn malformed_body_is_rejected_at_the_boundary() {
    let server = GatewayTestServer::start().await;

    let response = reqwest::Client::new()
        .post(server.url("/companion/local-action"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("request should complete");

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("error body should be json");
    assert!(body.get("error").and_then(Value::as_str).is_some());
}
