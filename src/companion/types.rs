use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Wire name of a local action outcome.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActionKind {
    CreateFile,
    WhereFile,
    ConfirmFile,
    CapabilityStatement,
    RepairStatus,
    AvatarAdvancementPlan,
    LocalIntentUnparsed,
    Unhandled,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Proof that a specific local action actually ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionReceipt {
    pub id: String,
    pub at: String,
    pub kind: ActionKind,
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ActionReceipt {
    pub fn issue(kind: ActionKind, ok: bool, path: Option<&Path>) -> Self {
        let mut id = uuid::Uuid::new_v4().simple().to_string();
        id.truncate(12);
        Self {
            id,
            at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            kind,
            ok,
            path: path.map(|p| p.display().to_string()),
        }
    }
}

/// Reply envelope of the local-action endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalActionResult {
    pub handled: bool,
    pub ok: bool,
    pub kind: ActionKind,
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt: Option<ActionReceipt>,
    pub verified_local: bool,
}

impl LocalActionResult {
    /// Nothing recognized; the caller routes the turn to the chat gateway.
    pub fn unhandled() -> Self {
        Self {
            handled: false,
            ok: false,
            kind: ActionKind::Unhandled,
            response: String::new(),
            path: None,
            receipt: None,
            verified_local: false,
        }
    }

    /// A reply produced by deterministic local logic, with its receipt.
    pub fn verified(
        kind: ActionKind,
        ok: bool,
        response: impl Into<String>,
        path: Option<&Path>,
    ) -> Self {
        Self {
            handled: true,
            ok,
            kind,
            response: response.into(),
            path: path.map(|p| p.display().to_string()),
            receipt: Some(ActionReceipt::issue(kind, ok, path)),
            verified_local: true,
        }
    }
}
