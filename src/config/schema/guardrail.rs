use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardrailConfig {
    /// JSON-lines audit file. Defaults to `<data dir>/guardrail_events.jsonl`.
    #[serde(default)]
    pub log_path: Option<String>,
    /// Stored prefix length of the user message in audit events
    #[serde(default = "default_max_user_chars")]
    pub max_user_chars: usize,
    /// Stored prefix length of the assistant message in audit events
    #[serde(default = "default_max_assistant_chars")]
    pub max_assistant_chars: usize,
}

fn default_max_user_chars() -> usize {
    600
}

fn default_max_assistant_chars() -> usize {
    1200
}

impl Default for GuardrailConfig {
    fn default() -> Self {
        Self {
            log_path: None,
            max_user_chars: default_max_user_chars(),
            max_assistant_chars: default_max_assistant_chars(),
        }
    }
}
