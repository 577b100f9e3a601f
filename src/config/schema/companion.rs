use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanionConfig {
    /// Target directory for created files. `~` is expanded.
    /// Defaults to the OS desktop directory, else the home directory.
    #[serde(default)]
    pub desktop_dir: Option<String>,
    /// Host probed by the repair-status report
    #[serde(default = "default_probe_host")]
    pub probe_host: String,
    /// LLM chat gateway port probed by the repair-status report
    #[serde(default = "default_probe_port")]
    pub probe_port: u16,
    /// Connect timeout of the probe in milliseconds
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
    /// Recent guardrail blocks at which repair status reports drift
    #[serde(default = "default_guardrail_block_threshold")]
    pub guardrail_block_threshold: usize,
    /// Local validation script quoted by the avatar advancement plan
    #[serde(default = "default_validation_command")]
    pub validation_command: String,
}

fn default_probe_host() -> String {
    "127.0.0.1".into()
}

fn default_probe_port() -> u16 {
    18789
}

fn default_probe_timeout_ms() -> u64 {
    350
}

fn default_guardrail_block_threshold() -> usize {
    20
}

fn default_validation_command() -> String {
    "python mycelium/ship_gate.py".into()
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            desktop_dir: None,
            probe_host: default_probe_host(),
            probe_port: default_probe_port(),
            probe_timeout_ms: default_probe_timeout_ms(),
            guardrail_block_threshold: default_guardrail_block_threshold(),
            validation_command: default_validation_command(),
        }
    }
}
