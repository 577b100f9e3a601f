//! Hallucination guardrail for chat gateway replies.
//!
//! [`evaluate`] is pure. [`HallucinationGuard::validate`] adds the audit
//! trail: every invalid verdict appends one event, with no memoization, so
//! the same bad pair checked twice is logged twice.

pub mod audit;
pub mod detectors;
pub mod types;

pub use audit::{DEFAULT_QUERY_LIMIT, GuardrailAuditLog, GuardrailEvent, MAX_QUERY_LIMIT};
pub use detectors::{DETECTORS, Exchange};
pub use types::{ValidationVerdict, ViolationKind, ViolationSet};

use crate::companion::intent::looks_like_local_operation;
use crate::config::GuardrailConfig;
use crate::utils::truncate_chars;
use std::sync::Arc;

/// Replacement text for any blocked reply. Carries none of the blocked
/// content and trips no detector itself.
pub const BLOCKED_REPLY: &str = "Local runtime guardrail: this reply was blocked because it \
conflicts with verified execution rules. For local actions, send an explicit request such as \
`create a markdown file on my desktop`, `where is the file you created`, or \
`what is the workspace repair status`.";

pub fn evaluate(user_message: &str, assistant_message: &str) -> ValidationVerdict {
    let exchange = Exchange {
        assistant_message,
        likely_local: looks_like_local_operation(user_message),
    };
    let violations: ViolationSet = DETECTORS
        .iter()
        .filter(|detector| detector.fires(&exchange))
        .map(|detector| detector.kind)
        .collect();

    let valid = violations.is_empty();
    ValidationVerdict {
        valid,
        likely_local_intent: exchange.likely_local,
        normalized_message: if valid {
            assistant_message.to_string()
        } else {
            BLOCKED_REPLY.to_string()
        },
        original_message: assistant_message.to_string(),
        violations,
    }
}

/// Stored-text caps for audit events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditLimits {
    pub max_user_chars: usize,
    pub max_assistant_chars: usize,
}

impl From<&GuardrailConfig> for AuditLimits {
    fn from(config: &GuardrailConfig) -> Self {
        Self {
            max_user_chars: config.max_user_chars,
            max_assistant_chars: config.max_assistant_chars,
        }
    }
}

pub struct HallucinationGuard {
    audit: Arc<GuardrailAuditLog>,
    limits: AuditLimits,
}

impl HallucinationGuard {
    pub fn new(audit: Arc<GuardrailAuditLog>, limits: AuditLimits) -> Self {
        Self { audit, limits }
    }

    pub fn audit(&self) -> &Arc<GuardrailAuditLog> {
        &self.audit
    }

    pub fn validate(&self, user_message: &str, assistant_message: &str) -> ValidationVerdict {
        let verdict = evaluate(user_message, assistant_message);
        if verdict.valid {
            return verdict;
        }

        tracing::warn!(
            violations = ?verdict.violations.as_slice(),
            likely_local = verdict.likely_local_intent,
            "guardrail blocked gateway reply"
        );
        let event = GuardrailEvent::now(
            verdict.violations.iter().collect(),
            verdict.likely_local_intent,
            truncate_chars(user_message, self.limits.max_user_chars),
            truncate_chars(assistant_message, self.limits.max_assistant_chars),
        );
        // The verdict stands even when the trail cannot be written.
        if let Err(err) = self.audit.record(&event) {
            tracing::warn!("{err}");
        }
        verdict
    }
}
