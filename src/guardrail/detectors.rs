//! Pattern detectors run over every gateway reply.
//!
//! Each detector is a pure predicate over one [`Exchange`]. They are
//! independent, so any number may fire on the same reply, and they are
//! listed in [`DETECTORS`] in the same order as [`ViolationKind`].

use super::types::ViolationKind;
use regex::Regex;
use std::sync::LazyLock;

/// The gateway's answer, with what the user's turn asked for reduced to
/// one flag.
#[derive(Debug, Clone, Copy)]
pub struct Exchange<'a> {
    pub assistant_message: &'a str,
    /// The user asked for something on this machine.
    pub likely_local: bool,
}

pub struct Detector {
    pub kind: ViolationKind,
    fires: fn(&Exchange<'_>) -> bool,
}

impl Detector {
    pub fn fires(&self, exchange: &Exchange<'_>) -> bool {
        (self.fires)(exchange)
    }
}

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("guardrail pattern must compile")
}

static CLOUD_DENIAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(r"(?i)(cloud-based|don't have direct access|cannot access your (?:local\s+)?(?:device|computer|files)|can't access your local files|no direct access to your .*storage|cannot run shell commands directly|can't run shell commands directly)")
});
static CAPABILITY_AFFIRMATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(r"(?i)(\bi\s+can\s+(?:use|access|create|read|write)\s+(?:your\s+)?(?:local|files?|desktop|computer)|\blocal\s+tools\s+are\s+available|\bi\s+have\s+local\s+access)")
});
static TOOL_OUTPUT_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)\bTOOL_OUTPUT\s*\("));
static EXECUTION_CLAIM_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(r"(?i)\b(i\s+(created|deleted|wrote|ran|executed|edited)|created\s+`?.+?`?\s+at|deleted\s+`?.+?`?\s+at|command\s+`?.+?`?\s+exit=\d+)\b")
});
static DIAGNOSTIC_CLAIM_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(r"(?i)(faulty|malfunction|desynchron|critical component|repair plan|issue description|needs to be repaired|status updated|experiencing)")
});
static FILE_MENTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(r"(?i)\b[A-Za-z0-9_\- ]+\.(?:py|js|ts|tsx|jsx|json|md|html|css|rs|toml|yaml)\b")
});

/// Disclaims local access on a local request, or contradicts its own
/// capability claim within the same reply.
fn cloud_limit_contradiction(x: &Exchange<'_>) -> bool {
    CLOUD_DENIAL_RE.is_match(x.assistant_message)
        && (x.likely_local || CAPABILITY_AFFIRMATION_RE.is_match(x.assistant_message))
}

/// Only the local executor produces tool transcripts.
fn tool_output_fabrication(x: &Exchange<'_>) -> bool {
    TOOL_OUTPUT_RE.is_match(x.assistant_message)
}

fn unverified_execution_claim(x: &Exchange<'_>) -> bool {
    x.likely_local && EXECUTION_CLAIM_RE.is_match(x.assistant_message)
}

fn unverified_workspace_diagnostic(x: &Exchange<'_>) -> bool {
    x.likely_local && DIAGNOSTIC_CLAIM_RE.is_match(x.assistant_message)
}

/// A diagnosis that names a concrete file has invented that file too.
fn nonexistent_workspace_artifact_claim(x: &Exchange<'_>) -> bool {
    unverified_workspace_diagnostic(x) && FILE_MENTION_RE.is_match(x.assistant_message)
}

pub static DETECTORS: [Detector; 5] = [
    Detector {
        kind: ViolationKind::CloudLimitContradiction,
        fires: cloud_limit_contradiction,
    },
    Detector {
        kind: ViolationKind::ToolOutputFabrication,
        fires: tool_output_fabrication,
    },
    Detector {
        kind: ViolationKind::UnverifiedExecutionClaim,
        fires: unverified_execution_claim,
    },
    Detector {
        kind: ViolationKind::UnverifiedWorkspaceDiagnostic,
        fires: unverified_workspace_diagnostic,
    },
    Detector {
        kind: ViolationKind::NonexistentWorkspaceArtifactClaim,
        fires: nonexistent_workspace_artifact_claim,
    },
];
