use serde::{Deserialize, Serialize};

/// What a blocked reply did wrong. Declaration order is detector order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ViolationKind {
    CloudLimitContradiction,
    ToolOutputFabrication,
    UnverifiedExecutionClaim,
    UnverifiedWorkspaceDiagnostic,
    NonexistentWorkspaceArtifactClaim,
}

impl ViolationKind {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Insertion-ordered, duplicate-free list of violations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViolationSet(Vec<ViolationKind>);

impl ViolationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if `kind` was already present.
    pub fn insert(&mut self, kind: ViolationKind) -> bool {
        if self.0.contains(&kind) {
            return false;
        }
        self.0.push(kind);
        true
    }

    pub fn contains(&self, kind: ViolationKind) -> bool {
        self.0.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = ViolationKind> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[ViolationKind] {
        &self.0
    }
}

impl FromIterator<ViolationKind> for ViolationSet {
    fn from_iter<I: IntoIterator<Item = ViolationKind>>(iter: I) -> Self {
        let mut set = Self::new();
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

/// Outcome of checking one (user, assistant) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    pub valid: bool,
    pub likely_local_intent: bool,
    pub violations: ViolationSet,
    pub normalized_message: String,
    pub original_message: String,
}

impl ValidationVerdict {
    /// Flat `{"ok": true, ...verdict}` body shared by the HTTP route and the CLI.
    pub fn envelope(&self) -> serde_json::Value {
        serde_json::json!({
            "ok": true,
            "valid": self.valid,
            "likely_local_intent": self.likely_local_intent,
            "violations": self.violations,
            "normalized_message": self.normalized_message,
            "original_message": self.original_message,
        })
    }
}
