//! Local-intent classification.
//!
//! A message is matched against [`RULES`] in order and the first rule that
//! produces an intent wins. Priority:
//!
//! 1. `deictic_followup`: "the file you created", "where is the file",
//!    "did you create the file", or a bare "i meant yours" while the created
//!    file is the most recent topic. Falls through when nothing was created.
//! 2. `create_file`: a creation cue plus a desktop location cue plus a
//!    Markdown format cue. A dashboard tutorial/guide keyword selects the
//!    tutorial template, anything else the generic note.
//! 3. `capability`: "what can you do", "do you have local access", ...
//! 4. `repair_status`: questions about what needs repairing in the workspace.
//! 5. `avatar_advancement`: advancement of the companion's own avatar, and a
//!    bare "i meant yours" clarifier when the file is not the active topic.
//! 6. `unparsed`: shaped like a local operation (local verb plus a local
//!    target) but matched by nothing above.
//!
//! Anything else is no match and belongs to the chat gateway.

use super::session::{SessionState, Topic};
use super::templates::NoteTemplate;
use crate::utils::collapse_whitespace;
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;

/// A recognized local request. Immutable once classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalIntent {
    CreateFile { template: NoteTemplate },
    WhereFile { path: PathBuf },
    ConfirmFile { path: PathBuf },
    Capability,
    RepairStatus,
    AvatarAdvancement,
    AvatarAdvancementClarifier,
    Unparsed,
}

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("intent pattern must compile")
}

static FILE_YOU_CREATED_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(r"(?i)(the\s+file\s+you\s+(?:created|made)|that\s+file\s+you\s+(?:created|made)|no\s+i\s+meant\s+the\s+file)")
});
static WHERE_FILE_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(r"(?i)(where\s+is\s+the\s+file|where\s+can\s+i\s+find\s+it|where\s+is\s+it\s+located)")
});
static DID_YOU_MAKE_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(r"(?i)(did\s+you\s+make\s+the\s+\.?md|did\s+you\s+create\s+the\s+file)")
});
static I_MEANT_YOURS_RE: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?i)^(?:no,?\s+)?i\s+meant\s+yours[.!?]?$"));

static CREATE_CUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(r"(?i)\b(create|make|write|generate|save|put|draft|give\s+me)\b")
});
static DESKTOP_CUE_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)\b(desktop|computer)\b"));
static MARKDOWN_CUE_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)(\.md\b|\bmarkdown\b)"));
static DASHBOARD_TUTORIAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(r"(?i)((tutorial|guide|walkthrough).*dashboard|dashboard.*(tutorial|guide|walkthrough))")
});

static CAPABILITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(r"(?i)(^what can you do\??$|openclawd|local runtime|can you .*access.*(file|computer|desktop)|do you have local access|are you cloud|what can you do locally|do you have full autonomy|how will you do this)")
});
static REPAIR_STATUS_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(r"(?i)(confirm repair|repair status|what needs to be repaired|needs to be repaired in your workspace|tell me something that needs to be repaired|workspace.*repair)")
});
static AVATAR_ADVANCEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(r"(?i)(avatar advancement|advance(?:d)?\s+(?:your|my|the)\s+companion avatar|companion avatar.*advance|proceed with avatar advancement proposal|proposal.*companion avatar)")
});

static LOCAL_VERB_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(r"(?i)\b(create|made|make|write|wrote|read|open|show|display|delete|remove|find|list|run|execute|edit|modify|append|rename|move|copy)")
});
static LOCAL_TARGET_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(r"(?i)(\bfiles?\b|\.md\b|\bmarkdown\b|\bdesktop\b|\bcomputer\b|\bworkspace\b|\bfolder\b|\bpath\b|\bdirectory\b|\bcommand\b|\bpowershell\b|\bcmd\b)")
});
static WORKSPACE_TROUBLE_RE: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?i)\b(repair|repaired|fix|broken|files?)\b"));
static RUN_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)\b(run|execute)\b"));
static SHELL_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)\b(command|powershell|cmd)\b"));
static WORKSPACE_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)\bworkspace\b"));

/// Whether `text` reads like a request to act on the local machine.
///
/// Shared by the Unparsed rule and by the guardrail's `likely_local_intent`.
pub fn looks_like_local_operation(text: &str) -> bool {
    if LOCAL_VERB_RE.is_match(text) && LOCAL_TARGET_RE.is_match(text) {
        return true;
    }
    if WORKSPACE_RE.is_match(text) && WORKSPACE_TROUBLE_RE.is_match(text) {
        return true;
    }
    RUN_RE.is_match(text) && SHELL_RE.is_match(text)
}

/// One row of the decision table.
pub struct IntentRule {
    pub name: &'static str,
    apply: fn(&str, &SessionState) -> Option<LocalIntent>,
}

pub static RULES: [IntentRule; 6] = [
    IntentRule {
        name: "deictic_followup",
        apply: deictic_followup,
    },
    IntentRule {
        name: "create_file",
        apply: create_file,
    },
    IntentRule {
        name: "capability",
        apply: capability,
    },
    IntentRule {
        name: "repair_status",
        apply: repair_status,
    },
    IntentRule {
        name: "avatar_advancement",
        apply: avatar_advancement,
    },
    IntentRule {
        name: "unparsed",
        apply: unparsed,
    },
];

fn deictic_followup(text: &str, state: &SessionState) -> Option<LocalIntent> {
    let path = state.last_created_path.clone()?;

    if DID_YOU_MAKE_RE.is_match(text) {
        return Some(LocalIntent::ConfirmFile { path });
    }
    if FILE_YOU_CREATED_RE.is_match(text) || WHERE_FILE_RE.is_match(text) {
        return Some(LocalIntent::WhereFile { path });
    }
    if I_MEANT_YOURS_RE.is_match(text) && state.last_topic == Some(Topic::CreatedFile) {
        return Some(LocalIntent::WhereFile { path });
    }
    None
}

fn create_file(text: &str, _state: &SessionState) -> Option<LocalIntent> {
    let shaped = CREATE_CUE_RE.is_match(text)
        && DESKTOP_CUE_RE.is_match(text)
        && MARKDOWN_CUE_RE.is_match(text);
    if !shaped {
        return None;
    }
    let template = if DASHBOARD_TUTORIAL_RE.is_match(text) {
        NoteTemplate::DashboardTutorial
    } else {
        NoteTemplate::Note
    };
    Some(LocalIntent::CreateFile { template })
}

fn capability(text: &str, _state: &SessionState) -> Option<LocalIntent> {
    CAPABILITY_RE
        .is_match(text)
        .then_some(LocalIntent::Capability)
}

fn repair_status(text: &str, _state: &SessionState) -> Option<LocalIntent> {
    REPAIR_STATUS_RE
        .is_match(text)
        .then_some(LocalIntent::RepairStatus)
}

fn avatar_advancement(text: &str, _state: &SessionState) -> Option<LocalIntent> {
    if AVATAR_ADVANCEMENT_RE.is_match(text) {
        return Some(LocalIntent::AvatarAdvancement);
    }
    // The created file, if it was the active topic, was claimed by rule 1.
    I_MEANT_YOURS_RE
        .is_match(text)
        .then_some(LocalIntent::AvatarAdvancementClarifier)
}

fn unparsed(text: &str, _state: &SessionState) -> Option<LocalIntent> {
    looks_like_local_operation(text).then_some(LocalIntent::Unparsed)
}

/// Classify and report which rule matched.
pub fn classify_with_rule(
    message: &str,
    state: &SessionState,
) -> Option<(&'static str, LocalIntent)> {
    let text = collapse_whitespace(message);
    if text.is_empty() {
        return None;
    }
    RULES
        .iter()
        .find_map(|rule| (rule.apply)(&text, state).map(|intent| (rule.name, intent)))
}

/// Pure, deterministic, case-insensitive. `None` means "route to the gateway".
pub fn classify(message: &str, state: &SessionState) -> Option<LocalIntent> {
    classify_with_rule(message, state).map(|(_, intent)| intent)
}
