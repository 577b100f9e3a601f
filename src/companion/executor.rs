use super::intent::LocalIntent;
use super::probe::{PortProbe, TcpPortProbe};
use super::replies::{self, RepairSignals};
use super::session::{SessionStore, Topic};
use super::templates::NoteTemplate;
use super::types::{ActionKind, LocalActionResult};
use crate::config::Config;
use crate::error::ActionError;
use crate::guardrail::GuardrailAuditLog;
use chrono::Utc;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Runs the side effect behind a recognized intent.
///
/// Only two intents touch the outside world: `CreateFile` writes one file,
/// `RepairStatus` opens one TCP probe and reads the guardrail log. Every
/// other reply is fixed text.
pub struct LocalActionExecutor {
    desktop_dir: PathBuf,
    probe: Arc<dyn PortProbe>,
    probe_host: String,
    probe_port: u16,
    probe_timeout: Duration,
    audit: Arc<GuardrailAuditLog>,
    block_threshold: usize,
    validation_command: String,
}

impl LocalActionExecutor {
    pub fn from_config(config: &Config, audit: Arc<GuardrailAuditLog>) -> Self {
        Self {
            desktop_dir: config.desktop_dir(),
            probe: Arc::new(TcpPortProbe),
            probe_host: config.companion.probe_host.clone(),
            probe_port: config.companion.probe_port,
            probe_timeout: config.probe_timeout(),
            audit,
            block_threshold: config.companion.guardrail_block_threshold,
            validation_command: config.companion.validation_command.clone(),
        }
    }

    #[must_use]
    pub fn with_probe(mut self, probe: Arc<dyn PortProbe>) -> Self {
        self.probe = probe;
        self
    }

    pub fn desktop_dir(&self) -> &Path {
        &self.desktop_dir
    }

    pub fn execute(&self, intent: &LocalIntent, session: &SessionStore) -> LocalActionResult {
        match intent {
            LocalIntent::CreateFile { template } => self.create_file(*template, session),
            LocalIntent::WhereFile { path } => {
                session.record_topic(Topic::CreatedFile);
                LocalActionResult::verified(
                    ActionKind::WhereFile,
                    true,
                    replies::where_file(path),
                    Some(path),
                )
            }
            LocalIntent::ConfirmFile { path } => {
                session.record_topic(Topic::CreatedFile);
                LocalActionResult::verified(
                    ActionKind::ConfirmFile,
                    true,
                    replies::confirm_file(path),
                    Some(path),
                )
            }
            LocalIntent::Capability => LocalActionResult::verified(
                ActionKind::CapabilityStatement,
                true,
                replies::CAPABILITY_STATEMENT,
                None,
            ),
            LocalIntent::RepairStatus => self.repair_status(),
            LocalIntent::AvatarAdvancement | LocalIntent::AvatarAdvancementClarifier => {
                session.record_topic(Topic::AvatarAdvancement);
                LocalActionResult::verified(
                    ActionKind::AvatarAdvancementPlan,
                    true,
                    replies::avatar_advancement_plan(
                        &self.validation_command,
                        matches!(intent, LocalIntent::AvatarAdvancementClarifier),
                    ),
                    None,
                )
            }
            LocalIntent::Unparsed => LocalActionResult::verified(
                ActionKind::LocalIntentUnparsed,
                false,
                replies::UNPARSED_GUIDANCE,
                None,
            ),
        }
    }

    fn create_file(&self, template: NoteTemplate, session: &SessionStore) -> LocalActionResult {
        let target = self.desktop_dir.join(template.file_name());
        match write_atomically(&self.desktop_dir, &target, template.body()) {
            Ok(()) => {
                session.record_created(&target, Utc::now());
                tracing::info!(
                    path = %target.display(),
                    template = template.label(),
                    "created local file"
                );
                LocalActionResult::verified(
                    ActionKind::CreateFile,
                    true,
                    replies::created_file(template.file_name(), &target),
                    Some(&target),
                )
            }
            Err(err) => {
                tracing::warn!("{err}");
                let reason = match &err {
                    ActionError::Write { message, .. } => message.clone(),
                    other => other.to_string(),
                };
                LocalActionResult::verified(
                    ActionKind::CreateFile,
                    false,
                    replies::create_failed(&target, &reason),
                    None,
                )
            }
        }
    }

    fn repair_status(&self) -> LocalActionResult {
        let gateway_online = self
            .probe
            .is_open(&self.probe_host, self.probe_port, self.probe_timeout);
        let signals = RepairSignals {
            gateway_port: self.probe_port,
            gateway_online,
            guardrail_blocks: self.audit.recent_block_count(),
            block_threshold: self.block_threshold,
        };
        tracing::debug!(probe = self.probe.name(), ?signals, "repair status probed");
        let (ok, text) = signals.report();
        LocalActionResult::verified(ActionKind::RepairStatus, ok, text, None)
    }
}

/// Write `body` to a temp file beside `target`, then rename over it. Either
/// the complete file appears at `target` or nothing does.
fn write_atomically(dir: &Path, target: &Path, body: &str) -> Result<(), ActionError> {
    fs::create_dir_all(dir)
        .map_err(|e| ActionError::DesktopUnavailable(format!("{}: {e}", dir.display())))?;

    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = dir.join(format!(
        ".{file_name}.{}.tmp",
        uuid::Uuid::new_v4().simple()
    ));

    let result = fs::File::create(&tmp)
        .and_then(|mut file| {
            file.write_all(body.as_bytes())?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&tmp, target));

    result.map_err(|err| {
        let _ = fs::remove_file(&tmp);
        ActionError::Write {
            path: target.display().to_string(),
            message: err.to_string(),
        }
    })
}
